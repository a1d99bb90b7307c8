//! Bounded Kernel Buffers
//!
//! Fixed-capacity byte buffers for data copied in from user memory. The
//! last byte of the backing array is reserved for the terminating zero, so
//! contents are always null-terminated and a push past capacity is
//! refused instead of overflowing.

use core::fmt;
use core::str::Utf8Error;

/// Returned when a buffer has no room left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError;

/// A null-terminated byte buffer holding at most `N - 1` bytes.
#[derive(Clone)]
pub struct BoundedBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedBuf<N> {
    /// Longest content this buffer can hold.
    pub const MAX_LEN: usize = N - 1;

    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Append one byte, keeping room for the terminator.
    pub fn push(&mut self, byte: u8) -> Result<(), CapacityError> {
        if self.len >= Self::MAX_LEN {
            return Err(CapacityError);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Number of content bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been pushed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Content bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Content bytes followed by the terminating zero.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    /// Content as UTF-8 text.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }
}

impl<const N: usize> Default for BoundedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedBuf<{}>({:?})", N, self.as_bytes())
    }
}
