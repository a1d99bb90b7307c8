//! User Virtual Addresses
//!
//! A newtype over the raw 32-bit value a user program places in an
//! argument register. It cannot be dereferenced: the only way to reach
//! the bytes behind it is through [`Machine`](super::Machine).

use core::fmt;

/// A user-space virtual address taken from an argument register.
///
/// Arithmetic wraps the way the simulated 32-bit machine does; whether
/// the resulting address is mapped is for the machine to decide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UserAddr(u32);

impl UserAddr {
    /// The null user address.
    pub const NULL: Self = Self(0);

    /// Create an address from raw register contents.
    #[inline]
    pub const fn from_register(value: i32) -> Self {
        Self(value as u32)
    }

    /// Create an address from a raw value.
    #[inline]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check for the null address.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Address `offset` bytes further on.
    #[inline]
    pub const fn add(self, offset: usize) -> Self {
        Self(self.0.wrapping_add(offset as u32))
    }
}

impl fmt::Debug for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAddr({:#010x})", self.0)
    }
}

impl fmt::Display for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
