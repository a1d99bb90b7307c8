//! System Call Errors
//!
//! Handlers return [`SysResult`]. Codes a collaborator defines travel
//! through `Ok` untouched; only failures the trap core itself detects
//! become a [`SyscallError`].

use core::fmt;

/// Result of a syscall handler: the value for the return register.
pub type SysResult = Result<i32, SyscallError>;

/// Failures detected at the user/kernel boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// Null name pointer, negative count, bad open type, unusable name.
    InvalidArgument,
    /// A user memory access was rejected while marshalling.
    Fault,
    /// The handle does not name an open file.
    BadHandle,
    /// The handle is open read-only.
    NotWritable,
    /// The file system could not open the named file.
    NoSuchFile,
    /// The open-file table has no free slot.
    TableFull,
    /// A kernel buffer could not be allocated.
    OutOfMemory,
    /// The console reported a read error (not end of stream).
    Io,
}

impl SyscallError {
    /// Value written to the return register.
    pub const fn code(self) -> i32 {
        match self {
            Self::Io => -2,
            Self::InvalidArgument
            | Self::Fault
            | Self::BadHandle
            | Self::NotWritable
            | Self::NoSuchFile
            | Self::TableFull
            | Self::OutOfMemory => -1,
        }
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::Fault => write!(f, "bad user address"),
            Self::BadHandle => write!(f, "bad file handle"),
            Self::NotWritable => write!(f, "handle not open for writing"),
            Self::NoSuchFile => write!(f, "no such file"),
            Self::TableFull => write!(f, "open file table full"),
            Self::OutOfMemory => write!(f, "out of kernel memory"),
            Self::Io => write!(f, "console I/O error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_is_distinct() {
        assert_eq!(SyscallError::Io.code(), -2);
        assert_eq!(SyscallError::Fault.code(), -1);
        assert_eq!(SyscallError::OutOfMemory.code(), -1);
        assert_eq!(SyscallError::InvalidArgument.code(), -1);
    }
}
