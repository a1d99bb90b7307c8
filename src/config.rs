//! Marshalling Limits
//!
//! Capacities are fixed at compile time so that every kernel-side buffer
//! lives on the stack with a known size. [`TrapConfig`] carries the
//! effective maxima actually enforced, which may be tightened at runtime
//! but never raised past the compile-time capacity.

/// Buffer capacity for file and program names, terminator included.
pub const FILE_NAME_CAPACITY: usize = 33;

/// Buffer capacity for semaphore names, terminator included.
pub const SEM_NAME_CAPACITY: usize = 17;

/// Upper bound on bytes PrintString copies out of user memory.
pub const PRINT_STRING_MAX: usize = 256;

/// Longest decimal rendering of an `i32` ("-2147483648").
pub const INT_TEXT_MAX: usize = 11;

/// Runtime marshalling limits.
///
/// Lengths count characters, not the terminating zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapConfig {
    /// Longest file or program name accepted from user memory.
    pub file_name_max: usize,
    /// Longest semaphore name accepted from user memory.
    pub sem_name_max: usize,
}

impl TrapConfig {
    /// Default limits: the full compile-time capacities.
    pub const fn new() -> Self {
        Self {
            file_name_max: FILE_NAME_CAPACITY - 1,
            sem_name_max: SEM_NAME_CAPACITY - 1,
        }
    }

    /// Clamp both limits to what the compile-time buffers can hold.
    pub const fn clamped(self) -> Self {
        Self {
            file_name_max: min(self.file_name_max, FILE_NAME_CAPACITY - 1),
            sem_name_max: min(self.sem_name_max, SEM_NAME_CAPACITY - 1),
        }
    }
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn min(a: usize, b: usize) -> usize {
    if a < b {
        a
    } else {
        b
    }
}
