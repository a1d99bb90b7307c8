//! Kernel Collaborators
//!
//! The trap core owns none of the kernel's long-lived state. Consoles,
//! files, processes and semaphores live behind the traits below and are
//! handed to the dispatcher as one [`Kernel`] context.
//!
//! # Synchronization
//! Every collaborator is `Sync` and takes `&self`: each call is a single
//! scoped operation that does its own locking. A call may suspend the
//! calling kernel thread (waiting for a key press, a semaphore, a child
//! process) and resume it later; the trap core never holds a lock of its
//! own across such a call.

use alloc::boxed::Box;
use core::fmt;

use bitflags::bitflags;

use crate::config::TrapConfig;

pub mod file_table;

pub use file_table::OpenFileTable;

bitflags! {
    /// Access rights recorded for an open file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        /// Bytes may be read.
        const READ = 1 << 0;
        /// Bytes may be written.
        const WRITE = 1 << 1;
    }
}

impl Access {
    /// Open type 0 from user code.
    pub const OPEN_READ_WRITE: i32 = 0;
    /// Open type 1 from user code.
    pub const OPEN_READ_ONLY: i32 = 1;

    /// Decode the open type a user program passes to OpenF.
    pub const fn from_open_type(open_type: i32) -> Option<Self> {
        match open_type {
            Self::OPEN_READ_WRITE => Some(Self::READ.union(Self::WRITE)),
            Self::OPEN_READ_ONLY => Some(Self::READ),
            _ => None,
        }
    }
}

/// A console read failure, as opposed to running out of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleError;

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "console read error")
    }
}

/// Synchronized console device.
pub trait Console: Sync {
    /// Read one byte, blocking until one is available.
    ///
    /// `Ok(None)` means end of stream.
    fn read_byte(&self) -> Result<Option<u8>, ConsoleError>;

    /// Write all of `bytes`.
    fn write(&self, bytes: &[u8]);

    /// Read a line into `buf`, stopping at newline, end of stream or a full
    /// buffer. The newline is consumed but not stored.
    fn read_line(&self, buf: &mut [u8]) -> Result<usize, ConsoleError> {
        let mut n = 0;
        while n < buf.len() {
            match self.read_byte()? {
                Some(b'\n') | None => break,
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
            }
        }
        Ok(n)
    }
}

/// An open file with its own cursor.
pub trait OpenFile: Send {
    /// Read from the cursor, returning bytes read (0 at end of file).
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Write at the cursor, returning bytes written.
    fn write(&mut self, buf: &[u8]) -> usize;

    /// Move the cursor to an absolute position.
    fn seek(&mut self, position: usize);

    /// Current cursor position.
    fn tell(&self) -> usize;

    /// File length in bytes.
    fn length(&self) -> usize;
}

/// The file system proper.
pub trait FileSystem: Sync {
    /// Create a file of `initial_size` bytes. Returns false on failure.
    fn create(&self, name: &str, initial_size: usize) -> bool;

    /// Open an existing file.
    fn open(&self, name: &str) -> Option<Box<dyn OpenFile>>;
}

/// The open-file table behind user-visible file handles.
///
/// Indices here are table slots; the user sees `index + 2` because
/// handles 0 and 1 belong to the console.
pub trait FileTable: Sync {
    /// Register `file` and return its slot, or hand it back when full.
    fn open(&self, file: Box<dyn OpenFile>, access: Access) -> Result<usize, Box<dyn OpenFile>>;

    /// Close a slot. Returns 0 on success, -1 if nothing is open there.
    fn close(&self, index: usize) -> i32;

    /// Access rights of an open slot, `None` if the slot is empty.
    fn access(&self, index: usize) -> Option<Access>;

    /// Read the byte under the cursor, `None` at end of file.
    fn read_byte(&self, index: usize) -> Option<u8>;

    /// Write one byte at the cursor. Returns false if nothing was written.
    fn write_byte(&self, index: usize, byte: u8) -> bool;

    /// Move the cursor; the result code is passed to the user verbatim.
    fn seek(&self, index: usize, position: i32) -> i32;
}

/// Process creation, join and exit bookkeeping.
pub trait ProcessTable: Sync {
    /// Load and start the named program. Returns its id or a failure code.
    fn exec(&self, name: &str) -> i32;

    /// Block until process `id` exits. Returns its exit code or a failure code.
    fn join(&self, id: i32) -> i32;

    /// Record the caller's exit. The caller does not run again.
    fn exit(&self, exit_code: i32) -> i32;
}

/// Named counting semaphores.
///
/// Implementations must wake blocked waiters in FIFO order.
pub trait SemaphoreTable: Sync {
    /// Create a semaphore with an initial count.
    fn create(&self, name: &str, initial: i32) -> i32;

    /// Block until the count is positive, then decrement it.
    fn wait(&self, name: &str) -> i32;

    /// Increment the count, waking at most one waiter.
    fn signal(&self, name: &str) -> i32;
}

/// Machine power control.
pub trait Power: Sync {
    /// Stop the machine.
    fn halt(&self);
}

/// Everything a syscall handler may delegate to.
///
/// Built once at boot and shared by reference with every trap.
#[derive(Clone, Copy)]
pub struct Kernel<'k> {
    pub(crate) console: &'k dyn Console,
    pub(crate) fs: &'k dyn FileSystem,
    pub(crate) files: &'k dyn FileTable,
    pub(crate) procs: &'k dyn ProcessTable,
    pub(crate) sems: &'k dyn SemaphoreTable,
    pub(crate) power: &'k dyn Power,
    pub(crate) config: TrapConfig,
}

impl<'k> Kernel<'k> {
    /// Bundle the collaborators with the default limits.
    pub fn new(
        console: &'k dyn Console,
        fs: &'k dyn FileSystem,
        files: &'k dyn FileTable,
        procs: &'k dyn ProcessTable,
        sems: &'k dyn SemaphoreTable,
        power: &'k dyn Power,
    ) -> Self {
        Self {
            console,
            fs,
            files,
            procs,
            sems,
            power,
            config: TrapConfig::default(),
        }
    }

    /// Replace the marshalling limits (clamped to buffer capacity).
    pub fn with_config(mut self, config: TrapConfig) -> Self {
        self.config = config.clamped();
        self
    }

    /// The limits in force.
    pub fn config(&self) -> TrapConfig {
        self.config
    }
}

impl fmt::Debug for Kernel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedConsole, TestKernel};

    #[test]
    fn test_open_types() {
        assert_eq!(Access::from_open_type(0), Some(Access::READ | Access::WRITE));
        assert_eq!(Access::from_open_type(1), Some(Access::READ));
        assert_eq!(Access::from_open_type(2), None);
        assert_eq!(Access::from_open_type(-1), None);
    }

    #[test]
    fn test_read_line_stops_at_newline() {
        let console = ScriptedConsole::with_input(b"abc\ndef");
        let mut buf = [0u8; 16];
        assert_eq!(console.read_line(&mut buf), Ok(3));
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(console.read_byte(), Ok(Some(b'd')));
    }

    #[test]
    fn test_read_line_stops_when_full() {
        let console = ScriptedConsole::with_input(b"abcdef");
        let mut buf = [0u8; 4];
        assert_eq!(console.read_line(&mut buf), Ok(4));
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn test_read_line_propagates_error() {
        let console = ScriptedConsole::with_input(b"ab");
        console.fail_after_input();
        let mut buf = [0u8; 8];
        assert_eq!(console.read_line(&mut buf), Err(ConsoleError));
    }

    #[test]
    fn test_with_config_clamps() {
        let parts = TestKernel::new();
        let kernel = parts.kernel().with_config(TrapConfig {
            file_name_max: 1000,
            sem_name_max: 4,
        });
        assert_eq!(kernel.config().file_name_max, 32);
        assert_eq!(kernel.config().sem_name_max, 4);
    }
}
