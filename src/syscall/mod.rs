//! System Call Interface
//!
//! Serves the fixed syscall set of the user-program ABI.
//!
//! # Security Model
//! - Whitelist approach: only the codes in [`SyscallCode`] do anything
//! - All parameters are validated before any collaborator is called
//! - Invalid inputs return an error code, never panic
//! - User memory is copied through bounded kernel buffers
//!
//! # Register Convention
//! - r2: operation code in, result out
//! - r4..r7: arguments 1-4

mod args;
mod buffer;
mod console;
mod decimal;
mod error;
mod file;
mod handler;
mod numbers;
mod process;
mod semaphore;
mod validate;


pub use args::SyscallArgs;
pub use buffer::{BoundedBuf, CapacityError};
pub use decimal::{format_i32, scan_i32, IntText};
pub use error::{SysResult, SyscallError};
pub use file::{CONSOLE_INPUT, CONSOLE_OUTPUT, FIRST_FILE_HANDLE};
pub use handler::{dispatch, handler_for, SyscallHandler, SyscallOutcome};
pub use numbers::SyscallCode;
pub use validate::{name_str, UserSpace};
