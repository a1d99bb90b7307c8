//! usertrap - Trap and System Call Boundary
//!
//! The single entry point through which a running user program re-enters
//! the kernel, either by an explicit service request (syscall) or by a
//! CPU-detected fault.
//!
//! # Trust Boundary
//! - The register file and the user address space are fully untrusted
//! - User memory is only touched through [`syscall::UserSpace`], which
//!   goes through the fallible [`Machine`] accessors byte by byte
//! - Every kernel-side buffer is bounded at compile time
//!
//! # Control Flow
//! ```text
//! trap ─► handle_exception ─► dispatch ─► handler ─► collaborator
//!                                │                       │
//!                                └── result into r2 ◄────┘
//!                                └── advance PC (unless ExitProc)
//! ```
//!
//! The console, file system, open-file table, process table and
//! semaphore table are collaborators reached through the traits in
//! [`kernel`]. They are bundled once into a [`Kernel`] context and passed
//! by reference into every handler.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod config;
pub mod exception;
pub mod kernel;
pub mod machine;
pub mod syscall;

#[cfg(test)]
mod testing;

pub use config::TrapConfig;
pub use exception::{handle_exception, ExceptionKind};
pub use kernel::{Access, Kernel};
pub use machine::{Machine, UserAddr};
pub use syscall::{SyscallCode, SyscallError, SyscallOutcome};
