//! Trap Entry
//!
//! Called by the machine simulator whenever a user program traps into
//! the kernel.
//!
//! # Exception Kinds
//! - NoException: nothing to do
//! - Syscall: explicit service request, see [`crate::syscall`]
//! - Everything else (page fault, read-only violation, bus error, address
//!   error, overflow, illegal instruction, the kind-count sentinel and any
//!   unrecognized value) is unsupported and fatal
//!
//! # Security Considerations
//! - A fatal exception halts the kernel instead of resuming a program in
//!   an undefined state
//! - Register state is only read for the diagnostic

use core::fmt;

use crate::kernel::Kernel;
use crate::machine::{regs, Machine};
use crate::syscall::{self, SyscallOutcome};

/// Exception kind reported by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExceptionKind {
    NoException = 0,
    Syscall = 1,
    PageFault = 2,
    ReadOnly = 3,
    BusError = 4,
    AddressError = 5,
    Overflow = 6,
    IllegalInstr = 7,
    NumExceptionTypes = 8,
    Unknown = -1,
}

impl From<i32> for ExceptionKind {
    fn from(raw: i32) -> Self {
        match raw {
            0 => ExceptionKind::NoException,
            1 => ExceptionKind::Syscall,
            2 => ExceptionKind::PageFault,
            3 => ExceptionKind::ReadOnly,
            4 => ExceptionKind::BusError,
            5 => ExceptionKind::AddressError,
            6 => ExceptionKind::Overflow,
            7 => ExceptionKind::IllegalInstr,
            8 => ExceptionKind::NumExceptionTypes,
            _ => ExceptionKind::Unknown,
        }
    }
}

impl ExceptionKind {
    /// Whether this kind is fatal to the kernel.
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::NoException | Self::Syscall)
    }

    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoException => "NoException",
            Self::Syscall => "SyscallException",
            Self::PageFault => "PageFaultException",
            Self::ReadOnly => "ReadOnlyException",
            Self::BusError => "BusErrorException",
            Self::AddressError => "AddressErrorException",
            Self::Overflow => "OverflowException",
            Self::IllegalInstr => "IllegalInstrException",
            Self::NumExceptionTypes => "NumExceptionTypes",
            Self::Unknown => "UnknownException",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle one trap from user mode.
///
/// # Panics
/// Panics for every fatal exception kind. The kernel's panic handler
/// halts the machine.
pub fn handle_exception(
    kernel: &Kernel<'_>,
    machine: &mut dyn Machine,
    kind: ExceptionKind,
) -> SyscallOutcome {
    match kind {
        ExceptionKind::NoException => SyscallOutcome::Resume,
        ExceptionKind::Syscall => syscall::dispatch(kernel, machine),
        fatal => report_fatal(fatal, &*machine),
    }
}

/// Print a diagnostic for an unsupported exception and abort.
fn report_fatal(kind: ExceptionKind, machine: &dyn Machine) -> ! {
    log::error!("[EXCEPTION] Unexpected user mode exception {}", kind);
    log::error!(
        "[EXCEPTION] PC: {:#010x}, r2: {}",
        machine.read_register(regs::PC),
        machine.read_register(regs::RETURN_VALUE)
    );
    panic!("Unexpected user mode exception {}", kind);
}
