//! Syscall Arguments
//!
//! Snapshot of the argument registers taken once at trap entry. Handlers
//! read arguments from here and never touch the register file directly.

use crate::machine::{regs, Machine, UserAddr};

/// Raw operation code and arguments of one syscall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallArgs {
    pub code: i32,
    pub arg1: i32,
    pub arg2: i32,
    pub arg3: i32,
    pub arg4: i32,
}

impl SyscallArgs {
    /// Read r2 and r4..r7.
    pub fn from_machine(machine: &dyn Machine) -> Self {
        Self {
            code: machine.read_register(regs::SYSCALL_CODE),
            arg1: machine.read_register(regs::ARG1),
            arg2: machine.read_register(regs::ARG2),
            arg3: machine.read_register(regs::ARG3),
            arg4: machine.read_register(regs::ARG4),
        }
    }

    /// First argument as a user address.
    #[inline]
    pub const fn addr1(&self) -> UserAddr {
        UserAddr::from_register(self.arg1)
    }
}
