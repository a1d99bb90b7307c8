//! System Call Dispatcher
//!
//! Decodes the operation code, runs exactly one handler, writes its
//! result to r2 and steps the program counter past the trap.
//!
//! # Guarantees
//! - Unknown codes do nothing except advance the PC, so the program
//!   does not trap on the same instruction forever
//! - Every served code except ExitProc advances the PC
//! - Handlers see arguments only through [`SyscallArgs`] and user memory
//!   only through [`UserSpace`]; the result register is written once,
//!   after the handler has finished

use super::args::SyscallArgs;
use super::error::SysResult;
use super::numbers::SyscallCode;
use super::validate::UserSpace;
use super::{console, file, process, semaphore};
use crate::kernel::Kernel;
use crate::machine::{regs, Machine};

/// Signature shared by every syscall handler.
pub type SyscallHandler = fn(&Kernel<'_>, &SyscallArgs, &mut UserSpace<'_>) -> SysResult;

/// What the trapping program does next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Resume the calling program past the trap instruction.
    Resume,
    /// The calling program has exited and must not be resumed.
    Exited,
    /// The machine has been asked to stop.
    Halted,
}

/// The handler serving `code`.
pub const fn handler_for(code: SyscallCode) -> SyscallHandler {
    match code {
        SyscallCode::Halt => process::sys_halt,
        SyscallCode::ExitProc => process::sys_exit,
        SyscallCode::ExecProc => process::sys_exec,
        SyscallCode::JoinProc => process::sys_join,
        SyscallCode::CreateF => file::sys_create,
        SyscallCode::OpenF => file::sys_open,
        SyscallCode::ReadF => file::sys_read,
        SyscallCode::WriteF => file::sys_write,
        SyscallCode::CloseF => file::sys_close,
        SyscallCode::ReadInt => console::sys_read_int,
        SyscallCode::PrintInt => console::sys_print_int,
        SyscallCode::ReadChar => console::sys_read_char,
        SyscallCode::PrintChar => console::sys_print_char,
        SyscallCode::ReadString => console::sys_read_string,
        SyscallCode::PrintString => console::sys_print_string,
        SyscallCode::SeekF => file::sys_seek,
        SyscallCode::CreateSemaphore => semaphore::sys_create_semaphore,
        SyscallCode::Wait => semaphore::sys_wait,
        SyscallCode::Signal => semaphore::sys_signal,
    }
}

/// Dispatch the syscall described by the machine's registers.
pub fn dispatch(kernel: &Kernel<'_>, machine: &mut dyn Machine) -> SyscallOutcome {
    let args = SyscallArgs::from_machine(&*machine);

    let Some(code) = SyscallCode::from_raw(args.code) else {
        log::warn!("[SYSCALL] Unknown syscall: {}", args.code);
        machine.advance_pc();
        return SyscallOutcome::Resume;
    };

    log::trace!(
        "[SYSCALL] {}({:#x}, {:#x}, {:#x}, {:#x})",
        code,
        args.arg1,
        args.arg2,
        args.arg3,
        args.arg4
    );

    let result = {
        let mut user = UserSpace::new(&mut *machine);
        handler_for(code)(kernel, &args, &mut user)
    };

    let value = match result {
        Ok(value) => value,
        Err(err) => {
            log::warn!("[SYSCALL] {}: {}", code, err);
            err.code()
        }
    };
    machine.write_register(regs::RETURN_VALUE, value);

    if !code.returns() {
        return SyscallOutcome::Exited;
    }
    machine.advance_pc();

    match code {
        SyscallCode::Halt => SyscallOutcome::Halted,
        _ => SyscallOutcome::Resume,
    }
}
