//! Process Syscalls
//!
//! Halt, ExecProc, JoinProc and ExitProc. Each is a thin shell around the
//! process table or the power switch; JoinProc may block the caller until
//! the child exits, and ExitProc never returns to its caller.

use super::args::SyscallArgs;
use super::buffer::BoundedBuf;
use super::error::{SysResult, SyscallError};
use super::validate::{name_str, UserSpace};
use crate::config::FILE_NAME_CAPACITY;
use crate::kernel::Kernel;

/// Halt system call
///
/// Asks the power switch to stop the machine. The result register is
/// still written and the PC still advanced, so a machine that keeps
/// running resumes cleanly after the trap.
///
/// # Returns
/// Always 0
pub fn sys_halt(kernel: &Kernel<'_>, _args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    log::info!("[SYSCALL] Shutdown, initiated by user program");
    kernel.power.halt();
    Ok(0)
}

/// Exec system call
///
/// Starts a new process running the named program.
///
/// # Arguments
/// * `arg1` - User address of the null-terminated program name
///
/// # Returns
/// The process table's result: the new process id, or its failure code.
/// -1 for a null, unreadable or unusable name.
///
/// # Security
/// - Null is rejected before user memory is read
/// - The name is copied into a bounded kernel buffer
pub fn sys_exec(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let addr = args.addr1();
    if addr.is_null() {
        return Err(SyscallError::InvalidArgument);
    }

    let buf: BoundedBuf<FILE_NAME_CAPACITY> =
        user.read_string(addr, kernel.config.file_name_max)?;
    let name = name_str(&buf)?;

    let pid = kernel.procs.exec(name);
    log::debug!("[SYSCALL] ExecProc: {:?} -> {}", name, pid);
    Ok(pid)
}

/// Join system call
///
/// Blocks until process `arg1` exits.
///
/// # Returns
/// The child's exit code, or the process table's failure code
pub fn sys_join(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    Ok(kernel.procs.join(args.arg1))
}

/// Exit system call
///
/// # Arguments
/// * `arg1` - Exit status code
///
/// # Returns
/// The process table's result. The dispatcher does not advance the PC
/// afterwards; the program is never resumed.
///
/// # Security
/// No validation needed - any status code is acceptable
pub fn sys_exit(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    log::debug!("[SYSCALL] ExitProc({})", args.arg1);
    Ok(kernel.procs.exit(args.arg1))
}
