//! Semaphore Syscalls
//!
//! CreateSemaphore, Wait and Signal on named semaphores. Names are
//! marshalled into a buffer smaller than the one used for file names.
//! Wait may block the calling thread inside the semaphore table.

use super::args::SyscallArgs;
use super::buffer::BoundedBuf;
use super::error::{SysResult, SyscallError};
use super::validate::{name_str, UserSpace};
use crate::config::SEM_NAME_CAPACITY;
use crate::kernel::Kernel;

fn read_sem_name(
    kernel: &Kernel<'_>,
    args: &SyscallArgs,
    user: &mut UserSpace<'_>,
) -> Result<BoundedBuf<SEM_NAME_CAPACITY>, SyscallError> {
    let addr = args.addr1();
    if addr.is_null() {
        return Err(SyscallError::InvalidArgument);
    }
    user.read_string(addr, kernel.config.sem_name_max)
}

/// Create semaphore system call
///
/// # Arguments
/// * `arg1` - User address of the null-terminated semaphore name
/// * `arg2` - Initial count, must not be negative
///
/// # Returns
/// The semaphore table's result code, or -1 for a negative count or a
/// null, unreadable or unusable name
pub fn sys_create_semaphore(
    kernel: &Kernel<'_>,
    args: &SyscallArgs,
    user: &mut UserSpace<'_>,
) -> SysResult {
    if args.arg2 < 0 {
        return Err(SyscallError::InvalidArgument);
    }
    let buf = read_sem_name(kernel, args, user)?;
    let name = name_str(&buf)?;
    Ok(kernel.sems.create(name, args.arg2))
}

/// Wait(name) -> table code
///
/// May block inside the semaphore table until the count is positive.
pub fn sys_wait(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let buf = read_sem_name(kernel, args, user)?;
    let name = name_str(&buf)?;
    Ok(kernel.sems.wait(name))
}

/// Signal(name) -> table code
pub fn sys_signal(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let buf = read_sem_name(kernel, args, user)?;
    let name = name_str(&buf)?;
    Ok(kernel.sems.signal(name))
}
