//! Console Syscalls
//!
//! ReadInt, PrintInt, ReadChar, PrintChar, ReadString and PrintString.
//! All of them talk to the synchronized console; reads may block the
//! calling thread until input arrives.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::args::SyscallArgs;
use super::buffer::BoundedBuf;
use super::decimal;
use super::error::{SysResult, SyscallError};
use super::validate::UserSpace;
use crate::config::PRINT_STRING_MAX;
use crate::kernel::Kernel;
use crate::machine::UserAddr;

/// Shown on the console when ReadString cannot get a kernel buffer.
const OUT_OF_MEMORY_NOTICE: &[u8] = b"Not enough memory in system.\n";

/// ReadInt() -> value
///
/// End of input or a read error simply ends the scan.
pub fn sys_read_int(kernel: &Kernel<'_>, _args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    let value = decimal::scan_i32(|| kernel.console.read_byte().ok().flatten());
    Ok(value)
}

/// PrintInt(value) -> 0
pub fn sys_print_int(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    let text = decimal::format_i32(args.arg1);
    kernel.console.write(text.as_bytes());
    Ok(0)
}

/// ReadChar() -> character code
///
/// Returns 0 at end of input.
pub fn sys_read_char(kernel: &Kernel<'_>, _args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    match kernel.console.read_byte() {
        Ok(byte) => Ok(byte.map_or(0, i32::from)),
        Err(_) => Err(SyscallError::Io),
    }
}

/// PrintChar(character) -> 0
pub fn sys_print_char(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    kernel.console.write(&[args.arg1 as u8]);
    Ok(0)
}

/// ReadString(buffer, length) -> 0 / -1 / -2
///
/// Reads one console line of at most `length - 1` bytes and stores it,
/// null-terminated, at `buffer`.
///
/// # Arguments
/// - `buffer`: user destination, `length` bytes long
/// - `length`: buffer size including the terminator
///
/// # Returns
/// - 0 on success, and for a non-positive length (nothing is read)
/// - -1 if the kernel buffer cannot be allocated or `buffer` faults
/// - -2 if the console reports a read error
pub fn sys_read_string(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let Ok(length) = usize::try_from(args.arg2) else {
        return Ok(0);
    };
    if length == 0 {
        return Ok(0);
    }
    store_line(kernel, user, args.addr1(), line_buffer(length))
}

/// Zeroed kernel buffer for one console line.
fn line_buffer(length: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut line = Vec::new();
    line.try_reserve_exact(length)?;
    line.resize(length, 0);
    Ok(line)
}

/// Read a line into `line` and copy it out to `addr`.
fn store_line(
    kernel: &Kernel<'_>,
    user: &mut UserSpace<'_>,
    addr: UserAddr,
    line: Result<Vec<u8>, TryReserveError>,
) -> SysResult {
    let mut line = match line {
        Ok(line) => line,
        Err(err) => {
            log::error!("[SYSCALL] ReadString: cannot allocate line buffer: {}", err);
            kernel.console.write(OUT_OF_MEMORY_NOTICE);
            return Err(SyscallError::OutOfMemory);
        }
    };
    let Some(capacity) = line.len().checked_sub(1) else {
        return Ok(0);
    };

    let read = kernel
        .console
        .read_line(&mut line[..capacity])
        .map_err(|_| SyscallError::Io)?;

    // An embedded zero ends the string.
    let end = line[..read].iter().position(|&b| b == 0).unwrap_or(read);
    user.write_bytes(addr, &line[..end])?;
    user.write_byte(addr.add(end), 0)?;
    Ok(0)
}

/// PrintString(buffer) -> 0
///
/// Prints up to `PRINT_STRING_MAX` bytes or up to the first zero byte.
/// Nothing is printed if the string cannot be read completely.
pub fn sys_print_string(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let text: BoundedBuf<{ PRINT_STRING_MAX + 1 }> =
        user.read_string(args.addr1(), PRINT_STRING_MAX)?;
    kernel.console.write(text.as_bytes());
    Ok(0)
}
