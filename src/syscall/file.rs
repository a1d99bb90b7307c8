//! File Syscalls
//!
//! CreateF, OpenF, CloseF, ReadF, WriteF and SeekF.
//!
//! # Handles
//! - 0: console input, 1: console output; never in the file table
//! - n >= 2: open-file table slot `n - 2`
//!
//! Data moves one byte at a time between user memory and the file or
//! console, so a fault part-way through is reported without claiming the
//! bytes that were not transferred.

use super::args::SyscallArgs;
use super::error::{SysResult, SyscallError};
use super::validate::{name_str, UserSpace};
use super::buffer::BoundedBuf;
use crate::config::FILE_NAME_CAPACITY;
use crate::kernel::{Access, Kernel};
use crate::machine::UserAddr;

/// Console input handle.
pub const CONSOLE_INPUT: i32 = 0;
/// Console output handle.
pub const CONSOLE_OUTPUT: i32 = 1;
/// First handle backed by the open-file table.
pub const FIRST_FILE_HANDLE: i32 = 2;

/// Translate a user handle into an open-file table slot.
///
/// Console handles and negative values are rejected.
pub fn table_index(handle: i32) -> Result<usize, SyscallError> {
    handle
        .checked_sub(FIRST_FILE_HANDLE)
        .and_then(|index| usize::try_from(index).ok())
        .ok_or(SyscallError::BadHandle)
}

/// Translate an open-file table slot into a user handle.
fn handle_for(index: usize) -> Result<i32, SyscallError> {
    i32::try_from(index)
        .ok()
        .and_then(|index| index.checked_add(FIRST_FILE_HANDLE))
        .ok_or(SyscallError::TableFull)
}

fn read_file_name(
    kernel: &Kernel<'_>,
    user: &mut UserSpace<'_>,
    addr: UserAddr,
) -> Result<BoundedBuf<FILE_NAME_CAPACITY>, SyscallError> {
    user.read_string(addr, kernel.config.file_name_max)
}

/// Byte count argument; negative counts are rejected.
fn byte_count(raw: i32) -> Result<usize, SyscallError> {
    usize::try_from(raw).map_err(|_| SyscallError::InvalidArgument)
}

/// Create file system call
///
/// Creates an empty file.
///
/// # Arguments
/// * `arg1` - User address of the null-terminated file name
///
/// # Returns
/// 0 on success, -1 if the name is unusable or the file system refuses
///
/// # Security
/// - The name is copied into a bounded kernel buffer before use
/// - An unreadable, empty or non-UTF-8 name never reaches the file system
pub fn sys_create(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let buf = read_file_name(kernel, user, args.addr1())?;
    let name = name_str(&buf)?;

    if kernel.fs.create(name, 0) {
        log::debug!("[SYSCALL] CreateF: created {:?}", name);
        Ok(0)
    } else {
        log::debug!("[SYSCALL] CreateF: file system refused {:?}", name);
        Ok(-1)
    }
}

/// Open file system call
///
/// # Arguments
/// * `arg1` - User address of the null-terminated file name
/// * `arg2` - Open type: 0 read-write, 1 read-only
///
/// # Returns
/// The new handle (2 or above), or -1
///
/// # Security
/// - The open type is checked before the file system is touched
/// - A file that does not fit in the table is closed again
pub fn sys_open(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let access = Access::from_open_type(args.arg2).ok_or(SyscallError::InvalidArgument)?;
    let buf = read_file_name(kernel, user, args.addr1())?;
    let name = name_str(&buf)?;

    let file = kernel.fs.open(name).ok_or(SyscallError::NoSuchFile)?;
    match kernel.files.open(file, access) {
        Ok(index) => {
            let handle = handle_for(index)?;
            log::debug!("[SYSCALL] OpenF: {:?} -> handle {}", name, handle);
            Ok(handle)
        }
        // The rejected file is dropped here, which closes it.
        Err(_file) => Err(SyscallError::TableFull),
    }
}

/// Close file system call
///
/// # Arguments
/// * `arg1` - Handle returned by OpenF
///
/// # Returns
/// The table's result code; -1 for console handles and negative values
pub fn sys_close(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    let index = table_index(args.arg1)?;
    Ok(kernel.files.close(index))
}

/// Read system call
///
/// Reads up to `count` bytes from the console or an open file into a
/// user buffer.
///
/// # Arguments
/// * `arg1` - User buffer address
/// * `arg2` - Maximum number of bytes to read
/// * `arg3` - Handle: 0 for console input, or one returned by OpenF
///
/// # Returns
/// Bytes read (fewer at end of input), -1 on a bad argument or fault,
/// -2 on a console error
///
/// # Security
/// - Negative counts and unopened handles are rejected
/// - Every byte is stored through the fallible marshaller; a fault
///   part-way through returns -1, never the partial count
pub fn sys_read(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let buffer = args.addr1();
    let count = byte_count(args.arg2)?;
    let handle = args.arg3;

    let mut transferred = 0;
    if handle == CONSOLE_INPUT {
        while transferred < count {
            let byte = match kernel.console.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => break,
                Err(_) => return Err(SyscallError::Io),
            };
            user.write_byte(buffer.add(transferred), byte)?;
            transferred += 1;
        }
    } else {
        let index = table_index(handle)?;
        kernel.files.access(index).ok_or(SyscallError::BadHandle)?;
        while transferred < count {
            let Some(byte) = kernel.files.read_byte(index) else {
                break;
            };
            user.write_byte(buffer.add(transferred), byte)?;
            transferred += 1;
        }
    }

    Ok(transferred as i32)
}

/// Write system call
///
/// # Arguments
/// * `arg1` - User buffer address
/// * `arg2` - Number of bytes to write
/// * `arg3` - Handle: 1 for console output, or one returned by OpenF
///
/// # Returns
/// Bytes written, or -1. A file that stops accepting bytes ends the
/// write early; the count returned is what the file took.
///
/// # Security
/// - Read-only handles are refused before any byte moves
/// - An unreadable user byte returns -1, never the partial count
pub fn sys_write(kernel: &Kernel<'_>, args: &SyscallArgs, user: &mut UserSpace<'_>) -> SysResult {
    let buffer = args.addr1();
    let count = byte_count(args.arg2)?;
    let handle = args.arg3;

    let mut transferred = 0;
    if handle == CONSOLE_OUTPUT {
        while transferred < count {
            let byte = user.read_byte(buffer.add(transferred))?;
            kernel.console.write(&[byte]);
            transferred += 1;
        }
    } else {
        let index = table_index(handle)?;
        let access = kernel.files.access(index).ok_or(SyscallError::BadHandle)?;
        if !access.contains(Access::WRITE) {
            return Err(SyscallError::NotWritable);
        }
        while transferred < count {
            let byte = user.read_byte(buffer.add(transferred))?;
            if !kernel.files.write_byte(index, byte) {
                log::warn!("[SYSCALL] WriteF: short write on handle {}", handle);
                break;
            }
            transferred += 1;
        }
    }

    Ok(transferred as i32)
}

/// Seek system call
///
/// # Arguments
/// * `arg1` - New position, or -1 for end of file
/// * `arg2` - Handle returned by OpenF
///
/// # Returns
/// The table's result code; -1 for console handles
pub fn sys_seek(kernel: &Kernel<'_>, args: &SyscallArgs, _user: &mut UserSpace<'_>) -> SysResult {
    let index = table_index(args.arg2)?;
    Ok(kernel.files.seek(index, args.arg1))
}
