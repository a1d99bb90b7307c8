//! User Memory Marshalling
//!
//! Copies data across the user/kernel boundary.
//!
//! # Security Principles
//! - Every access goes through the fallible [`Machine`] accessors, one
//!   byte at a time; no user address is ever dereferenced
//! - Copies land in bounded kernel buffers and are truncated, never
//!   overflowed, whatever length the user claims
//! - The first rejected access aborts the copy with `Fault`, so a
//!   half-finished transfer is never reported as success
//! - Data is copied once into the kernel before use (no TOCTOU)

use super::buffer::BoundedBuf;
use super::error::SyscallError;
use crate::machine::{Machine, UserAddr};

/// Byte-level access to the trapping program's address space.
///
/// Borrowed from the machine for the duration of one handler; nothing
/// read through it outlives the trap except what was copied out.
pub struct UserSpace<'m> {
    machine: &'m mut dyn Machine,
}

impl<'m> UserSpace<'m> {
    /// Wrap the trapping machine.
    pub fn new(machine: &'m mut dyn Machine) -> Self {
        Self { machine }
    }

    /// Read one byte.
    pub fn read_byte(&mut self, addr: UserAddr) -> Result<u8, SyscallError> {
        self.machine
            .read_mem(addr, 1)
            .map(|value| value as u8)
            .ok_or(SyscallError::Fault)
    }

    /// Write one byte.
    pub fn write_byte(&mut self, addr: UserAddr, byte: u8) -> Result<(), SyscallError> {
        if self.machine.write_mem(addr, 1, i32::from(byte)) {
            Ok(())
        } else {
            Err(SyscallError::Fault)
        }
    }

    /// Copy a null-terminated string into a kernel buffer.
    ///
    /// Copies at most `max_len` bytes (further capped by the buffer's
    /// capacity), stopping early at a zero byte. Longer strings are
    /// truncated. Fails on the first unreadable byte.
    pub fn read_string<const N: usize>(
        &mut self,
        addr: UserAddr,
        max_len: usize,
    ) -> Result<BoundedBuf<N>, SyscallError> {
        let mut buf = BoundedBuf::new();
        let limit = max_len.min(BoundedBuf::<N>::MAX_LEN);

        for offset in 0..limit {
            let byte = self.read_byte(addr.add(offset))?;
            if byte == 0 {
                break;
            }
            if buf.push(byte).is_err() {
                break;
            }
        }

        Ok(buf)
    }

    /// Copy `bytes` into user memory starting at `addr`.
    ///
    /// Stops at the first rejected byte.
    pub fn write_bytes(&mut self, addr: UserAddr, bytes: &[u8]) -> Result<(), SyscallError> {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write_byte(addr.add(offset), byte)?;
        }
        Ok(())
    }
}

/// View a marshalled name as text.
///
/// Empty names and names that are not UTF-8 are rejected.
pub fn name_str<const N: usize>(buf: &BoundedBuf<N>) -> Result<&str, SyscallError> {
    match buf.as_str() {
        Ok(name) if !name.is_empty() => Ok(name),
        _ => Err(SyscallError::InvalidArgument),
    }
}
