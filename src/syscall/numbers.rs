//! System Call Numbers
//!
//! The fixed operation-code set of the user-program ABI. Codes 9 (Fork)
//! and 10 (Yield) exist in the user library but are not served here; they
//! decode to `None` like any other unknown code.

use core::fmt;

/// A served operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SyscallCode {
    Halt = 0,
    ExitProc = 1,
    ExecProc = 2,
    JoinProc = 3,
    CreateF = 4,
    OpenF = 5,
    ReadF = 6,
    WriteF = 7,
    CloseF = 8,
    ReadInt = 11,
    PrintInt = 12,
    ReadChar = 13,
    PrintChar = 14,
    ReadString = 15,
    PrintString = 16,
    SeekF = 17,
    CreateSemaphore = 18,
    Wait = 19,
    Signal = 20,
}

impl SyscallCode {
    /// Every served code, in numeric order.
    pub const ALL: [Self; 19] = [
        Self::Halt,
        Self::ExitProc,
        Self::ExecProc,
        Self::JoinProc,
        Self::CreateF,
        Self::OpenF,
        Self::ReadF,
        Self::WriteF,
        Self::CloseF,
        Self::ReadInt,
        Self::PrintInt,
        Self::ReadChar,
        Self::PrintChar,
        Self::ReadString,
        Self::PrintString,
        Self::SeekF,
        Self::CreateSemaphore,
        Self::Wait,
        Self::Signal,
    ];

    /// Decode a raw operation code.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Halt,
            1 => Self::ExitProc,
            2 => Self::ExecProc,
            3 => Self::JoinProc,
            4 => Self::CreateF,
            5 => Self::OpenF,
            6 => Self::ReadF,
            7 => Self::WriteF,
            8 => Self::CloseF,
            11 => Self::ReadInt,
            12 => Self::PrintInt,
            13 => Self::ReadChar,
            14 => Self::PrintChar,
            15 => Self::ReadString,
            16 => Self::PrintString,
            17 => Self::SeekF,
            18 => Self::CreateSemaphore,
            19 => Self::Wait,
            20 => Self::Signal,
            _ => return None,
        })
    }

    /// The raw operation code.
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Whether the calling program resumes after this call.
    #[inline]
    pub const fn returns(self) -> bool {
        !matches!(self, Self::ExitProc)
    }
}

impl TryFrom<i32> for SyscallCode {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(raw)
    }
}

impl fmt::Display for SyscallCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_matches_discriminant() {
        for code in SyscallCode::ALL {
            assert_eq!(SyscallCode::from_raw(code.raw()), Some(code));
        }
    }

    #[test]
    fn test_unserved_codes() {
        for raw in [-1, 9, 10, 21, i32::MAX, i32::MIN] {
            assert_eq!(SyscallCode::try_from(raw), Err(raw));
        }
    }

    #[test]
    fn test_only_exit_does_not_return() {
        let non_returning: Vec<_> = SyscallCode::ALL
            .iter()
            .filter(|code| !code.returns())
            .collect();
        assert_eq!(non_returning, [&SyscallCode::ExitProc]);
    }
}
