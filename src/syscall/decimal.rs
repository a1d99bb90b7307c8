//! Decimal Text Conversion
//!
//! Integer <-> ASCII for the console syscalls. Covers the whole `i32`
//! range including `i32::MIN`, whose magnitude is taken as unsigned so
//! negation cannot overflow.

use crate::config::INT_TEXT_MAX;

/// Decimal rendering of one `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntText {
    bytes: [u8; INT_TEXT_MAX],
    len: usize,
}

impl IntText {
    /// The rendered digits, with a leading '-' if negative.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Render `value` in decimal.
pub fn format_i32(value: i32) -> IntText {
    let mut digits = [0u8; INT_TEXT_MAX];
    let mut count = 0;
    let mut magnitude = value.unsigned_abs();
    loop {
        digits[count] = b'0' + (magnitude % 10) as u8;
        count += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    let mut text = IntText {
        bytes: [0; INT_TEXT_MAX],
        len: 0,
    };
    if value < 0 {
        text.bytes[0] = b'-';
        text.len = 1;
    }
    for &digit in digits[..count].iter().rev() {
        text.bytes[text.len] = digit;
        text.len += 1;
    }
    text
}

/// Scan a decimal integer one byte at a time.
///
/// Accepts an optional leading '-' followed by digits. Scanning stops at
/// the first other byte (which is consumed), at end of input, or after
/// `INT_TEXT_MAX` bytes. Values outside `i32` wrap.
pub fn scan_i32(mut next_byte: impl FnMut() -> Option<u8>) -> i32 {
    let mut negative = false;
    let mut magnitude: i64 = 0;

    for position in 0..INT_TEXT_MAX {
        match next_byte() {
            Some(byte @ b'0'..=b'9') => magnitude = magnitude * 10 + i64::from(byte - b'0'),
            Some(b'-') if position == 0 => negative = true,
            _ => break,
        }
    }

    let value = if negative { -magnitude } else { magnitude };
    value as i32
}
