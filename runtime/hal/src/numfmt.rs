//! Integer/text conversion without allocation
//!
//! The shell reads integer literals with a lenient parser (sign, then digits
//! up to the first non-digit) and prints results through caller-provided
//! stack buffers.

/// Longest decimal rendering of an `i32` (`-2147483648`)
pub const I32_TEXT_LEN: usize = 11;

/// Longest hexadecimal rendering of a `u32`, without prefix
pub const U32_HEX_LEN: usize = 8;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Parse a signed decimal literal
///
/// Accepts an optional leading `-` followed by digits; parsing stops at the
/// first non-digit. Text without digits yields 0. Overflow wraps, so every
/// `i32` (including `i32::MIN`) round-trips through [`format_i32`].
pub fn parse_i32(text: &str) -> i32 {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let mut value: i32 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        value = value.wrapping_mul(10).wrapping_add((b - b'0') as i32);
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Render `value` in decimal into `buf`, returning the written text
pub fn format_i32(value: i32, buf: &mut [u8; I32_TEXT_LEN]) -> &str {
    let mut magnitude = value.unsigned_abs();
    let mut start = I32_TEXT_LEN;

    loop {
        start -= 1;
        buf[start] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    if value < 0 {
        start -= 1;
        buf[start] = b'-';
    }

    core::str::from_utf8(&buf[start..]).unwrap_or_default()
}

/// Render `value` as upper-case hex without leading zeros (`0` for zero)
pub fn format_hex_u32(value: u32, buf: &mut [u8; U32_HEX_LEN]) -> &str {
    let mut rest = value;
    let mut start = U32_HEX_LEN;

    loop {
        start -= 1;
        buf[start] = HEX_DIGITS[(rest & 0xF) as usize];
        rest >>= 4;
        if rest == 0 {
            break;
        }
    }

    core::str::from_utf8(&buf[start..]).unwrap_or_default()
}
