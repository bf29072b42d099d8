use encoding_rs::UTF_16BE;

use crate::error::ObjectError;

pub(crate) fn parse_u32(s: &str) -> Result<u32, ObjectError> {
    s.parse()
        .map_err(|_| ObjectError::MalformedInteger(s.to_string()))
}

pub(crate) fn parse_usize(s: &str) -> Result<usize, ObjectError> {
    s.parse()
        .map_err(|_| ObjectError::MalformedInteger(s.to_string()))
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Two hex digits per byte. A trailing odd digit is dropped.
pub(crate) fn hex_to_bytes(digits: &str) -> Vec<u8> {
    digits
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect()
}

/// Two hex digits per byte. A trailing odd digit is completed with `0`.
pub(crate) fn padded_hex_to_bytes(digits: &str) -> Vec<u8> {
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => (nibble(*hi) << 4) | nibble(*lo),
            [hi] => nibble(*hi) << 4,
            _ => 0,
        })
        .collect()
}

/// Big-endian 16-bit units; an odd trailing byte gets a zero low byte.
pub(crate) fn be_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [hi] => u16::from_be_bytes([*hi, 0]),
            _ => 0,
        })
        .collect()
}

/// Malformed input (odd length, lone surrogates) becomes U+FFFD.
pub(crate) fn utf16be_to_string(bytes: &[u8]) -> String {
    let (text, _) = UTF_16BE.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Split decoded stream text on CRLF, CR and LF. A trailing terminator
/// leaves an empty last line.
pub(crate) fn split_decoded_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn hex_drops_trailing_digit() {
        assert_eq!(hex_to_bytes("0041"), [0x00, 0x41]);
        assert_eq!(hex_to_bytes("00414"), [0x00, 0x41]);
        assert_eq!(hex_to_bytes("a"), Vec::<u8>::new());
        assert_eq!(hex_to_bytes("fF"), [0xff]);
    }

    #[test_log::test]
    fn padded_hex_completes_trailing_digit() {
        assert_eq!(padded_hex_to_bytes("041"), [0x04, 0x10]);
        assert_eq!(padded_hex_to_bytes("4"), [0x40]);
        assert_eq!(padded_hex_to_bytes("0041"), [0x00, 0x41]);
    }

    #[test_log::test]
    fn units_pad_odd_byte() {
        assert_eq!(be_units(&[0x00, 0x41, 0x30]), [0x0041, 0x3000]);
    }

    #[test_log::test]
    fn utf16be_replaces_malformed() {
        assert_eq!(utf16be_to_string(&[0x30, 0x42]), "\u{3042}");
        assert_eq!(utf16be_to_string(&[0x00, 0x41, 0x00]), "A\u{FFFD}");
        assert_eq!(utf16be_to_string(&[0xfe, 0xff, 0x00, 0x41]), "\u{FEFF}A");
    }

    #[test_log::test]
    fn decoded_lines() {
        assert_eq!(split_decoded_lines("a\r\nb\rc\nd"), ["a", "b", "c", "d"]);
        assert_eq!(split_decoded_lines("a\n\rb"), ["a", "", "b"]);
        assert_eq!(split_decoded_lines("a\n"), ["a", ""]);
    }

    #[test_log::test]
    fn integers() {
        assert_eq!(parse_u32("12").unwrap(), 12);
        assert!(matches!(parse_u32("4294967296"), Err(ObjectError::MalformedInteger(_))));
        assert_eq!(parse_usize("1024").unwrap(), 1024);
    }
}
