use std::borrow::Cow;

use encoding_rs::mem::decode_latin1;

/// Decodes at most `max_chars` bytes as ISO-8859-1.
///
/// Each byte maps to exactly one `char`, so the cap is a byte count and the
/// conversion cannot fail. Returns the text and whether input was dropped.
#[must_use]
pub fn decode_capped(bytes: &[u8], max_chars: usize) -> (Cow<'_, str>, bool) {
    if bytes.len() > max_chars {
        (decode_latin1(&bytes[..max_chars]), true)
    } else {
        (decode_latin1(bytes), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_borrowed() {
        let (text, truncated) = decode_capped(b"WScript.Echo", 64);
        assert!(matches!(text, Cow::Borrowed("WScript.Echo")));
        assert!(!truncated);
    }

    #[test]
    fn high_bytes_map_to_latin1() {
        let (text, _) = decode_capped(&[0x41, 0xE9, 0xFF, 0x80], 64);
        assert_eq!(text, "A\u{e9}\u{ff}\u{80}");
        assert_eq!(text.chars().count(), 4);
    }

    #[test]
    fn cap_counts_characters() {
        let bytes = [0xE9u8; 10];
        let (text, truncated) = decode_capped(&bytes, 4);
        assert!(truncated);
        assert_eq!(text.chars().count(), 4);
        let (_, truncated) = decode_capped(&bytes, 10);
        assert!(!truncated);
    }
}
