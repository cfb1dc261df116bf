use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result, Section};

/// Width of the length header and of the checksum trailer.
pub const FIELD_LEN: usize = 8;

/// Decodes one 8-byte numeric field of the carrier format.
///
/// A field is six base64 characters followed by `==`, encoding a
/// little-endian `u32`. Both the declared region length after the start
/// marker and the checksum before the end marker use this layout.
///
/// # Errors
///
/// Returns [`Error::Corrupted`] if the field is short, is not canonical
/// base64, or does not decode to exactly four bytes.
pub fn decode_field(field: &[u8], section: Section) -> Result<u32> {
    if field.len() != FIELD_LEN {
        return Err(Error::Corrupted {
            section,
            details: Cow::Owned(format!(
                "expected {FIELD_LEN} bytes, found {}",
                field.len()
            )),
        });
    }
    let decoded = STANDARD.decode(field).map_err(|err| Error::Corrupted {
        section,
        details: Cow::Owned(err.to_string()),
    })?;
    if decoded.len() != 4 {
        return Err(Error::Corrupted {
            section,
            details: Cow::Owned(format!("decoded to {} bytes instead of 4", decoded.len())),
        });
    }
    Ok(LittleEndian::read_u32(&decoded))
}

/// Encodes `value` the way [`decode_field`] expects to read it.
#[must_use]
pub fn encode_field(value: u32) -> [u8; FIELD_LEN] {
    let mut raw = [0u8; 4];
    LittleEndian::write_u32(&mut raw, value);
    let mut field = [0u8; FIELD_LEN];
    // Four bytes always encode to six characters plus two padding bytes.
    let written = STANDARD
        .encode_slice(raw, &mut field)
        .unwrap_or_default();
    debug_assert_eq!(written, FIELD_LEN);
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: Section = Section::ChecksumField { offset: 0 };

    #[test]
    fn decodes_little_endian_values() {
        assert_eq!(decode_field(b"AAAAAA==", SECTION).unwrap(), 0);
        // 0x01 0x00 0x00 0x00
        assert_eq!(decode_field(b"AQAAAA==", SECTION).unwrap(), 1);
        // 0x00 0x01 0x00 0x00
        assert_eq!(decode_field(b"AAEAAA==", SECTION).unwrap(), 256);
        assert_eq!(decode_field(b"/////w==", SECTION).unwrap(), u32::MAX);
    }

    #[test]
    fn encode_matches_decode() {
        for value in [0u32, 1, 0x1234, 0xDEAD_BEEF, u32::MAX] {
            let field = encode_field(value);
            assert_eq!(&field[6..], b"==");
            assert_eq!(decode_field(&field, SECTION).unwrap(), value);
        }
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(decode_field(b"AAAA", SECTION).is_err());
        assert!(decode_field(b"AA!AAA==", SECTION).is_err());
        // Eight characters without padding decode to six bytes.
        assert!(decode_field(b"AAAAAAAA", SECTION).is_err());
        // Non-zero trailing bits are not canonical.
        assert!(decode_field(b"AAAAAB==", SECTION).is_err());
    }

    #[test]
    fn errors_name_the_section() {
        let err = decode_field(b"short", Section::LengthHeader { offset: 4 }).unwrap_err();
        assert!(err.to_string().contains("length header at offset 4"));
    }
}
