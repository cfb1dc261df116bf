use std::borrow::Cow;
use std::fmt;

use crate::error::Section;
use crate::parser::boundary::Region;
use crate::parser::header::decode_field;

/// Outcome of comparing the computed checksum with the stored trailer.
///
/// Advisory only: every variant still carries decoded text upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumCheck {
    Valid {
        value: u32,
    },
    Mismatch {
        stored: u32,
        computed: u32,
    },
    /// The trailer is missing or is not a well-formed field.
    Unreadable {
        computed: u32,
        details: Cow<'static, str>,
    },
}

impl ChecksumCheck {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    #[must_use]
    pub const fn computed(&self) -> u32 {
        match self {
            Self::Valid { value } => *value,
            Self::Mismatch { computed, .. } | Self::Unreadable { computed, .. } => *computed,
        }
    }

    #[must_use]
    pub const fn stored(&self) -> Option<u32> {
        match self {
            Self::Valid { value } => Some(*value),
            Self::Mismatch { stored, .. } => Some(*stored),
            Self::Unreadable { .. } => None,
        }
    }
}

impl fmt::Display for ChecksumCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { value } => write!(f, "valid (0x{value:08X})"),
            Self::Mismatch { stored, computed } => write!(
                f,
                "mismatch (stored 0x{stored:08X}, computed 0x{computed:08X})"
            ),
            Self::Unreadable { computed, details } => {
                write!(f, "unreadable (computed 0x{computed:08X}): {details}")
            }
        }
    }
}

/// Compares `computed` against the checksum trailer that follows `region`.
#[must_use]
pub fn verify_checksum(source: &[u8], region: &Region, computed: u32) -> ChecksumCheck {
    let range = region.checksum_field();
    let section = Section::ChecksumField {
        offset: range.start,
    };
    let field = source.get(range).unwrap_or_default();
    match decode_field(field, section) {
        Ok(stored) if stored == computed => ChecksumCheck::Valid { value: computed },
        Ok(stored) => ChecksumCheck::Mismatch { stored, computed },
        Err(err) => ChecksumCheck::Unreadable {
            computed,
            details: Cow::Owned(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::header::encode_field;

    fn with_trailer(trailer: &[u8]) -> (Vec<u8>, Region) {
        let mut source = b"payload".to_vec();
        source.extend_from_slice(trailer);
        let region = Region {
            start_marker: 0,
            end_marker: source.len(),
            start: 0,
            end: 7,
        };
        (source, region)
    }

    #[test]
    fn matching_trailer_is_valid() {
        let (source, region) = with_trailer(&encode_field(0x1234));
        let check = verify_checksum(&source, &region, 0x1234);
        assert!(check.is_valid());
        assert_eq!(check.stored(), Some(0x1234));
    }

    #[test]
    fn different_trailer_is_a_mismatch() {
        let (source, region) = with_trailer(&encode_field(7));
        let check = verify_checksum(&source, &region, 8);
        assert_eq!(
            check,
            ChecksumCheck::Mismatch {
                stored: 7,
                computed: 8
            }
        );
        assert!(!check.is_valid());
        assert_eq!(check.computed(), 8);
    }

    #[test]
    fn garbage_or_truncated_trailer_is_unreadable() {
        let (source, region) = with_trailer(b"!!!!!!!!");
        assert!(matches!(
            verify_checksum(&source, &region, 1),
            ChecksumCheck::Unreadable { computed: 1, .. }
        ));

        let (source, region) = with_trailer(b"AAA");
        let check = verify_checksum(&source, &region, 0);
        assert!(!check.is_valid());
        assert_eq!(check.stored(), None);
    }

    #[test]
    fn display_reports_both_values() {
        let check = ChecksumCheck::Mismatch {
            stored: 1,
            computed: 2,
        };
        assert_eq!(
            check.to_string(),
            "mismatch (stored 0x00000001, computed 0x00000002)"
        );
    }
}
