use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::decode_capped;

/// Field holding the decoded script text.
pub const FIELD_ENSCRIPT: &str = "enscript";

/// Appended to text cut at the output cap.
pub const TRUNCATION_MARKER: &str = "\r\n<truncated>";

pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 65_536;

/// Named text artifacts produced for one sample.
///
/// An empty report means there was nothing to report: no encoded block, an
/// unreadable file, or a block that decoded to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    fields: BTreeMap<String, String>,
}

impl Report {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Builds the report for decoded script bytes, capping the text at
    /// `max_chars` characters. A zero cap keeps no text at all.
    #[must_use]
    pub fn from_decoded(bytes: &[u8], max_chars: usize) -> Self {
        let mut report = Self::new();
        if bytes.is_empty() || max_chars == 0 {
            return report;
        }
        let (text, truncated) = decode_capped(bytes, max_chars);
        let mut text = text.into_owned();
        if truncated {
            text.push_str(TRUNCATION_MARKER);
        }
        report.insert(FIELD_ENSCRIPT, text);
        report
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn enscript(&self) -> Option<&str> {
        self.get(FIELD_ENSCRIPT)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytes_produce_an_empty_report() {
        let report = Report::from_decoded(b"", DEFAULT_MAX_OUTPUT_CHARS);
        assert!(report.is_empty());
        assert_eq!(report.enscript(), None);
    }

    #[test]
    fn short_text_is_stored_verbatim() {
        let report = Report::from_decoded(b"WScript.Echo 1\r\n", DEFAULT_MAX_OUTPUT_CHARS);
        assert_eq!(report.enscript(), Some("WScript.Echo 1\r\n"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn text_at_the_cap_is_not_marked() {
        let bytes = vec![b'x'; DEFAULT_MAX_OUTPUT_CHARS];
        let report = Report::from_decoded(&bytes, DEFAULT_MAX_OUTPUT_CHARS);
        let text = report.enscript().unwrap();
        assert_eq!(text.len(), DEFAULT_MAX_OUTPUT_CHARS);
        assert!(!text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn zero_cap_keeps_no_text() {
        let report = Report::from_decoded(b"WScript.Echo 1", 0);
        assert!(report.is_empty());
        assert_eq!(report.enscript(), None);
    }

    #[test]
    fn truncated_length_is_independent_of_overshoot() {
        let expected = DEFAULT_MAX_OUTPUT_CHARS + TRUNCATION_MARKER.chars().count();
        for extra in [1usize, 17, 100_000] {
            let bytes = vec![0xE9u8; DEFAULT_MAX_OUTPUT_CHARS + extra];
            let report = Report::from_decoded(&bytes, DEFAULT_MAX_OUTPUT_CHARS);
            let text = report.enscript().unwrap();
            assert_eq!(text.chars().count(), expected, "overshoot {extra}");
            assert!(text.ends_with(TRUNCATION_MARKER));
        }
    }

    #[test]
    fn serializes_as_a_flat_map() {
        let report = Report::from_decoded(b"abc", 16);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "enscript": "abc" }));
        assert_eq!(
            serde_json::to_string(&Report::new()).unwrap(),
            "{}"
        );
    }
}
