pub mod api;
pub mod error;
pub mod logger;
pub mod package;
pub mod parser;
pub mod report;
pub use crate::error::{Error, Result};
pub use api::{DecodeOptions, DecodeResult, DecodedScript, EncodedScriptFile, analyze_path};
pub use report::{FIELD_ENSCRIPT, Report, TRUNCATION_MARKER};

/// Decodes an in-memory buffer with default options.
///
/// Shorthand for [`api::decode`] when no custom markers or limits are needed.
#[must_use]
pub fn decode_bytes(source: &[u8]) -> DecodeResult {
    api::decode(source, &DecodeOptions::new())
}
