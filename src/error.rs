use std::borrow::Cow;
use std::fmt;
use std::io;

/// Result type used across the Encoded Script decoder.
pub type Result<T> = std::result::Result<T, Error>;

/// High-level error type surfaced by the decoder and its collaborators.
///
/// Decoding a located region never fails; these variants cover the layers
/// around it (file access, option validation, launch packages).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure while reading a sample from disk.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A fixed-width field of the carrier format could not be interpreted.
    #[error("corrupted encoded script while processing {section}: {details}")]
    Corrupted {
        section: Section,
        details: Cow<'static, str>,
    },

    /// Decode options are inconsistent or out of range.
    #[error("invalid decode options: {details}")]
    InvalidOptions { details: Cow<'static, str> },

    /// The input is larger than the configured read limit.
    #[error("input of {len} bytes exceeds the {limit} byte limit")]
    InputTooLarge { len: u64, limit: u64 },

    /// No candidate executable exists for a launch package.
    #[error("{package}: {details}")]
    PackageNotFound {
        package: Cow<'static, str>,
        details: Cow<'static, str>,
    },
}

/// Logical part of the carrier format, used for diagnostic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    LengthHeader { offset: usize },
    ChecksumField { offset: usize },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthHeader { offset } => write!(f, "length header at offset {offset}"),
            Self::ChecksumField { offset } => write!(f, "checksum field at offset {offset}"),
        }
    }
}
