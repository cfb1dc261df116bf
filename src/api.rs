use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Section};
use crate::logger::log_warn;
use crate::parser::{
    ChecksumCheck, Markers, Region, decode_capped, decode_field, locate_region, transform_region,
    verify_checksum,
};
use crate::report::{DEFAULT_MAX_OUTPUT_CHARS, Report};

pub const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Configures marker search, input limits and the output cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    markers: Markers,
    max_output_chars: usize,
    max_input_bytes: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            markers: Markers::DEFAULT,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    #[must_use]
    pub fn with_markers(mut self, start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        self.markers = Markers::new(start, end);
        self
    }

    #[must_use]
    pub const fn with_max_output_chars(mut self, count: usize) -> Self {
        self.max_output_chars = count;
        self
    }

    #[must_use]
    pub const fn with_max_input_bytes(mut self, count: u64) -> Self {
        self.max_input_bytes = count;
        self
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[must_use]
    pub const fn max_output_chars(&self) -> usize {
        self.max_output_chars
    }

    #[must_use]
    pub const fn max_input_bytes(&self) -> u64 {
        self.max_input_bytes
    }

    /// Checks the options for values that would make decoding meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] for a zero output cap, a zero input
    /// limit, or unusable markers.
    pub fn validate(&self) -> Result<()> {
        if self.max_output_chars == 0 {
            return Err(Error::InvalidOptions {
                details: "output cap must be at least one character".into(),
            });
        }
        if self.max_input_bytes == 0 {
            return Err(Error::InvalidOptions {
                details: "input limit must be at least one byte".into(),
            });
        }
        self.markers.validate()
    }
}

/// Result of decoding one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// No start/end marker pair was found.
    NotEncoded,
    Decoded(DecodedScript),
}

impl DecodeResult {
    #[must_use]
    pub const fn is_encoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    #[must_use]
    pub const fn decoded(&self) -> Option<&DecodedScript> {
        match self {
            Self::Decoded(script) => Some(script),
            Self::NotEncoded => None,
        }
    }

    #[must_use]
    pub fn into_decoded(self) -> Option<DecodedScript> {
        match self {
            Self::Decoded(script) => Some(script),
            Self::NotEncoded => None,
        }
    }

    /// Assembles the report for this result; empty when not encoded.
    #[must_use]
    pub fn to_report(&self, max_output_chars: usize) -> Report {
        self.decoded().map_or_else(Report::new, |script| {
            Report::from_decoded(&script.bytes, max_output_chars)
        })
    }
}

/// Plaintext recovered from an encoded block, with integrity hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedScript {
    pub region: Region,
    pub bytes: Vec<u8>,
    pub transforms: usize,
    pub unmapped_escapes: usize,
    pub checksum: ChecksumCheck,
    /// Region length stated by the header, when the header is well formed.
    pub declared_len: Option<u32>,
}

impl DecodedScript {
    /// The full decoded text; every byte maps to one character.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        decode_capped(&self.bytes, self.bytes.len()).0
    }

    #[must_use]
    pub const fn checksum_valid(&self) -> bool {
        self.checksum.is_valid()
    }

    #[must_use]
    pub fn declared_len_matches(&self) -> bool {
        self.declared_len
            .is_some_and(|len| usize::try_from(len).is_ok_and(|len| len == self.region.len()))
    }
}

/// Runs the full pipeline over an in-memory buffer.
///
/// Never fails: corruption inside a located block is reported through
/// [`DecodedScript::checksum`], `declared_len` and the diagnostics log.
/// Options rejected by [`DecodeOptions::validate`] decode nothing.
#[must_use]
pub fn decode(source: &[u8], options: &DecodeOptions) -> DecodeResult {
    if let Err(err) = options.validate() {
        log_warn(&err.to_string());
        return DecodeResult::NotEncoded;
    }
    let Some(region) = locate_region(source, options.markers()) else {
        return DecodeResult::NotEncoded;
    };

    let output = transform_region(source, &region);
    let checksum = verify_checksum(source, &region, output.checksum);
    if !checksum.is_valid() {
        log_warn(&format!("invalid checksum for encoded script: {checksum}"));
    }

    let declared_len = read_declared_len(source, &region);
    if let Some(len) = declared_len
        && !usize::try_from(len).is_ok_and(|len| len == region.len())
    {
        log_warn(&format!(
            "length header declares {len} bytes but the encoded region spans {}",
            region.len()
        ));
    }
    if output.unmapped_escapes > 0 {
        log_warn(&format!(
            "{} escape sequence(s) without a mapping decoded as '?'",
            output.unmapped_escapes
        ));
    }

    DecodeResult::Decoded(DecodedScript {
        region,
        bytes: output.bytes,
        transforms: output.transforms,
        unmapped_escapes: output.unmapped_escapes,
        checksum,
        declared_len,
    })
}

fn read_declared_len(source: &[u8], region: &Region) -> Option<u32> {
    let range = region.length_header();
    let section = Section::LengthHeader {
        offset: range.start,
    };
    let field = source.get(range).unwrap_or_default();
    match decode_field(field, section) {
        Ok(len) => Some(len),
        Err(err) => {
            log_warn(&err.to_string());
            None
        }
    }
}

/// A candidate sample read fully into memory.
pub struct EncodedScriptFile {
    path: PathBuf,
    source: Vec<u8>,
    options: DecodeOptions,
}

impl EncodedScriptFile {
    /// Reads `path` with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or exceeds the input limit.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::new())
    }

    /// Reads `path` as raw bytes, refusing files above the input limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid, the file cannot be read,
    /// or it is larger than [`DecodeOptions::max_input_bytes`].
    pub fn open_with_options(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        options.validate()?;
        let path = path.as_ref();
        let file = File::open(path)?;
        let limit = options.max_input_bytes();
        let len = file.metadata()?.len();
        if len > limit {
            return Err(Error::InputTooLarge { len, limit });
        }

        let mut source = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
        // The file may grow between the metadata call and the read.
        file.take(limit.saturating_add(1)).read_to_end(&mut source)?;
        let read = u64::try_from(source.len()).unwrap_or(u64::MAX);
        if read > limit {
            return Err(Error::InputTooLarge { len: read, limit });
        }

        Ok(Self {
            path: path.to_path_buf(),
            source,
            options,
        })
    }

    /// Wraps an in-memory buffer, e.g. a sample extracted from an archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid.
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        source: Vec<u8>,
        options: DecodeOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            path: path.into(),
            source,
            options,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    #[must_use]
    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[must_use]
    pub fn decode(&self) -> DecodeResult {
        decode(&self.source, &self.options)
    }

    #[must_use]
    pub fn report(&self) -> Report {
        self.decode().to_report(self.options.max_output_chars())
    }
}

/// Reads and decodes the sample at `path`.
///
/// Any failure to read the file yields an empty report; the cause is logged.
#[must_use]
pub fn analyze_path(path: impl AsRef<Path>, options: &DecodeOptions) -> Report {
    let path = path.as_ref();
    match EncodedScriptFile::open_with_options(path, options.clone()) {
        Ok(file) => file.report(),
        Err(err) => {
            log_warn(&format!("unable to read {}: {err}", path.display()));
            Report::new()
        }
    }
}
