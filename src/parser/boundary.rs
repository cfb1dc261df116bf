use std::borrow::Cow;
use std::ops::Range;

use memchr::memmem;

use crate::error::{Error, Result};
use crate::parser::header::FIELD_LEN;

pub const START_MARKER: &[u8; 4] = b"#@~^";
pub const END_MARKER: &[u8; 4] = b"^#~@";

/// Delimiters framing an encoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    start: Cow<'static, [u8]>,
    end: Cow<'static, [u8]>,
}

impl Markers {
    pub const DEFAULT: Self = Self {
        start: Cow::Borrowed(START_MARKER),
        end: Cow::Borrowed(END_MARKER),
    };

    #[must_use]
    pub fn new(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: Cow::Owned(start.into()),
            end: Cow::Owned(end.into()),
        }
    }

    #[must_use]
    pub fn start(&self) -> &[u8] {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &[u8] {
        &self.end
    }

    /// Rejects markers that could never delimit a block.
    ///
    /// # Errors
    ///
    /// Returns an error if either marker is empty or both are identical.
    pub fn validate(&self) -> Result<()> {
        if self.start.is_empty() || self.end.is_empty() {
            return Err(Error::InvalidOptions {
                details: "start and end markers must not be empty".into(),
            });
        }
        if self.start == self.end {
            return Err(Error::InvalidOptions {
                details: "start and end markers must differ".into(),
            });
        }
        Ok(())
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Offsets of an encoded block inside its carrier buffer.
///
/// `start..end` is the encoded payload. The length header sits in the
/// `FIELD_LEN` bytes before `start` and the checksum field in the
/// `FIELD_LEN` bytes from `end`. When the end marker follows the start
/// marker too closely, `end <= start` and the payload is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start_marker: usize,
    pub end_marker: usize,
    pub start: usize,
    pub end: usize,
}

impl Region {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn length_header(&self) -> Range<usize> {
        self.start - FIELD_LEN..self.start
    }

    #[must_use]
    pub const fn checksum_field(&self) -> Range<usize> {
        self.end..self.end + FIELD_LEN
    }
}

/// Finds the first start marker and the first end marker after it.
///
/// Returns `None` when either is missing; most files carry no encoded block.
/// An empty marker never matches.
#[must_use]
pub fn locate_region(source: &[u8], markers: &Markers) -> Option<Region> {
    if markers.start().is_empty() || markers.end().is_empty() {
        return None;
    }
    let start_marker = memmem::find(source, markers.start())?;
    let search_from = start_marker + markers.start().len();
    let end_marker = search_from + memmem::find(&source[search_from..], markers.end())?;

    Some(Region {
        start_marker,
        end_marker,
        start: search_from + FIELD_LEN,
        end: end_marker.saturating_sub(FIELD_LEN),
    })
}
