use crate::parser::boundary::Region;
use crate::parser::tables::{ESCAPE_MARKER, UNMAPPED_ESCAPE, substitute, unescape};

/// Bytes at or above this value are carried through untouched.
const PASSTHROUGH_THRESHOLD: u8 = 0x80;

/// Output of one walk over an encoded region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Decoded bytes, one per escape, substitution or passthrough step.
    pub bytes: Vec<u8>,
    /// Wrapping sum of every byte in `bytes`.
    pub checksum: u32,
    /// Number of escape and substitution steps.
    pub transforms: usize,
    /// Escapes whose payload had no mapping and decoded to `?`.
    pub unmapped_escapes: usize,
    /// Cursor position when the walk stopped; may pass `region.end` by one
    /// when the last byte is an escape marker.
    pub position: usize,
}

/// Cursor and accumulators for a single decode.
#[derive(Debug)]
pub struct DecodeState {
    position: usize,
    transform_count: usize,
    checksum: u32,
    unmapped_escapes: usize,
    output: Vec<u8>,
}

impl DecodeState {
    #[must_use]
    pub fn new(region: &Region) -> Self {
        Self {
            position: region.start,
            transform_count: 0,
            checksum: 0,
            unmapped_escapes: 0,
            output: Vec::with_capacity(region.len()),
        }
    }

    #[must_use]
    pub const fn transform_count(&self) -> usize {
        self.transform_count
    }

    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Decodes the byte under the cursor and advances past it.
    ///
    /// Does nothing once the cursor is past the end of `source`.
    pub fn step(&mut self, source: &[u8]) {
        let Some(&raw) = source.get(self.position) else {
            return;
        };
        if raw == ESCAPE_MARKER {
            // The payload sits outside the region when the marker is the
            // last encoded byte; it is read from the trailer regardless.
            let literal = match source.get(self.position + 1).copied().and_then(unescape) {
                Some(literal) => literal,
                None => {
                    self.unmapped_escapes += 1;
                    UNMAPPED_ESCAPE
                }
            };
            self.emit(literal);
            self.transform_count += 1;
            self.position += 2;
        } else if raw < PASSTHROUGH_THRESHOLD {
            self.emit(substitute(raw, self.transform_count));
            self.transform_count += 1;
            self.position += 1;
        } else {
            self.emit(raw);
            self.position += 1;
        }
    }

    fn emit(&mut self, byte: u8) {
        self.checksum = self.checksum.wrapping_add(u32::from(byte));
        self.output.push(byte);
    }

    #[must_use]
    pub fn finish(self) -> TransformOutput {
        TransformOutput {
            bytes: self.output,
            checksum: self.checksum,
            transforms: self.transform_count,
            unmapped_escapes: self.unmapped_escapes,
            position: self.position,
        }
    }
}

/// Decodes `source[region.start..region.end]`.
///
/// Total over every byte value; a region that runs past the end of `source`
/// is clipped rather than rejected.
#[must_use]
pub fn transform_region(source: &[u8], region: &Region) -> TransformOutput {
    let end = region.end.min(source.len());
    let mut state = DecodeState::new(region);
    while state.position() < end {
        state.step(source);
    }
    state.finish()
}
