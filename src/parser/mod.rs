mod boundary;
mod checksum;
mod encoding;
mod header;
mod tables;
mod transform;

pub use boundary::{END_MARKER, Markers, Region, START_MARKER, locate_region};
pub use checksum::{ChecksumCheck, verify_checksum};
pub use encoding::decode_capped;
pub use header::{FIELD_LEN, decode_field, encode_field};
pub use tables::{
    ENCODING_SELECTOR, ESCAPE_MARKER, SUBSTITUTION_TABLES, UNMAPPED_ESCAPE, substitute, unescape,
};
pub use transform::{DecodeState, TransformOutput, transform_region};
