#![allow(dead_code)]

use enscript_parser_rs::parser::{
    END_MARKER, ENCODING_SELECTOR, ESCAPE_MARKER, START_MARKER, SUBSTITUTION_TABLES, encode_field,
};

pub const PREFIX: &[u8] = b"<SCRIPT LANGUAGE=\"VBScript.Encode\">";
pub const SUFFIX: &[u8] = b"</SCRIPT>\r\n";

fn escape_payload(byte: u8) -> Option<u8> {
    match byte {
        b'\r' => Some(b'#'),
        b'\n' => Some(b'&'),
        b'<' => Some(b'!'),
        b'>' => Some(b'*'),
        b'@' => Some(b'$'),
        _ => None,
    }
}

/// Encodes `plain` the way the Microsoft script encoder does.
pub fn encode_region(plain: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(plain.len());
    let mut count = 0usize;
    for &byte in plain {
        if let Some(payload) = escape_payload(byte) {
            out.extend_from_slice(&[ESCAPE_MARKER, payload]);
            count += 1;
        } else if byte >= 0x80 {
            out.push(byte);
        } else {
            let table = &SUBSTITUTION_TABLES[ENCODING_SELECTOR[count % 64] as usize];
            let raw = (0u8..0x80)
                .find(|&raw| raw != ESCAPE_MARKER && table[raw as usize] == byte)
                .unwrap_or_else(|| panic!("byte {byte:#04X} has no encoding"));
            out.push(raw);
            count += 1;
        }
    }
    out
}

pub fn checksum_of(plain: &[u8]) -> u32 {
    plain
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(u32::from(b)))
}

/// Frames an encoded region with header, checksum trailer and markers.
pub fn frame(region: &[u8], checksum: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(region.len() + 64);
    buf.extend_from_slice(PREFIX);
    buf.extend_from_slice(START_MARKER);
    buf.extend_from_slice(&encode_field(u32::try_from(region.len()).expect("region fits u32")));
    buf.extend_from_slice(region);
    buf.extend_from_slice(&encode_field(checksum));
    buf.extend_from_slice(END_MARKER);
    buf.extend_from_slice(SUFFIX);
    buf
}

/// A complete sample whose block decodes to `plain` with a valid checksum.
pub fn encode_sample(plain: &[u8]) -> Vec<u8> {
    frame(&encode_region(plain), checksum_of(plain))
}

/// Expected text for `plain` after ISO-8859-1 decoding.
pub fn latin1(plain: &[u8]) -> String {
    plain.iter().map(|&b| char::from(b)).collect()
}
