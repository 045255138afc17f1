//! ANSI art module
//!
//! Decodes and encodes terminal escape-code art (CSI/SGR subset used by DOS
//! era art, CP437 text).

mod parser;
mod writer;

pub use parser::{decode, AnsiParser};
pub use writer::encode;

use crate::format::Charset;
use codepages::tables::{CP437_TO_UNICODE, UNICODE_TO_CP437};

/// Escape marker
pub(crate) const ESC: char = '\x1b';
/// DOS end-of-file marker, ends the art
pub(crate) const SUB: char = '\x1a';

/// Fixed tab stop interval
pub const TAB_WIDTH: usize = 8;

/// Map one CP437 byte to its character.
///
/// The ASCII range is passed through so control bytes stay controls.
pub(crate) fn cp437_to_char(byte: u8) -> char {
    if byte < 0x80 {
        byte as char
    } else {
        CP437_TO_UNICODE[byte as usize]
    }
}

/// Append `c` to `out` in `charset`.
///
/// Characters the decoder would treat as controls, and characters CP437
/// cannot represent, are written as `?`.
pub(crate) fn push_char(out: &mut Vec<u8>, c: char, charset: Charset) {
    let c = match c {
        ESC | SUB | '\r' | '\n' | '\t' => '?',
        c => c,
    };

    match charset {
        Charset::Cp437 => {
            let byte = if c.is_ascii() {
                c as u8
            } else {
                UNICODE_TO_CP437.get(&c).copied().unwrap_or(b'?')
            };
            out.push(byte);
        }
        Charset::Utf8 => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
}
