//! mIRC art module
//!
//! Chat-client color codes: `^C` followed by up to two foreground digits and
//! an optional `,` plus background digits, `^B` for bold.

mod parser;
mod writer;

pub use parser::{decode, MircParser};
pub use writer::encode;

/// Color marker (^C)
pub(crate) const COLOR: char = '\x03';
/// Bold toggle (^B)
pub(crate) const BOLD: char = '\x02';
/// Reset all formatting (^O)
pub(crate) const PLAIN: char = '\x0f';
/// Italic toggle (^]), accepted and ignored
pub(crate) const ITALIC: char = '\x1d';
/// Underline toggle (^_), accepted and ignored
pub(crate) const UNDERLINE: char = '\x1f';

/// True for characters the decoder interprets instead of printing
pub(crate) fn is_control(c: char) -> bool {
    matches!(c, COLOR | BOLD | PLAIN | ITALIC | UNDERLINE | '\r' | '\n')
}
