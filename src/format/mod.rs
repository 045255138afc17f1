//! Format module
//!
//! Format sniffing and the decode/encode entry points shared by the ANSI and
//! mIRC implementations.

use crate::canvas::Canvas;
use crate::{ansi, mirc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// How many leading bytes format detection looks at
pub const SNIFF_LEN: usize = 4096;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Input format could not be determined")]
    UnknownFormat,
}

/// Supported text art formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Terminal escape-code art
    Ansi,
    /// Chat-client inline color codes
    Mirc,
    Unknown,
}

impl Format {
    /// The format a conversion writes when reading `self`
    pub fn opposite(self) -> Format {
        match self {
            Format::Ansi => Format::Mirc,
            Format::Mirc => Format::Ansi,
            Format::Unknown => Format::Unknown,
        }
    }
}

/// Byte encoding of characters in ANSI art
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// DOS code page 437
    #[default]
    Cp437,
    Utf8,
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Never consume more than this many input bytes
    pub byte_limit: Option<u64>,
    pub charset: Charset,
    /// Reduce mIRC colors to their nearest 16-color equivalent
    pub force_16: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub charset: Charset,
    /// Use all 99 mIRC colors instead of the classic 16
    pub extended_colors: bool,
}

/// Guess the format from the first bytes of the input.
///
/// A CSI introducer anywhere in the prefix wins over a color marker.
pub fn detect_format(prefix: &[u8]) -> Format {
    let prefix = &prefix[..prefix.len().min(SNIFF_LEN)];
    if prefix.windows(2).any(|w| w == b"\x1b[") {
        Format::Ansi
    } else if prefix.contains(&0x03) {
        Format::Mirc
    } else {
        Format::Unknown
    }
}

/// Read the whole input, stopping at `limit` bytes if given
pub(crate) fn read_input(reader: &mut impl Read, limit: Option<u64>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match limit {
        Some(n) => reader.take(n).read_to_end(&mut buf)?,
        None => reader.read_to_end(&mut buf)?,
    };
    Ok(buf)
}

/// Decode `reader` as `format` onto `canvas`.
///
/// `Format::Unknown` is rejected with [`DecodeError::UnknownFormat`] before
/// anything is read.
pub fn decode(
    format: Format,
    canvas: &mut Canvas,
    reader: &mut impl Read,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    match format {
        Format::Ansi => ansi::decode(canvas, reader, options),
        Format::Mirc => mirc::decode(canvas, reader, options),
        Format::Unknown => Err(DecodeError::UnknownFormat),
    }
}

/// Encode `canvas` as `format`
pub fn encode(format: Format, canvas: &Canvas, options: &EncodeOptions) -> Vec<u8> {
    match format {
        Format::Ansi => ansi::encode(canvas, options),
        Format::Mirc => mirc::encode(canvas, options),
        Format::Unknown => Vec::new(),
    }
}
