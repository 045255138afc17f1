//! SAUCE metadata
//!
//! Reads the 128-byte record art editors append after the art, plus the
//! optional comment block in front of it.

use crate::ansi::cp437_to_char;
use std::io::{Read, Seek, SeekFrom};
use thiserror::Error;

pub const RECORD_SIZE: u64 = 128;
const RECORD_ID: &[u8] = b"SAUCE";
const COMMENT_ID: &[u8] = b"COMNT";
const COMMENT_LINE_SIZE: u64 = 64;

/// DataType value for character-based art
pub const DATA_TYPE_CHARACTER: u8 = 1;

#[derive(Error, Debug)]
pub enum SauceError {
    #[error("Failed to read SAUCE record: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub version: String,
    pub title: String,
    pub author: String,
    pub group: String,
    /// CCYYMMDD
    pub date: String,
    /// Length of the art itself, without the metadata
    pub file_size: u32,
    pub data_type: u8,
    pub file_type: u8,
    pub tinfo1: u16,
    pub tinfo2: u16,
    pub tinfo3: u16,
    pub tinfo4: u16,
    pub comments: u8,
    pub flags: u8,
    pub tinfo_s: String,
    pub comment_lines: Vec<String>,
}

/// Fixed-width CP437 field with space and NUL padding removed
fn field(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| cp437_to_char(b)).collect();
    text.trim_end_matches([' ', '\0']).to_string()
}

fn u16_at(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

impl Record {
    /// Parse a raw 128-byte record, `None` if the ID does not match
    pub fn parse(buf: &[u8; RECORD_SIZE as usize]) -> Option<Self> {
        if &buf[..5] != RECORD_ID {
            return None;
        }

        Some(Self {
            version: field(&buf[5..7]),
            title: field(&buf[7..42]),
            author: field(&buf[42..62]),
            group: field(&buf[62..82]),
            date: field(&buf[82..90]),
            file_size: u32::from_le_bytes([buf[90], buf[91], buf[92], buf[93]]),
            data_type: buf[94],
            file_type: buf[95],
            tinfo1: u16_at(buf, 96),
            tinfo2: u16_at(buf, 98),
            tinfo3: u16_at(buf, 100),
            tinfo4: u16_at(buf, 102),
            comments: buf[104],
            flags: buf[105],
            tinfo_s: field(&buf[106..128]),
            comment_lines: Vec::new(),
        })
    }

    /// Look for a record at the end of `reader`.
    ///
    /// Returns `Ok(None)` when the input is too short or carries no record.
    /// The reader is left positioned at the start either way.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Option<Self>, SauceError> {
        let len = reader.seek(SeekFrom::End(0))?;
        let record = if len < RECORD_SIZE {
            None
        } else {
            Self::read_at_end(reader, len)?
        };
        reader.seek(SeekFrom::Start(0))?;
        Ok(record)
    }

    fn read_at_end<R: Read + Seek>(reader: &mut R, len: u64) -> Result<Option<Self>, SauceError> {
        let record_start = len - RECORD_SIZE;
        reader.seek(SeekFrom::Start(record_start))?;
        let mut buf = [0u8; RECORD_SIZE as usize];
        reader.read_exact(&mut buf)?;

        let Some(mut record) = Self::parse(&buf) else {
            return Ok(None);
        };

        if record.comments > 0 {
            let block = COMMENT_ID.len() as u64 + u64::from(record.comments) * COMMENT_LINE_SIZE;
            if let Some(block_start) = record_start.checked_sub(block) {
                reader.seek(SeekFrom::Start(block_start))?;
                let mut data = vec![0u8; block as usize];
                reader.read_exact(&mut data)?;
                if data.starts_with(COMMENT_ID) {
                    record.comment_lines = data[COMMENT_ID.len()..]
                        .chunks(COMMENT_LINE_SIZE as usize)
                        .map(field)
                        .collect();
                } else {
                    tracing::debug!("SAUCE comment block missing where expected");
                }
            }
        }

        tracing::debug!(
            title = %record.title,
            width = record.tinfo1,
            file_size = record.file_size,
            "found SAUCE record"
        );
        Ok(Some(record))
    }

    /// Canvas width in columns, for character art that declares one
    pub fn width(&self) -> Option<usize> {
        (self.data_type == DATA_TYPE_CHARACTER && self.tinfo1 > 0).then_some(self.tinfo1 as usize)
    }

    /// Bytes of art to decode, stopping before the metadata
    pub fn byte_limit(&self) -> Option<u64> {
        (self.file_size > 0).then_some(u64::from(self.file_size))
    }
}
