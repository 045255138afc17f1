//! mIRC decoder

use super::{BOLD, COLOR, ITALIC, PLAIN, UNDERLINE};
use crate::canvas::{Attrs, Canvas};
use crate::color::{nearest_ansi, nearest_color, Color, ANSI_LOW_HALF, ANSI_PALETTE, MIRC_PALETTE};
use crate::format::{read_input, DecodeError, DecodeOptions};
use std::io::Read;

/// Parser over a fully decoded character buffer.
///
/// Color codes need two characters of lookahead (`,` then a digit), so the
/// input is held as a slice rather than streamed.
pub struct MircParser<'a> {
    canvas: &'a mut Canvas,
    chars: &'a [char],
    pos: usize,
    attrs: Attrs,
    force_16: bool,
}

impl<'a> MircParser<'a> {
    pub fn new(canvas: &'a mut Canvas, chars: &'a [char], force_16: bool) -> Self {
        Self {
            canvas,
            chars,
            pos: 0,
            attrs: Attrs::default(),
            force_16,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Decode until the input is exhausted
    pub fn run(&mut self) {
        while let Some(c) = self.peek(0) {
            self.pos += 1;
            match c {
                COLOR => {
                    if !self.color_code() {
                        break;
                    }
                }
                BOLD => self.attrs.weight = !self.attrs.weight,
                PLAIN => self.attrs = Attrs::default(),
                ITALIC | UNDERLINE => {}
                '\n' => {
                    // Auto-wrap already moved to a fresh row
                    if self.canvas.cursor().col != 0 {
                        self.canvas.new_line();
                    }
                    self.attrs = Attrs::default();
                }
                '\r' => {
                    self.canvas.new_line();
                    self.attrs = Attrs::default();
                }
                c => self.canvas.put_char(c, &self.attrs),
            }
        }
    }

    /// Read one or two digits as a palette index
    fn digits(&mut self) -> Option<usize> {
        let first = self.peek(0)?.to_digit(10)?;
        self.pos += 1;
        match self.peek(0).and_then(|c| c.to_digit(10)) {
            Some(second) => {
                self.pos += 1;
                Some((first * 10 + second) as usize)
            }
            None => Some(first as usize),
        }
    }

    /// Palette lookup; out-of-range indices are ignored
    fn lookup(&self, idx: usize) -> Option<Color> {
        let color = *MIRC_PALETTE.get(idx)?;
        Some(if self.force_16 { nearest_ansi(color) } else { color })
    }

    /// Handle the text after a color marker.
    ///
    /// Returns false when the input ended inside the code.
    fn color_code(&mut self) -> bool {
        if self.peek(0).is_none() {
            return false;
        }

        // No digits: a bare marker resets colors and bold
        let Some(fg) = self.digits() else {
            self.attrs = Attrs::default();
            return true;
        };
        if let Some(color) = self.lookup(fg) {
            self.attrs.fg = color;
        }

        if self.peek(0) != Some(',') {
            return true;
        }

        // The comma belongs to the code even when no background follows
        self.pos += 1;
        if self.peek(0).is_none() {
            return false;
        }
        if let Some(bg) = self.digits().and_then(|idx| self.lookup(idx)) {
            self.attrs.bg = bg;
            self.attrs.bg_intensity = nearest_color(&ANSI_PALETTE, bg) >= ANSI_LOW_HALF;
        }
        true
    }
}

/// Decode mIRC art from `reader` onto `canvas`.
///
/// Input is UTF-8; invalid sequences are replaced rather than rejected.
pub fn decode(
    canvas: &mut Canvas,
    reader: &mut impl Read,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    let bytes = read_input(reader, options.byte_limit)?;
    let chars: Vec<char> = String::from_utf8_lossy(&bytes).chars().collect();

    MircParser::new(canvas, &chars, options.force_16).run();

    tracing::debug!(
        bytes = bytes.len(),
        rows = canvas.height(),
        force_16 = options.force_16,
        "decoded mIRC input"
    );
    Ok(())
}
