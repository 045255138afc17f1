//! ANSI decoder
//!
//! A three-state machine (ground, escape, CSI parameters) driving canvas
//! mutations. Malformed or truncated sequences are dropped, never reported.

use super::{cp437_to_char, ESC, SUB, TAB_WIDTH};
use crate::canvas::{Attrs, Canvas};
use crate::color::ANSI_PALETTE;
use crate::format::{read_input, Charset, DecodeError, DecodeOptions};
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    /// Just consumed ESC
    Escape,
    /// Inside `ESC [`, collecting parameters
    Csi,
}

/// Streaming ANSI parser writing into a borrowed canvas
pub struct AnsiParser<'a> {
    canvas: &'a mut Canvas,
    state: State,
    params: Vec<u32>,
    /// Digits typed for the parameter being collected
    current: Option<u32>,
    attrs: Attrs,
    done: bool,
}

impl<'a> AnsiParser<'a> {
    pub fn new(canvas: &'a mut Canvas) -> Self {
        Self {
            canvas,
            state: State::Ground,
            params: Vec::new(),
            current: None,
            attrs: Attrs::default(),
            done: false,
        }
    }

    /// True once the end-of-art marker has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one decoded character
    pub fn advance(&mut self, c: char) {
        if self.done {
            return;
        }

        match self.state {
            State::Ground => self.ground(c),
            State::Escape => {
                if c == '[' {
                    self.params.clear();
                    self.current = None;
                    self.state = State::Csi;
                } else {
                    // Unsupported two-byte sequence
                    self.state = State::Ground;
                }
            }
            State::Csi => match c {
                '0'..='9' => {
                    let digit = c as u32 - '0' as u32;
                    let value = self.current.unwrap_or(0);
                    self.current = Some(value.saturating_mul(10).saturating_add(digit));
                }
                ';' => {
                    self.params.push(self.current.take().unwrap_or(0));
                }
                action => {
                    if let Some(value) = self.current.take() {
                        self.params.push(value);
                    }
                    let params = std::mem::take(&mut self.params);
                    self.csi_dispatch(&params, action);
                    self.params = params;
                    self.state = State::Ground;
                }
            },
        }
    }

    fn ground(&mut self, c: char) {
        match c {
            ESC => self.state = State::Escape,
            '\n' => self.canvas.new_line(),
            '\r' => self.canvas.carriage_return(),
            '\t' => self.tab(),
            SUB => self.done = true,
            c => self.canvas.put_char(c, &self.attrs),
        }
    }

    /// Pad with spaces up to the next tab stop; stops if the row wraps
    fn tab(&mut self) {
        let col = self.canvas.cursor().col;
        let next_stop = (col / TAB_WIDTH + 1) * TAB_WIDTH;
        for _ in col..next_stop {
            self.canvas.put_char(' ', &self.attrs);
            if self.canvas.cursor().col == 0 {
                break;
            }
        }
    }

    fn csi_dispatch(&mut self, params: &[u32], action: char) {
        // Missing or zero count parameters mean 1
        let param = |idx: usize, default: usize| -> usize {
            params
                .get(idx)
                .map(|&v| if v == 0 { default } else { v as usize })
                .unwrap_or(default)
        };

        match action {
            'm' => self.apply_sgr(params),
            'H' | 'f' => {
                // CUP/HVP - Cursor Position
                self.canvas.move_to(param(0, 1), param(1, 1));
            }
            'A' => self.canvas.move_up(param(0, 1)),
            'B' => self.canvas.move_down(param(0, 1)),
            'C' => self.canvas.move_forward(param(0, 1)),
            'D' => self.canvas.move_backward(param(0, 1)),
            'J' => {
                // ED - only "erase entire display" is meaningful for art
                if params.first() == Some(&2) {
                    self.canvas.clear_all(self.attrs.cell(' '));
                }
            }
            's' => self.canvas.save_cursor(),
            'u' => self.canvas.restore_cursor(),
            _ => {
                tracing::trace!("ignoring CSI command {:?}", action);
            }
        }
    }

    /// Select Graphic Rendition
    fn apply_sgr(&mut self, params: &[u32]) {
        if params.is_empty() {
            self.attrs = Attrs::default();
            return;
        }

        for &code in params {
            match code {
                0 => self.attrs = Attrs::default(),
                1 => self.attrs.weight = true,
                // Blink doubles as the high-intensity background marker
                5 => self.attrs.bg_intensity = true,
                22 => self.attrs.weight = false,
                25 => self.attrs.bg_intensity = false,
                30..=37 => {
                    self.attrs.fg = ANSI_PALETTE[(code - 30) as usize];
                    self.attrs.intensity = false;
                }
                39 => self.attrs.fg = Attrs::default().fg,
                40..=47 => self.attrs.bg = ANSI_PALETTE[(code - 40) as usize],
                49 => self.attrs.bg = Attrs::default().bg,
                90..=97 => {
                    self.attrs.fg = ANSI_PALETTE[(code - 90) as usize];
                    self.attrs.intensity = true;
                }
                100..=107 => {
                    self.attrs.bg = ANSI_PALETTE[(code - 100) as usize];
                    self.attrs.bg_intensity = true;
                }
                _ => {}
            }
        }
    }
}

/// Decode ANSI art from `reader` onto `canvas`.
///
/// Stops at `byte_limit`, at the end-of-art marker, or at end of input. Only
/// read failures are errors.
pub fn decode(
    canvas: &mut Canvas,
    reader: &mut impl Read,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    let bytes = read_input(reader, options.byte_limit)?;
    let mut parser = AnsiParser::new(canvas);

    match options.charset {
        Charset::Cp437 => {
            for &byte in &bytes {
                parser.advance(cp437_to_char(byte));
                if parser.is_done() {
                    break;
                }
            }
        }
        Charset::Utf8 => {
            for c in String::from_utf8_lossy(&bytes).chars() {
                parser.advance(c);
                if parser.is_done() {
                    break;
                }
            }
        }
    }

    tracing::debug!(
        bytes = bytes.len(),
        rows = canvas.height(),
        "decoded ANSI input"
    );
    Ok(())
}
