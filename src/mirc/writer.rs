//! mIRC encoder

use super::{is_control, BOLD, COLOR, PLAIN};
use crate::canvas::{Attrs, Canvas, Cell};
use crate::color::{effective_color, nearest_color, Color, MIRC_CLASSIC_COLORS, MIRC_PALETTE};
use crate::format::EncodeOptions;

fn same_colors(a: &Attrs, b: &Attrs) -> bool {
    a.fg == b.fg && a.bg == b.bg && a.intensity == b.intensity && a.bg_intensity == b.bg_intensity
}

struct MircWriter {
    out: String,
    /// Number of palette entries colors are matched against
    palette_len: usize,
}

impl MircWriter {
    fn index(&self, color: Color, intense: bool) -> usize {
        nearest_color(&MIRC_PALETTE[..self.palette_len], effective_color(color, intense))
    }

    /// Emit whatever codes turn `prev` into the attributes of `cell`, and
    /// return the attributes a decoder holds afterwards
    fn switch(&mut self, cell: &Cell, prev: Attrs) -> Attrs {
        let attrs = cell.attrs();
        let mut state = prev;

        if !same_colors(&attrs, &prev) {
            if same_colors(&attrs, &Attrs::default()) {
                // A bare marker would swallow a following digit or comma
                if cell.c.is_ascii_digit() || cell.c == ',' {
                    self.out.push(PLAIN);
                } else {
                    self.out.push(COLOR);
                }
                state = Attrs::default();
            } else {
                self.out.push(COLOR);
                self.out.push_str(&format!("{:02}", self.index(cell.fg, cell.intensity)));

                let bg_needed = cell.bg != Attrs::default().bg
                    || cell.bg != prev.bg
                    || cell.bg_intensity != prev.bg_intensity
                    || cell.c == ',';
                if bg_needed {
                    self.out.push_str(&format!(",{:02}", self.index(cell.bg, cell.bg_intensity)));
                }
                state = Attrs {
                    weight: prev.weight,
                    ..attrs
                };
            }
        }

        if attrs.weight != state.weight {
            self.out.push(BOLD);
            state.weight = attrs.weight;
        }
        state
    }
}

/// Encode `canvas` as mIRC art.
///
/// Colors are matched against the classic 16 entries unless
/// `extended_colors` is set. Lines end with a bare `\n`.
pub fn encode(canvas: &Canvas, options: &EncodeOptions) -> Vec<u8> {
    let Some(bounds) = canvas.content_bounds() else {
        return Vec::new();
    };

    let mut writer = MircWriter {
        out: String::new(),
        palette_len: if options.extended_colors {
            MIRC_PALETTE.len()
        } else {
            MIRC_CLASSIC_COLORS
        },
    };

    for row in canvas.rows().take(bounds.max_row + 1) {
        let mut prev = Attrs::default();
        for cell in &row[..=bounds.max_col] {
            prev = writer.switch(cell, prev);
            writer.out.push(if is_control(cell.c) { '?' } else { cell.c });
        }
        writer.out.push('\n');
    }

    tracing::debug!(
        bytes = writer.out.len(),
        extended = options.extended_colors,
        "encoded mIRC output"
    );
    writer.out.into_bytes()
}
