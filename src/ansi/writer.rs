//! ANSI encoder
//!
//! Serializes a canvas as 16-color ANSI art, emitting an SGR sequence only
//! where attributes change.

use super::push_char;
use crate::canvas::{Attrs, Canvas, Cell};
use crate::color::{effective_color, nearest_color, Color, ANSI_LOW_HALF, ANSI_PALETTE};
use crate::format::EncodeOptions;

const RESET: &[u8] = b"\x1b[0m";
const LINE_END: &[u8] = b"\r\n";

/// Palette slot for a color: low-half index plus whether it is bright
fn ansi_slot(color: Color, intense: bool) -> (usize, bool) {
    let idx = nearest_color(&ANSI_PALETTE, effective_color(color, intense));
    if idx >= ANSI_LOW_HALF {
        (idx - ANSI_LOW_HALF, true)
    } else {
        (idx, false)
    }
}

/// Append the SGR sequence that switches from `prev` to `cell`
fn push_sgr(out: &mut Vec<u8>, cell: &Cell, prev: &Attrs) {
    let mut codes: Vec<usize> = Vec::with_capacity(4);

    codes.push(if cell.weight { 1 } else { 22 });

    let (fg, fg_bright) = ansi_slot(cell.fg, cell.intensity);
    codes.push(if fg_bright { 90 + fg } else { 30 + fg });

    let (bg, bg_bright) = ansi_slot(cell.bg, cell.bg_intensity);
    if bg_bright {
        codes.push(100 + bg);
    } else {
        // 40-47 leave the intensity flag alone, so clear it explicitly
        if prev.bg_intensity {
            codes.push(25);
        }
        codes.push(40 + bg);
    }

    let params: Vec<String> = codes.iter().map(ToString::to_string).collect();
    out.extend_from_slice(b"\x1b[");
    out.extend_from_slice(params.join(";").as_bytes());
    out.push(b'm');
}

/// Encode `canvas` as ANSI art.
///
/// Output covers rows and columns from the origin up to the content bounds.
/// Every line starts and ends with a reset; a line spanning the full canvas
/// width gets no line terminator since the decoder wraps on its own.
pub fn encode(canvas: &Canvas, options: &EncodeOptions) -> Vec<u8> {
    let mut out = Vec::new();
    let Some(bounds) = canvas.content_bounds() else {
        return out;
    };
    let full_width = bounds.max_col + 1 == canvas.width();

    for row in canvas.rows().take(bounds.max_row + 1) {
        out.extend_from_slice(RESET);
        let mut prev = Attrs::default();

        for cell in &row[..=bounds.max_col] {
            let attrs = cell.attrs();
            if attrs != prev {
                push_sgr(&mut out, cell, &prev);
                prev = attrs;
            }
            push_char(&mut out, cell.c, options.charset);
        }

        out.extend_from_slice(RESET);
        if !full_width {
            out.extend_from_slice(LINE_END);
        }
    }

    tracing::debug!(bytes = out.len(), rows = bounds.max_row + 1, "encoded ANSI output");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::decode;
    use crate::color::{DEFAULT_BG, DEFAULT_FG};
    use crate::format::{Charset, DecodeOptions};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn put(canvas: &mut Canvas, text: &str, attrs: Attrs) {
        for c in text.chars() {
            canvas.put_char(c, &attrs);
        }
    }

    fn round_trip(canvas: &Canvas) -> Canvas {
        let bytes = encode(canvas, &EncodeOptions::default());
        let mut decoded = Canvas::new(canvas.width());
        decode(&mut decoded, &mut Cursor::new(bytes), &DecodeOptions::default()).unwrap();
        decoded
    }

    fn assert_same_grid(a: &Canvas, b: &Canvas) {
        assert_eq!(a.content_bounds(), b.content_bounds());
        let Some(bounds) = a.content_bounds() else {
            return;
        };
        for row in 0..=bounds.max_row {
            for col in 0..a.width() {
                assert_eq!(a.cell(row, col), b.cell(row, col), "cell ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_empty_canvas_encodes_to_nothing() {
        let canvas = Canvas::new(80);
        assert!(encode(&canvas, &EncodeOptions::default()).is_empty());
    }

    #[test]
    fn test_plain_text_line() {
        let mut canvas = Canvas::new(80);
        put(&mut canvas, "hi", Attrs::default());
        let out = encode(&canvas, &EncodeOptions::default());
        assert_eq!(out, b"\x1b[0mhi\x1b[0m\r\n".to_vec());
    }

    #[test]
    fn test_only_changes_emit_sgr() {
        let mut canvas = Canvas::new(80);
        let red = Attrs {
            fg: ANSI_PALETTE[1],
            ..Attrs::default()
        };
        put(&mut canvas, "ab", red);
        put(&mut canvas, "c", Attrs::default());
        let out = encode(&canvas, &EncodeOptions::default());
        assert_eq!(
            out,
            b"\x1b[0m\x1b[22;31;40mab\x1b[22;37;40mc\x1b[0m\r\n".to_vec()
        );
    }

    #[test]
    fn test_bright_codes() {
        let mut canvas = Canvas::new(80);
        let attrs = Attrs {
            fg: ANSI_PALETTE[2],
            intensity: true,
            bg: ANSI_PALETTE[4],
            bg_intensity: true,
            weight: true,
        };
        put(&mut canvas, "x", attrs);
        put(
            &mut canvas,
            "y",
            Attrs {
                bg_intensity: false,
                ..attrs
            },
        );
        let out = encode(&canvas, &EncodeOptions::default());
        assert_eq!(
            out,
            b"\x1b[0m\x1b[1;92;104mx\x1b[1;92;25;44my\x1b[0m\r\n".to_vec()
        );
    }

    #[test]
    fn test_truecolor_is_quantized() {
        let mut canvas = Canvas::new(80);
        let attrs = Attrs {
            fg: Color::rgb(0xf0, 0x60, 0x60),
            ..Attrs::default()
        };
        put(&mut canvas, "x", attrs);
        let out = encode(&canvas, &EncodeOptions::default());
        assert_eq!(out, b"\x1b[0m\x1b[22;91;40mx\x1b[0m\r\n".to_vec());
    }

    #[test]
    fn test_shared_column_limit() {
        let mut canvas = Canvas::new(80);
        put(&mut canvas, "abcd", Attrs::default());
        canvas.new_line();
        put(&mut canvas, "e", Attrs::default());
        let out = String::from_utf8(encode(&canvas, &EncodeOptions::default())).unwrap();
        assert_eq!(out, "\x1b[0mabcd\x1b[0m\r\n\x1b[0me   \x1b[0m\r\n");
    }

    #[test]
    fn test_full_width_line_has_no_terminator() {
        let mut canvas = Canvas::new(3);
        put(&mut canvas, "abcdef", Attrs::default());
        let out = String::from_utf8(encode(&canvas, &EncodeOptions::default())).unwrap();
        assert_eq!(out, "\x1b[0mabc\x1b[0m\x1b[0mdef\x1b[0m");
    }

    #[test]
    fn test_cp437_output() {
        let mut canvas = Canvas::new(80);
        put(&mut canvas, "█", Attrs::default());
        let out = encode(&canvas, &EncodeOptions::default());
        assert_eq!(out, b"\x1b[0m\xdb\x1b[0m\r\n".to_vec());

        let options = EncodeOptions {
            charset: Charset::Utf8,
            ..EncodeOptions::default()
        };
        let out = encode(&canvas, &options);
        assert_eq!(out, "\x1b[0m█\x1b[0m\r\n".as_bytes().to_vec());
    }

    #[test]
    fn test_round_trip_palette_canvas() {
        let mut canvas = Canvas::new(20);
        let styles = [
            Attrs::default(),
            Attrs {
                fg: ANSI_PALETTE[1],
                ..Attrs::default()
            },
            Attrs {
                fg: ANSI_PALETTE[3],
                intensity: true,
                weight: true,
                ..Attrs::default()
            },
            Attrs {
                bg: ANSI_PALETTE[5],
                bg_intensity: true,
                ..Attrs::default()
            },
            Attrs {
                fg: ANSI_PALETTE[6],
                bg: ANSI_PALETTE[2],
                ..Attrs::default()
            },
            Attrs {
                fg: DEFAULT_FG,
                bg: DEFAULT_BG,
                weight: true,
                ..Attrs::default()
            },
        ];

        for (i, attrs) in styles.iter().cycle().take(23).enumerate() {
            let c = (b'a' + (i % 26) as u8) as char;
            canvas.put_char(c, attrs);
            if i == 17 {
                canvas.new_line();
            }
        }
        canvas.move_to(4, 3);
        put(&mut canvas, "end", styles[4]);

        let decoded = round_trip(&canvas);
        assert_same_grid(&canvas, &decoded);
    }

    #[test]
    fn test_round_trip_full_width_rows() {
        let mut canvas = Canvas::new(4);
        let blue = Attrs {
            bg: ANSI_PALETTE[4],
            ..Attrs::default()
        };
        put(&mut canvas, "abcdefghij", blue);

        let decoded = round_trip(&canvas);
        assert_same_grid(&canvas, &decoded);
    }
}
