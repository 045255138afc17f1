//! Rasterizer
//!
//! Paints the content area of a canvas into an RGBA buffer. Block elements
//! are filled pixel by pixel so they tile without seams; everything else is
//! drawn from a [`GlyphSource`].

mod glyph;

pub use glyph::{FontGlyphs, FontMetrics, GlyphBitmap, GlyphSource};

use crate::canvas::{Canvas, Cell};
use crate::color::{effective_color, nearest_ansi, Color, DEFAULT_BG};
use image::{Rgba, RgbaImage};

/// Glyph size in pixels at scale 1.0
pub const BASE_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub font_size: f32,
    /// Multiplier applied to `font_size`
    pub scale: f32,
    /// Snap every color to the 16-color palette before drawing
    pub reduce_palette: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_size: BASE_FONT_SIZE,
            scale: 1.0,
            reduce_palette: false,
        }
    }
}

/// Block elements drawn without the font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Full,
    UpperHalf,
    LowerHalf,
    LeftHalf,
    RightHalf,
    DarkShade,
    MediumShade,
    LightShade,
}

impl Block {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\u{2588}' => Some(Block::Full),
            '\u{2580}' => Some(Block::UpperHalf),
            '\u{2584}' => Some(Block::LowerHalf),
            '\u{258c}' => Some(Block::LeftHalf),
            '\u{2590}' => Some(Block::RightHalf),
            '\u{2593}' => Some(Block::DarkShade),
            '\u{2592}' => Some(Block::MediumShade),
            '\u{2591}' => Some(Block::LightShade),
            _ => None,
        }
    }

    /// Whether the cell-local pixel (x, y) takes the foreground color
    fn covers(self, x: u32, y: u32, width: u32, height: u32) -> bool {
        match self {
            Block::Full => true,
            Block::UpperHalf => y < height / 2,
            Block::LowerHalf => y >= height / 2,
            Block::LeftHalf => x < width / 2,
            Block::RightHalf => x >= width / 2,
            Block::DarkShade => x % 2 == 1 || y % 2 == 1,
            Block::MediumShade => (x + y) % 2 == 0,
            Block::LightShade => x % 2 == 0 && y % 2 == 0,
        }
    }
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let v = coverage.clamp(0.0, 1.0);
    let mix = |d: u8, s: u8| (f32::from(d) * (1.0 - v) + f32::from(s) * v).round() as u8;
    Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        mix(dst[3], src[3]),
    ])
}

/// Pixel rectangle of one cell in the output image
#[derive(Debug, Clone, Copy)]
struct CellRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

struct Rasterizer<'a> {
    image: RgbaImage,
    glyphs: &'a dyn GlyphSource,
    metrics: FontMetrics,
    size: f32,
    reduce_palette: bool,
}

impl Rasterizer<'_> {
    fn color(&self, color: Color, intense: bool) -> Rgba<u8> {
        let color = effective_color(color, intense);
        if self.reduce_palette {
            to_rgba(nearest_ansi(color))
        } else {
            to_rgba(color)
        }
    }

    fn fill(&mut self, rect: CellRect, color: Rgba<u8>) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    fn draw_cell(&mut self, cell: &Cell, rect: CellRect) {
        let fg = self.color(cell.fg, cell.intensity);
        let bg = self.color(cell.bg, cell.bg_intensity);

        if let Some(block) = Block::from_char(cell.c) {
            for y in 0..rect.height {
                for x in 0..rect.width {
                    let color = if block.covers(x, y, rect.width, rect.height) {
                        fg
                    } else {
                        bg
                    };
                    self.image.put_pixel(rect.x + x, rect.y + y, color);
                }
            }
            return;
        }

        self.fill(rect, bg);
        if cell.c == ' ' {
            return;
        }

        let Some(bitmap) = self.glyphs.glyph(cell.c, self.size) else {
            return;
        };
        self.draw_glyph(&bitmap, rect, fg, 0);
        if cell.weight {
            self.draw_glyph(&bitmap, rect, fg, 1);
        }
    }

    /// Composite `bitmap` at the cell's baseline, clipped to the cell
    fn draw_glyph(&mut self, bitmap: &GlyphBitmap, rect: CellRect, fg: Rgba<u8>, offset_x: i32) {
        let baseline = self.metrics.ascent as i32;
        for gy in 0..bitmap.height {
            let y = baseline + bitmap.top + gy as i32;
            if y < 0 || y >= rect.height as i32 {
                continue;
            }
            for gx in 0..bitmap.width {
                let x = bitmap.left + offset_x + gx as i32;
                if x < 0 || x >= rect.width as i32 {
                    continue;
                }
                let v = bitmap.coverage_at(gx, gy);
                if v <= 0.0 {
                    continue;
                }
                let (px, py) = (rect.x + x as u32, rect.y + y as u32);
                let dst = *self.image.get_pixel(px, py);
                self.image.put_pixel(px, py, blend(dst, fg, v));
            }
        }
    }
}

/// Render the content area of `canvas`.
///
/// A canvas without content yields a single cell of the default background.
pub fn rasterize(canvas: &Canvas, glyphs: &dyn GlyphSource, options: &RenderOptions) -> RgbaImage {
    let size = options.font_size * options.scale;
    let metrics = glyphs.metrics(size);
    let cell_width = metrics.advance.max(1);
    let cell_height = metrics.cell_height().max(1);

    let Some(bounds) = canvas.content_bounds() else {
        tracing::debug!("nothing to render, emitting placeholder cell");
        return RgbaImage::from_pixel(cell_width, cell_height, to_rgba(DEFAULT_BG));
    };

    let mut raster = Rasterizer {
        image: RgbaImage::new(bounds.cols() as u32 * cell_width, bounds.rows() as u32 * cell_height),
        glyphs,
        metrics,
        size,
        reduce_palette: options.reduce_palette,
    };

    for row in bounds.min_row..=bounds.max_row {
        for col in bounds.min_col..=bounds.max_col {
            let Some(cell) = canvas.cell(row, col) else {
                continue;
            };
            let rect = CellRect {
                x: (col - bounds.min_col) as u32 * cell_width,
                y: (row - bounds.min_row) as u32 * cell_height,
                width: cell_width,
                height: cell_height,
            };
            raster.draw_cell(cell, rect);
        }
    }

    tracing::debug!(
        width = raster.image.width(),
        height = raster.image.height(),
        size,
        "rasterized canvas"
    );
    raster.image
}
