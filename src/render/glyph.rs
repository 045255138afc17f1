//! Glyph sources for the rasterizer

use crate::font::FontError;
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};

/// Vertical and horizontal cell metrics at one pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Horizontal advance, the cell width
    pub advance: u32,
    /// Pixels above the baseline
    pub ascent: u32,
    /// Pixels below the baseline
    pub descent: u32,
}

impl FontMetrics {
    pub fn cell_height(&self) -> u32 {
        self.ascent + self.descent
    }
}

/// Coverage bitmap of one rendered glyph.
///
/// `left` is relative to the cell's left edge and `top` to the baseline
/// (negative above it). Coverage is row-major, 0.0 to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f32>,
}

impl GlyphBitmap {
    pub fn coverage_at(&self, x: u32, y: u32) -> f32 {
        self.coverage
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Anything that can turn characters into coverage bitmaps
pub trait GlyphSource {
    fn metrics(&self, size: f32) -> FontMetrics;

    /// Bitmap for `c`, `None` when the glyph has no outline
    fn glyph(&self, c: char, size: f32) -> Option<GlyphBitmap>;
}

/// Glyph source backed by a TrueType/OpenType font
pub struct FontGlyphs {
    font: FontVec,
}

impl FontGlyphs {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let font = FontVec::try_from_vec(data).map_err(|_| FontError::InvalidFont)?;
        Ok(Self { font })
    }
}

impl GlyphSource for FontGlyphs {
    fn metrics(&self, size: f32) -> FontMetrics {
        let scaled = self.font.as_scaled(PxScale::from(size));
        // Monospace fonts share one advance; take it from a full-width letter
        let advance = scaled.h_advance(self.font.glyph_id('M'));

        FontMetrics {
            advance: advance.ceil().max(1.0) as u32,
            ascent: scaled.ascent().ceil().max(1.0) as u32,
            descent: (-scaled.descent()).ceil().max(0.0) as u32,
        }
    }

    fn glyph(&self, c: char, size: f32) -> Option<GlyphBitmap> {
        let glyph = self
            .font
            .glyph_id(c)
            .with_scale_and_position(PxScale::from(size), point(0.0, 0.0));
        let outlined = self.font.outline_glyph(glyph)?;
        let bounds = outlined.px_bounds();

        let width = bounds.width() as u32;
        let height = bounds.height() as u32;
        let mut coverage = vec![0.0; (width * height) as usize];
        outlined.draw(|x, y, v| {
            if let Some(slot) = coverage.get_mut((y * width + x) as usize) {
                *slot = v;
            }
        });

        Some(GlyphBitmap {
            left: bounds.min.x as i32,
            top: bounds.min.y as i32,
            width,
            height,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_data() {
        let result = FontGlyphs::from_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(FontError::InvalidFont)));
    }

    #[test]
    fn test_coverage_lookup() {
        let bitmap = GlyphBitmap {
            left: 0,
            top: -2,
            width: 2,
            height: 2,
            coverage: vec![0.0, 0.25, 0.5, 1.0],
        };
        assert_eq!(bitmap.coverage_at(1, 0), 0.25);
        assert_eq!(bitmap.coverage_at(0, 1), 0.5);
        assert_eq!(bitmap.coverage_at(5, 5), 0.0);
    }
}
