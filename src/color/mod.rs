//! Color model
//!
//! Truecolor values, the two fixed palettes (16-color ANSI, 99-color mIRC)
//! and nearest-color quantization between them.

/// A truecolor RGBA value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Fully transparent black
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Squared Euclidean distance over the RGB channels
    fn distance_sq(self, other: Color) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Standard 16-color ANSI palette (VGA values)
pub const ANSI_PALETTE: [Color; 16] = [
    Color::rgb(0x00, 0x00, 0x00), // Black
    Color::rgb(0xaa, 0x00, 0x00), // Red
    Color::rgb(0x00, 0xaa, 0x00), // Green
    Color::rgb(0xaa, 0x55, 0x00), // Yellow (brown)
    Color::rgb(0x00, 0x00, 0xaa), // Blue
    Color::rgb(0xaa, 0x00, 0xaa), // Magenta
    Color::rgb(0x00, 0xaa, 0xaa), // Cyan
    Color::rgb(0xaa, 0xaa, 0xaa), // White (light grey)
    // Bright variants
    Color::rgb(0x55, 0x55, 0x55), // Bright Black (dark grey)
    Color::rgb(0xff, 0x55, 0x55), // Bright Red
    Color::rgb(0x55, 0xff, 0x55), // Bright Green
    Color::rgb(0xff, 0xff, 0x55), // Bright Yellow
    Color::rgb(0x55, 0x55, 0xff), // Bright Blue
    Color::rgb(0xff, 0x55, 0xff), // Bright Magenta
    Color::rgb(0x55, 0xff, 0xff), // Bright Cyan
    Color::rgb(0xff, 0xff, 0xff), // Bright White
];

/// Number of entries in the low (normal intensity) half of [`ANSI_PALETTE`]
pub const ANSI_LOW_HALF: usize = 8;

/// Default foreground: light grey
pub const DEFAULT_FG: Color = ANSI_PALETTE[7];

/// Default background: black
pub const DEFAULT_BG: Color = ANSI_PALETTE[0];

/// Number of classic mIRC colors understood by every client
pub const MIRC_CLASSIC_COLORS: usize = 16;

/// Extended 99-color mIRC palette (indices 0-98)
pub const MIRC_PALETTE: [Color; 99] = [
    // 0-15: classic colors
    Color::rgb(0xff, 0xff, 0xff), // White
    Color::rgb(0x00, 0x00, 0x00), // Black
    Color::rgb(0x00, 0x00, 0x7f), // Navy
    Color::rgb(0x00, 0x93, 0x00), // Green
    Color::rgb(0xff, 0x00, 0x00), // Red
    Color::rgb(0x7f, 0x00, 0x00), // Brown
    Color::rgb(0x9c, 0x00, 0x9c), // Purple
    Color::rgb(0xfc, 0x7f, 0x00), // Orange
    Color::rgb(0xff, 0xff, 0x00), // Yellow
    Color::rgb(0x00, 0xfc, 0x00), // Light Green
    Color::rgb(0x00, 0x93, 0x93), // Teal
    Color::rgb(0x00, 0xff, 0xff), // Light Cyan
    Color::rgb(0x00, 0x00, 0xfc), // Light Blue
    Color::rgb(0xff, 0x00, 0xff), // Pink
    Color::rgb(0x7f, 0x7f, 0x7f), // Grey
    Color::rgb(0xd2, 0xd2, 0xd2), // Light Grey
    // 16-27
    Color::rgb(0x47, 0x00, 0x00),
    Color::rgb(0x47, 0x21, 0x00),
    Color::rgb(0x47, 0x47, 0x00),
    Color::rgb(0x32, 0x47, 0x00),
    Color::rgb(0x00, 0x47, 0x00),
    Color::rgb(0x00, 0x47, 0x2c),
    Color::rgb(0x00, 0x47, 0x47),
    Color::rgb(0x00, 0x27, 0x47),
    Color::rgb(0x00, 0x00, 0x47),
    Color::rgb(0x2e, 0x00, 0x47),
    Color::rgb(0x47, 0x00, 0x47),
    Color::rgb(0x47, 0x00, 0x2a),
    // 28-39
    Color::rgb(0x74, 0x00, 0x00),
    Color::rgb(0x74, 0x3a, 0x00),
    Color::rgb(0x74, 0x74, 0x00),
    Color::rgb(0x51, 0x74, 0x00),
    Color::rgb(0x00, 0x74, 0x00),
    Color::rgb(0x00, 0x74, 0x49),
    Color::rgb(0x00, 0x74, 0x74),
    Color::rgb(0x00, 0x40, 0x74),
    Color::rgb(0x00, 0x00, 0x74),
    Color::rgb(0x4b, 0x00, 0x74),
    Color::rgb(0x74, 0x00, 0x74),
    Color::rgb(0x74, 0x00, 0x45),
    // 40-51
    Color::rgb(0xb5, 0x00, 0x00),
    Color::rgb(0xb5, 0x63, 0x00),
    Color::rgb(0xb5, 0xb5, 0x00),
    Color::rgb(0x7d, 0xb5, 0x00),
    Color::rgb(0x00, 0xb5, 0x00),
    Color::rgb(0x00, 0xb5, 0x71),
    Color::rgb(0x00, 0xb5, 0xb5),
    Color::rgb(0x00, 0x63, 0xb5),
    Color::rgb(0x00, 0x00, 0xb5),
    Color::rgb(0x75, 0x00, 0xb5),
    Color::rgb(0xb5, 0x00, 0xb5),
    Color::rgb(0xb5, 0x00, 0x6b),
    // 52-63
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0xff, 0x8c, 0x00),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xb2, 0xff, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0xff, 0xa0),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0x00, 0x8c, 0xff),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0xa5, 0x00, 0xff),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0xff, 0x00, 0x98),
    // 64-75
    Color::rgb(0xff, 0x59, 0x59),
    Color::rgb(0xff, 0xb4, 0x59),
    Color::rgb(0xff, 0xff, 0x71),
    Color::rgb(0xcf, 0xff, 0x60),
    Color::rgb(0x6f, 0xff, 0x6f),
    Color::rgb(0x65, 0xff, 0xc9),
    Color::rgb(0x6d, 0xff, 0xff),
    Color::rgb(0x59, 0xb4, 0xff),
    Color::rgb(0x59, 0x59, 0xff),
    Color::rgb(0xc4, 0x59, 0xff),
    Color::rgb(0xff, 0x66, 0xff),
    Color::rgb(0xff, 0x59, 0xbc),
    // 76-87
    Color::rgb(0xff, 0x9c, 0x9c),
    Color::rgb(0xff, 0xd3, 0x9c),
    Color::rgb(0xff, 0xff, 0x9c),
    Color::rgb(0xe2, 0xff, 0x9c),
    Color::rgb(0x9c, 0xff, 0x9c),
    Color::rgb(0x9c, 0xff, 0xdb),
    Color::rgb(0x9c, 0xff, 0xff),
    Color::rgb(0x9c, 0xd3, 0xff),
    Color::rgb(0x9c, 0x9c, 0xff),
    Color::rgb(0xdc, 0x9c, 0xff),
    Color::rgb(0xff, 0x9c, 0xff),
    Color::rgb(0xff, 0x94, 0xd3),
    // 88-98: greyscale ramp
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x13, 0x13, 0x13),
    Color::rgb(0x28, 0x28, 0x28),
    Color::rgb(0x36, 0x36, 0x36),
    Color::rgb(0x4d, 0x4d, 0x4d),
    Color::rgb(0x65, 0x65, 0x65),
    Color::rgb(0x81, 0x81, 0x81),
    Color::rgb(0x9f, 0x9f, 0x9f),
    Color::rgb(0xbc, 0xbc, 0xbc),
    Color::rgb(0xe2, 0xe2, 0xe2),
    Color::rgb(0xff, 0xff, 0xff),
];

/// Index of the entry in `table` closest to `color`.
///
/// Distance is Euclidean over RGB; ties go to the lowest index. A fully
/// transparent color always maps to index 0, the background entry.
pub fn nearest_color(table: &[Color], color: Color) -> usize {
    if color.a == 0 {
        return 0;
    }

    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, entry) in table.iter().enumerate() {
        let dist = color.distance_sq(*entry);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Nearest [`ANSI_PALETTE`] entry for `color`
pub fn nearest_ansi(color: Color) -> Color {
    ANSI_PALETTE[nearest_color(&ANSI_PALETTE, color)]
}

/// Displayed color for a stored color plus its intensity flag.
///
/// An intense low-half ANSI color shows as its bright counterpart; anything
/// else shows as stored.
pub fn effective_color(color: Color, intense: bool) -> Color {
    if intense {
        if let Some(idx) = ANSI_PALETTE[..ANSI_LOW_HALF]
            .iter()
            .position(|c| *c == color)
        {
            return ANSI_PALETTE[idx + ANSI_LOW_HALF];
        }
    }
    color
}
