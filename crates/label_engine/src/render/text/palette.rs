//! Legacy format-code color palette
//!
//! Indices 0-15 are the sixteen format colors, 16-31 their shadow variants.
//! The values are bit-for-bit those of the classic formatting convention.

/// Number of palette entries
pub const PALETTE_SIZE: usize = 32;

/// Packed `0xRRGGBB` palette, computed at compile time
pub const PALETTE: [u32; PALETTE_SIZE] = build_palette();

/// Per-channel factor of the "darker" transform
const DARKER_FACTOR: f32 = 0.7;

const fn build_palette() -> [u32; PALETTE_SIZE] {
    let mut palette = [0u32; PALETTE_SIZE];
    let mut i = 0;
    while i < PALETTE_SIZE {
        let index = i as u32;
        let bright = (index >> 3 & 1) * 85;
        let mut r = (index >> 2 & 1) * 170 + bright;
        let mut g = (index >> 1 & 1) * 170 + bright;
        let mut b = (index & 1) * 170 + bright;

        // gold
        if index == 6 {
            r += 85;
        }

        if index >= 16 {
            r /= 4;
            g /= 4;
            b /= 4;
        }

        palette[i] = (r & 255) << 16 | (g & 255) << 8 | b & 255;
        i += 1;
    }
    palette
}

/// Palette color for an index, `None` past the table
pub fn color(index: usize) -> Option<u32> {
    PALETTE.get(index).copied()
}

/// Darken every RGB channel by 30%, keeping alpha
pub fn darker(argb: u32) -> u32 {
    let scale = |shift: u32| {
        let channel = (argb >> shift & 0xFF) as f32 * DARKER_FACTOR;
        (channel as u32).min(0xFF) << shift
    };
    (argb & 0xFF00_0000) | scale(16) | scale(8) | scale(0)
}

/// The shadow color used behind text: three darker steps
pub fn shadow(argb: u32) -> u32 {
    darker(darker(darker(argb)))
}
