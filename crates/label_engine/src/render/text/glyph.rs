//! Glyph geometry stored in a font atlas

/// Number of code points an atlas covers (one byte)
pub const GLYPH_COUNT: usize = 256;

/// Placement of a single glyph in the atlas bitmap
///
/// `width` includes the atlas padding; layout subtracts it again.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Glyph {
    /// X of the glyph cell in atlas pixels
    pub x: f32,
    /// Y of the glyph cell in atlas pixels
    pub y: f32,
    /// Cell width including padding
    pub width: f32,
    /// Cell height
    pub height: f32,
}

impl Glyph {
    /// Whether two glyph cells share any area
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Fixed table of glyph placements indexed by code point
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetricsTable {
    glyphs: [Glyph; GLYPH_COUNT],
}

impl GlyphMetricsTable {
    /// Empty table, every glyph zero-sized at the origin
    pub fn new() -> Self {
        Self { glyphs: [Glyph::default(); GLYPH_COUNT] }
    }

    /// Glyph for a character, `None` outside the single-byte range
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(ch as usize)
    }

    /// Iterate `(code point, glyph)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Glyph)> {
        (0..=u8::MAX).zip(self.glyphs.iter())
    }

    pub(crate) fn set(&mut self, code_point: u8, glyph: Glyph) {
        self.glyphs[code_point as usize] = glyph;
    }
}

impl Default for GlyphMetricsTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_single_byte() {
        let mut table = GlyphMetricsTable::new();
        table.set(b'A', Glyph { x: 4.0, y: 0.0, width: 18.0, height: 20.0 });

        assert_eq!(table.get('A').map(|g| g.width), Some(18.0));
        assert!(table.get('\u{00FF}').is_some());
        assert!(table.get('\u{0100}').is_none());
        assert_eq!(table.iter().count(), GLYPH_COUNT);
    }

    #[test]
    fn test_adjacent_cells_do_not_overlap() {
        let a = Glyph { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        let b = Glyph { x: 10.0, y: 0.0, width: 10.0, height: 10.0 };
        let c = Glyph { x: 5.0, y: 5.0, width: 10.0, height: 10.0 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
