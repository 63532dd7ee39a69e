//! Stand-in font used when the configured face cannot be loaded
//!
//! Every glyph is a solid block whose width follows a rough character class,
//! enough to see packing, measuring and label layout work end to end.

use image::{Rgba, RgbaImage};
use label_engine::render::text::{
    FontProvider, FontResult, GlyphBounds, GlyphRasterizer, RasterSettings,
};

/// Provider that answers every name with a block font
#[derive(Debug, Default)]
pub struct BlockFontProvider;

impl FontProvider for BlockFontProvider {
    fn load(&self, name: &str, settings: RasterSettings) -> FontResult<Box<dyn GlyphRasterizer>> {
        log::debug!("Using block glyphs for {name}");
        Ok(Box::new(BlockRasterizer { size: settings.size }))
    }
}

struct BlockRasterizer {
    size: f32,
}

impl BlockRasterizer {
    fn advance(&self, ch: char) -> f32 {
        let em = match ch {
            'i' | 'l' | '!' | '.' | ',' | '\'' | '|' => 0.25,
            'm' | 'w' | 'M' | 'W' | '@' => 0.8,
            ' ' => 0.3,
            _ if ch.is_control() => 0.0,
            _ => 0.55,
        };
        (self.size * em).round()
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn ascent(&self) -> f32 {
        (self.size * 0.8).round()
    }

    fn glyph_bounds(&self, ch: char) -> FontResult<GlyphBounds> {
        Ok(GlyphBounds { advance: self.advance(ch), height: self.size.round() })
    }

    fn rasterize(
        &self,
        ch: char,
        target: &mut RgbaImage,
        pen_x: f32,
        baseline_y: f32,
    ) -> FontResult<()> {
        if ch.is_whitespace() || ch.is_control() {
            return Ok(());
        }
        let left = pen_x as u32 + 1;
        let right = (pen_x + self.advance(ch)) as u32;
        let top = (baseline_y - self.ascent() * 0.7) as u32;
        let bottom = baseline_y as u32;
        let (width, height) = target.dimensions();
        for y in top..bottom.min(height) {
            for x in left..right.min(width) {
                target.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        Ok(())
    }
}
