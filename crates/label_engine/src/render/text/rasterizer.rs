//! Glyph rasterization
//!
//! The atlas builder only needs two things from a font: how big each glyph
//! cell is and a way to paint the glyph into the atlas bitmap. Both go through
//! [`GlyphRasterizer`]. [`FontdueRasterizer`] implements it with the `fontdue`
//! library for pure Rust font rendering; [`FontProvider`] turns a logical font
//! name into a rasterizer.

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings, LineMetrics};
use image::{Rgba, RgbaImage};

use super::font_atlas::{FontError, FontResult};

/// How a face is rasterized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// Size in pixels
    pub size: f32,
    /// Keep the coverage ramp on glyph edges
    pub anti_alias: bool,
    /// Keep fractional advance widths
    pub fractional_metrics: bool,
}

impl RasterSettings {
    /// Settings with both hints enabled
    pub fn new(size: f32) -> Self {
        Self { size, anti_alias: true, fractional_metrics: true }
    }
}

/// Cell geometry of one glyph, before padding
///
/// Every cell's top sits [`GlyphRasterizer::ascent`] above the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBounds {
    /// Advance width in pixels
    pub advance: f32,
    /// Cell height in pixels
    pub height: f32,
}

/// Source of glyph metrics and bitmaps for one face at one size
pub trait GlyphRasterizer {
    /// Distance from the top of a cell to the baseline
    fn ascent(&self) -> f32;

    /// Cell geometry of a character
    fn glyph_bounds(&self, ch: char) -> FontResult<GlyphBounds>;

    /// Paint a character into `target` with its pen at `(pen_x, baseline_y)`
    ///
    /// Pixels falling outside `target` are dropped.
    fn rasterize(
        &self,
        ch: char,
        target: &mut RgbaImage,
        pen_x: f32,
        baseline_y: f32,
    ) -> FontResult<()>;
}

/// Glyph rasterizer backed by a `fontdue` font
pub struct FontdueRasterizer {
    font: Font,
    settings: RasterSettings,
    line: LineMetrics,
}

impl FontdueRasterizer {
    /// Parse TrueType/OpenType font data
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use label_engine::render::text::{FontdueRasterizer, RasterSettings};
    /// let font_bytes = std::fs::read("resources/fonts/Inter-Medium.ttf").unwrap();
    /// let settings = RasterSettings::new(36.0);
    /// let rasterizer = FontdueRasterizer::from_bytes(&font_bytes, settings).unwrap();
    /// ```
    pub fn from_bytes(data: &[u8], settings: RasterSettings) -> FontResult<Self> {
        let font_settings = FontSettings { scale: settings.size, ..FontSettings::default() };
        let font = Font::from_bytes(data, font_settings)
            .map_err(|e| FontError::Load(format!("fontdue error: {e}")))?;
        let line = font
            .horizontal_line_metrics(settings.size)
            .ok_or_else(|| FontError::Load("font has no horizontal line metrics".to_string()))?;

        log::info!("Loaded font at {}px size", settings.size);
        Ok(Self { font, settings, line })
    }

    /// Rasterization settings of this face
    pub fn settings(&self) -> RasterSettings {
        self.settings
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn ascent(&self) -> f32 {
        self.line.ascent
    }

    fn glyph_bounds(&self, ch: char) -> FontResult<GlyphBounds> {
        let metrics = self.font.metrics(ch, self.settings.size);
        let advance = if self.settings.fractional_metrics {
            metrics.advance_width
        } else {
            metrics.advance_width.round()
        };
        Ok(GlyphBounds { advance, height: self.line.new_line_size })
    }

    fn rasterize(
        &self,
        ch: char,
        target: &mut RgbaImage,
        pen_x: f32,
        baseline_y: f32,
    ) -> FontResult<()> {
        let (metrics, bitmap) = self.font.rasterize(ch, self.settings.size);
        if bitmap.len() < metrics.width * metrics.height {
            return Err(FontError::Rasterize(ch, "bitmap smaller than its metrics".to_string()));
        }

        let left = pen_x.round() as i64 + i64::from(metrics.xmin);
        let top = baseline_y.round() as i64 - i64::from(metrics.ymin) - metrics.height as i64;
        let (width, height) = target.dimensions();

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let coverage = bitmap[row * metrics.width + col];
                let alpha = match (self.settings.anti_alias, coverage) {
                    (_, 0) => continue,
                    (true, coverage) => coverage,
                    (false, coverage) if coverage >= 128 => u8::MAX,
                    (false, _) => continue,
                };
                let x = left + col as i64;
                let y = top + row as i64;
                if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                    continue;
                }
                let pixel = target.get_pixel_mut(x as u32, y as u32);
                *pixel = Rgba([u8::MAX, u8::MAX, u8::MAX, pixel[3].max(alpha)]);
            }
        }
        Ok(())
    }
}

/// Resolves logical font names to rasterizers
pub trait FontProvider: Send + Sync {
    /// Load `name` with the given settings
    fn load(&self, name: &str, settings: RasterSettings) -> FontResult<Box<dyn GlyphRasterizer>>;
}

/// Loads `<directory>/<name>.ttf` through `fontdue`
#[derive(Debug, Clone)]
pub struct DirectoryFontProvider {
    directory: PathBuf,
}

impl DirectoryFontProvider {
    /// Provider rooted at a directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Path a logical name resolves to
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(Path::new(name).with_extension("ttf"))
    }
}

impl FontProvider for DirectoryFontProvider {
    fn load(&self, name: &str, settings: RasterSettings) -> FontResult<Box<dyn GlyphRasterizer>> {
        let path = self.path_of(name);
        let data = std::fs::read(&path)
            .map_err(|e| FontError::Load(format!("{}: {e}", path.display())))?;
        Ok(Box::new(FontdueRasterizer::from_bytes(&data, settings)?))
    }
}
