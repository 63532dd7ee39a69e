//! Font atlas system for text rendering
//!
//! This module packs the 256 single-byte glyphs of one face into a square
//! RGBA bitmap using shelf packing, recording each glyph's cell in a
//! [`GlyphMetricsTable`]. The bitmap is white with glyph coverage in alpha so
//! the uniform draw color tints it.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::glyph::{Glyph, GlyphMetricsTable, GLYPH_COUNT};
use super::rasterizer::{FontdueRasterizer, GlyphRasterizer, RasterSettings};
use crate::config::AtlasConfig;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    Load(String),

    /// Failed to rasterize a specific glyph character
    #[error("Failed to rasterize glyph '{0}': {1}")]
    Rasterize(char, String),

    /// The glyphs do not fit the fixed atlas
    #[error("Glyph {code_point} needs {required}px but the atlas is {available}px")]
    AtlasOverflow {
        /// First code point that did not fit
        code_point: u8,
        /// Extent the glyph would need along the overflowing axis
        required: u32,
        /// Atlas dimension
        available: u32,
    },

    /// Failed to write the atlas bitmap
    #[error("Failed to export atlas: {0}")]
    Export(String),
}

/// Horizontal offset of the pen inside a glyph cell
const PEN_INSET: f32 = 2.0;

/// Packs glyphs into a fixed-size atlas
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasBuilder {
    dimension: u32,
    padding: f32,
    row_gap: f32,
}

impl AtlasBuilder {
    /// Builder for a square atlas with the default padding and row gap
    pub fn new(dimension: u32) -> Self {
        Self::from_config(&AtlasConfig::default().with_dimension(dimension))
    }

    /// Builder from atlas configuration
    pub fn from_config(config: &AtlasConfig) -> Self {
        Self {
            dimension: config.dimension,
            padding: config.padding as f32,
            row_gap: config.row_gap as f32,
        }
    }

    /// Parse font bytes with `fontdue` and build an atlas from them
    pub fn build_from_bytes(&self, data: &[u8], settings: RasterSettings) -> FontResult<FontAtlas> {
        let rasterizer = FontdueRasterizer::from_bytes(data, settings)?;
        self.build(&rasterizer)
    }

    /// Rasterize code points 0-255 into a new atlas
    ///
    /// Glyphs are placed left to right in ascending code point order,
    /// wrapping to a new shelf when the row is full. Fails with
    /// [`FontError::AtlasOverflow`] if a glyph would leave the bitmap.
    pub fn build(&self, rasterizer: &dyn GlyphRasterizer) -> FontResult<FontAtlas> {
        let atlas_size = self.dimension as f32;
        let mut image =
            RgbaImage::from_pixel(self.dimension, self.dimension, Rgba([255, 255, 255, 0]));
        let mut glyphs = GlyphMetricsTable::new();
        let ascent = rasterizer.ascent();

        let mut x = 0.0f32;
        let mut y = 0.0f32;
        let mut row_height = 0.0f32;
        let mut line_height = 0.0f32;

        for code_point in 0..=u8::MAX {
            let ch = char::from(code_point);
            let bounds = rasterizer.glyph_bounds(ch)?;
            let width = bounds.advance.max(0.0) + self.padding;
            let height = bounds.height.max(0.0);

            if width > atlas_size {
                return Err(overflow(code_point, width, self.dimension));
            }

            // Wrap onto a new shelf
            if x + width > atlas_size {
                x = 0.0;
                y += row_height + self.row_gap;
                row_height = 0.0;
            }

            if y + height > atlas_size {
                return Err(overflow(code_point, y + height, self.dimension));
            }

            row_height = row_height.max(height);
            line_height = line_height.max(height);

            glyphs.set(code_point, Glyph { x, y, width, height });
            rasterizer.rasterize(ch, &mut image, x + PEN_INSET, y + ascent)?;

            x += width;
        }

        log::info!(
            "Atlas packed: {}x{}, {} glyphs, line height {}px",
            self.dimension, self.dimension, GLYPH_COUNT, line_height
        );

        Ok(FontAtlas {
            image,
            glyphs,
            line_height,
            padding: self.padding,
        })
    }
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::from_config(&AtlasConfig::default())
    }
}

fn overflow(code_point: u8, required: f32, available: u32) -> FontError {
    FontError::AtlasOverflow {
        code_point,
        required: required.ceil() as u32,
        available,
    }
}

/// Packed glyph bitmap and the placement of every glyph in it
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    image: RgbaImage,
    glyphs: GlyphMetricsTable,
    line_height: f32,
    padding: f32,
}

impl FontAtlas {
    /// Glyph cell for a character, `None` outside 0-255
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(ch)
    }

    /// All glyph cells
    pub fn glyphs(&self) -> &GlyphMetricsTable {
        &self.glyphs
    }

    /// Atlas bitmap
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height of the atlas bitmap
    pub fn dimension(&self) -> u32 {
        self.image.width()
    }

    /// Tallest glyph cell in atlas pixels
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Horizontal padding included in every glyph width
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Write the atlas bitmap to a PNG file for debugging
    pub fn save_png(&self, path: impl AsRef<Path>) -> FontResult<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| FontError::Export(format!("{}: {e}", path.display())))?;
        log::info!("Atlas written to {}", path.display());
        Ok(())
    }
}
