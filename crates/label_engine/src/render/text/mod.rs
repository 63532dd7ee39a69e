//! Text rendering system
//!
//! Bitmap font atlases and the formatted text renderer built on them.
//!
//! # Architecture
//!
//! - [`AtlasBuilder`]: Packs glyphs 0-255 of one face into a [`FontAtlas`]
//! - [`FontRenderer`]: Measures and draws text with inline format codes
//! - [`FontRegistry`]: Builds at most one renderer per font name and size
//!
//! # Example
//!
//! ```no_run
//! use label_engine::render::text::{AtlasBuilder, FontRenderer, RasterSettings};
//!
//! let font_data = std::fs::read("resources/fonts/Inter-Medium.ttf")?;
//! let atlas = AtlasBuilder::new(1024).build_from_bytes(&font_data, RasterSettings::new(36.0))?;
//! let renderer = FontRenderer::new(atlas);
//! let width = renderer.measure("§cWarning§r: low health");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod font_atlas;
pub mod format;
pub mod glyph;
pub mod palette;
pub mod rasterizer;
pub mod registry;
pub mod text_renderer;

pub use font_atlas::{AtlasBuilder, FontAtlas, FontError, FontResult};
pub use format::{FormatCode, FormatState};
pub use glyph::{Glyph, GlyphMetricsTable};
pub use rasterizer::{
    DirectoryFontProvider, FontProvider, FontdueRasterizer, GlyphBounds, GlyphRasterizer,
    RasterSettings,
};
pub use registry::{FontKey, FontRegistry};
pub use text_renderer::{FontRenderer, HostTextFallback};
