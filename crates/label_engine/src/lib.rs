//! # Label Engine
//!
//! Floating, formatted text labels above entities in a 3D scene.
//!
//! ## Features
//!
//! - **Glyph Atlas**: Shelf-packed bitmap of one face's 256 single-byte glyphs
//! - **Formatted Text**: Inline `§` color and style codes, shadows, obfuscation
//! - **Billboards**: Camera-facing placement with scoped render state
//! - **Name Tags**: See-through and opaque passes, stacked subtitle and score lines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use label_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LabelEngineConfig::load_from_file("labels.toml")?;
//!     let provider = Arc::new(DirectoryFontProvider::new(config.font.directory.clone()));
//!     let registry = FontRegistry::from_config(provider, &config);
//!     let tags = NameTagRenderer::from_registry(&registry, &config)?;
//!
//!     let mut backend = CommandRecorder::new();
//!     let camera = CameraOrientation::new(45.0, 10.0);
//!     tags.render_label(&mut backend, "§aSteve", Vec3::new(0.0, 64.0, 0.0), 1.8, camera);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

#[cfg(test)]
mod tests;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, LabelEngineConfig},
        foundation::math::{Mat4, Vec3, Vec4},
        render::{
            label::{CameraOrientation, LabelLine, LabelPositioner, LabelSubject, NameTagRenderer},
            text::{
                AtlasBuilder, DirectoryFontProvider, FontRegistry, FontRenderer, HostTextFallback,
            },
            BackendError, CommandRecorder, FontError, RenderBackend, RenderError,
        },
    };
}
