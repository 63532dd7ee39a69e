//! Label demo application
//!
//! Runs the whole label pipeline without a window: loads the configuration,
//! builds the font atlas, writes it out as PNG, measures a few strings and
//! renders name tags for a small cast into a recording backend.
//!
//! Usage: `label_demo [config.toml] [atlas.png]`

mod block_font;
mod scene;

use std::path::Path;
use std::sync::Arc;

use label_engine::config::{Config, ConfigError, LabelEngineConfig};
use label_engine::foundation::logging;
use label_engine::render::label::{CameraOrientation, NameTagRenderer};
use label_engine::render::text::{
    DirectoryFontProvider, FontError, FontProvider, FontRegistry, FontRenderer,
};
use label_engine::render::CommandRecorder;

use block_font::BlockFontProvider;

const DEFAULT_CONFIG: &str = "labels.toml";
const DEFAULT_ATLAS: &str = "label_atlas.png";

const SAMPLES: &[&str] = &[
    "Steve",
    "§cRed§r and §9blue",
    "§nUnderlined§r §mstruck",
    "§kobfuscated",
    "trailing escape §",
];

/// Errors that end the demo
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Font(#[from] FontError),
}

fn load_config(path: &str) -> Result<LabelEngineConfig, ConfigError> {
    let config = if Path::new(path).exists() {
        log::info!("Loading configuration from {path}");
        LabelEngineConfig::load_from_file(path)?
    } else {
        log::info!("{path} not found, using default configuration");
        LabelEngineConfig::default()
    };
    config.validate()?;
    Ok(config)
}

fn build_font(config: &LabelEngineConfig) -> Result<Arc<FontRenderer>, FontError> {
    let provider: Arc<dyn FontProvider> =
        Arc::new(DirectoryFontProvider::new(config.font.directory.clone()));
    let registry = FontRegistry::from_config(provider, config);

    match registry.get(&config.font.name, config.font.size) {
        Ok(font) => Ok(font),
        Err(FontError::Load(reason)) => {
            log::warn!("Falling back to block glyphs: {reason}");
            let provider: Arc<dyn FontProvider> = Arc::new(BlockFontProvider);
            FontRegistry::from_config(provider, config).get(&config.font.name, config.font.size)
        }
        Err(e) => Err(e),
    }
}

fn run(config_path: &str, atlas_path: &str) -> Result<(), DemoError> {
    let config = load_config(config_path)?;
    let font = build_font(&config)?;

    font.atlas().save_png(atlas_path)?;

    for sample in SAMPLES {
        log::info!("{:>8.2} units  {sample:?}", font.measure(sample));
    }
    log::info!("Line height: {} units", font.line_height());

    let tags = NameTagRenderer::new(Arc::clone(&font), config.label.clone());
    let camera = CameraOrientation::new(30.0, 12.0);
    let mut recorder = CommandRecorder::new();

    for entity in scene::cast() {
        let before = recorder.commands().len();
        tags.render_stack(&mut recorder, &entity, &entity.lines, camera);
        log::info!(
            "{:?}: {} commands, tag {:.2} units wide",
            entity.name,
            recorder.commands().len() - before,
            tags.measure_label(&entity.name)
        );
    }

    log::info!(
        "Recorded {} glyph batches, {} backgrounds, {} lines across {} texture(s)",
        recorder.textured_batches().count(),
        recorder.colored_batches().count(),
        recorder.lines().count(),
        recorder.textures().len()
    );
    if recorder.state().depth() != 1 || recorder.stack_underflows() != 0 {
        log::error!("Transform stack unbalanced after rendering");
    }
    Ok(())
}

fn main() {
    logging::init("info");
    log::info!("Starting label demo");

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let atlas_path = args.next().unwrap_or_else(|| DEFAULT_ATLAS.to_string());

    if let Err(e) = run(&config_path, &atlas_path) {
        log::error!("Label demo failed: {e}");
        std::process::exit(1);
    }
    log::info!("Label demo finished successfully");
}
