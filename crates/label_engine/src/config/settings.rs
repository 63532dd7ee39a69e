//! # Label Engine Configuration
//!
//! Configuration for the three moving parts of the label pipeline: which font
//! face to load, how its atlas is packed, and how labels sit above entities.
//! Every group has defaults matching the classic name tag look, so an empty
//! TOML file is a valid configuration.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// # Font Configuration
///
/// Which face to load and how to rasterize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Directory searched for `<name>.ttf`
    pub directory: String,
    /// Logical font name (file stem)
    pub name: String,
    /// Pixel size the atlas is rasterized at
    pub size: u32,
    /// Whether glyph edges keep their coverage ramp
    pub anti_alias: bool,
    /// Whether advance widths keep their fractional part
    pub fractional_metrics: bool,
}

impl FontConfig {
    /// Create a font configuration for a named face
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    /// Set the directory fonts are loaded from
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set anti-aliasing and fractional metrics
    pub fn with_hints(mut self, anti_alias: bool, fractional_metrics: bool) -> Self {
        self.anti_alias = anti_alias;
        self.fractional_metrics = fractional_metrics;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Font name cannot be empty".to_string());
        }
        if self.size == 0 {
            return Err("Font size must be at least 1px".to_string());
        }
        Ok(())
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            directory: "resources/fonts".to_string(),
            name: "Inter-Medium".to_string(),
            size: 36,
            anti_alias: true,
            fractional_metrics: true,
        }
    }
}

/// # Atlas Configuration
///
/// Packing parameters shared by every atlas the registry builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Width and height of the square atlas bitmap
    pub dimension: u32,
    /// Horizontal padding added to every glyph width
    pub padding: u32,
    /// Vertical gap between shelves
    pub row_gap: u32,
    /// Supersampling factor between atlas pixels and text units
    pub supersample: f32,
}

impl AtlasConfig {
    /// Set the atlas dimension
    pub fn with_dimension(mut self, dimension: u32) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the supersampling factor
    pub fn with_supersample(mut self, supersample: f32) -> Self {
        self.supersample = supersample;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("Atlas dimension must be positive".to_string());
        }
        if self.padding >= self.dimension {
            return Err(format!(
                "Glyph padding {} does not fit a {}px atlas",
                self.padding, self.dimension
            ));
        }
        if !(self.supersample.is_finite() && self.supersample > 0.0) {
            return Err(format!("Supersample factor must be positive, got {}", self.supersample));
        }
        Ok(())
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            dimension: 1024,
            padding: 8,
            row_gap: 8,
            supersample: 8.0,
        }
    }
}

/// # Label Configuration
///
/// Placement and colors of the label drawn above an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Extra height above the entity's visual height
    pub height_offset: f32,
    /// Uniform world scale applied to label text units
    pub scale: f32,
    /// Background quad color (RGBA, 0.0 - 1.0)
    pub background: [f32; 4],
    /// Text color of the pass drawn without depth testing (ARGB)
    pub see_through_color: u32,
    /// Text color of the depth-tested pass (ARGB)
    pub text_color: u32,
    /// World scale of a subtitle line at size 1.0
    pub subtitle_scale: f32,
    /// Multiplier on half the line height when stepping past a score line
    pub score_line_step: f32,
}

impl LabelConfig {
    /// Set the label height offset
    pub fn with_height_offset(mut self, height_offset: f32) -> Self {
        self.height_offset = height_offset;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(format!("Label scale must be positive, got {}", self.scale));
        }
        if self.background.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err("Background color components must be within 0.0 - 1.0".to_string());
        }
        Ok(())
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.5,
            scale: 0.026_666_67,
            background: [0.0, 0.0, 0.0, 0.25],
            see_through_color: 0x20FF_FFFF,
            text_color: 0xFFFF_FFFF,
            subtitle_scale: 0.016_666_668,
            score_line_step: 2.35,
        }
    }
}

/// # Complete Label Engine Configuration
///
/// Top-level configuration that encompasses font, atlas and label settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelEngineConfig {
    /// Font face settings
    pub font: FontConfig,
    /// Atlas packing settings
    pub atlas: AtlasConfig,
    /// Label placement settings
    pub label: LabelConfig,
}

impl LabelEngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.font.validate().map_err(ConfigError::Invalid)?;
        self.atlas.validate().map_err(ConfigError::Invalid)?;
        self.label.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for LabelEngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LabelEngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LabelEngineConfig = toml::from_str(
            r#"
            [font]
            name = "ProductSans"
            size = 72

            [label]
            see_through_color = 0x10FFFFFF
            "#,
        )
        .unwrap();

        assert_eq!(config.font.name, "ProductSans");
        assert_eq!(config.font.size, 72);
        assert!(config.font.anti_alias);
        assert_eq!(config.atlas, AtlasConfig::default());
        assert_eq!(config.label.see_through_color, 0x10FF_FFFF);
        assert_eq!(config.label.text_color, 0xFFFF_FFFF);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = LabelEngineConfig {
            font: FontConfig::new("Inter-Medium", 48).with_hints(false, true),
            ..LabelEngineConfig::default()
        };
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: LabelEngineConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = LabelEngineConfig::default();
        config.atlas.supersample = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = LabelEngineConfig::default();
        config.font.size = 0;
        assert!(config.validate().is_err());

        let mut config = LabelEngineConfig::default();
        config.label.background = [0.0, 0.0, 0.0, 1.5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = LabelEngineConfig::default().save_to_file("labels.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
