//! Font registry
//!
//! Lazily builds one [`FontRenderer`] per logical font name and pixel size.
//! A key is built at most once, even when several threads ask for it at the
//! same time; later lookups share the result, failures included.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use super::font_atlas::{AtlasBuilder, FontResult};
use super::rasterizer::{FontProvider, RasterSettings};
use super::text_renderer::{
    checked_supersample, FontRenderer, HostTextFallback, DEFAULT_SUPERSAMPLE,
};
use crate::config::{AtlasConfig, LabelEngineConfig};

/// Registry key: logical font name and pixel size
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    /// Logical font name
    pub name: String,
    /// Size in whole pixels
    pub size: u32,
}

impl FontKey {
    /// Key for a name and size
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self { name: name.into(), size }
    }
}

type Slot = Arc<OnceLock<FontResult<Arc<FontRenderer>>>>;

/// Cache of built font renderers
pub struct FontRegistry {
    provider: Arc<dyn FontProvider>,
    builder: AtlasBuilder,
    supersample: f32,
    anti_alias: bool,
    fractional_metrics: bool,
    fallback: Option<Arc<dyn HostTextFallback>>,
    default_key: Option<FontKey>,
    slots: Mutex<HashMap<FontKey, Slot>>,
}

impl FontRegistry {
    /// Registry over a font provider with the given atlas settings
    ///
    /// An unusable supersample factor falls back to the default of 8.
    pub fn new(provider: Arc<dyn FontProvider>, atlas: &AtlasConfig) -> Self {
        Self {
            provider,
            builder: AtlasBuilder::from_config(atlas),
            supersample: checked_supersample(atlas.supersample, DEFAULT_SUPERSAMPLE),
            anti_alias: true,
            fractional_metrics: true,
            fallback: None,
            default_key: None,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Registry configured from engine settings, with the configured font as default
    pub fn from_config(provider: Arc<dyn FontProvider>, config: &LabelEngineConfig) -> Self {
        let mut registry = Self::new(provider, &config.atlas)
            .with_hints(config.font.anti_alias, config.font.fractional_metrics);
        registry.default_key = Some(FontKey::new(config.font.name.clone(), config.font.size));
        registry
    }

    /// Rasterization hints applied to every font this registry builds
    pub fn with_hints(mut self, anti_alias: bool, fractional_metrics: bool) -> Self {
        self.anti_alias = anti_alias;
        self.fractional_metrics = fractional_metrics;
        self
    }

    /// Host fallback handed to every renderer this registry builds
    pub fn with_fallback(mut self, fallback: Arc<dyn HostTextFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Renderer for a font name and size, building it on first use
    ///
    /// A failed build is remembered: the provider is not asked again for the
    /// same key and every later call returns the same error.
    pub fn get(&self, name: &str, size: u32) -> FontResult<Arc<FontRenderer>> {
        let key = FontKey::new(name, size);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        slot.get_or_init(|| self.build(&key)).clone()
    }

    /// Renderer for the configured default font, if the registry has one
    pub fn default_renderer(&self) -> Option<FontResult<Arc<FontRenderer>>> {
        let key = self.default_key.as_ref()?;
        Some(self.get(&key.name, key.size))
    }

    /// Whether a key has already been built, successfully or not
    pub fn contains(&self, name: &str, size: u32) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots
            .get(&FontKey::new(name, size))
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of keys requested so far
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    /// Whether no key has been requested yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(&self, key: &FontKey) -> FontResult<Arc<FontRenderer>> {
        log::info!("Building font atlas for {} at {}px", key.name, key.size);

        let settings = RasterSettings {
            size: key.size as f32,
            anti_alias: self.anti_alias,
            fractional_metrics: self.fractional_metrics,
        };
        let result = self
            .provider
            .load(&key.name, settings)
            .and_then(|rasterizer| self.builder.build(rasterizer.as_ref()));

        match result {
            Ok(atlas) => {
                let mut renderer = FontRenderer::new(atlas).with_supersample(self.supersample);
                if let Some(fallback) = &self.fallback {
                    renderer = renderer.with_fallback(Arc::clone(fallback));
                }
                Ok(Arc::new(renderer))
            }
            Err(e) => {
                log::warn!("Font {} at {}px unavailable, using host text: {e}", key.name, key.size);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::font_atlas::FontError;
    use crate::render::text::rasterizer::GlyphRasterizer;
    use crate::tests::support::SyntheticRasterizer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        loads: AtomicUsize,
        fail: bool,
    }

    impl FontProvider for CountingProvider {
        fn load(
            &self,
            name: &str,
            _settings: RasterSettings,
        ) -> FontResult<Box<dyn GlyphRasterizer>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FontError::Load(format!("{name} not found")));
            }
            Ok(Box::new(SyntheticRasterizer::default()))
        }
    }

    fn registry(provider: &Arc<CountingProvider>) -> FontRegistry {
        let provider: Arc<dyn FontProvider> = provider.clone();
        FontRegistry::new(provider, &AtlasConfig::default())
    }

    #[test]
    fn test_same_key_builds_once() {
        let provider = Arc::new(CountingProvider::default());
        let registry = registry(&provider);

        let first = registry.get("Inter", 36).unwrap();
        let second = registry.get("Inter", 36).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
        assert!(registry.contains("Inter", 36));
    }

    #[test]
    fn test_distinct_sizes_are_distinct_keys() {
        let provider = Arc::new(CountingProvider::default());
        let registry = registry(&provider);

        registry.get("Inter", 36).unwrap();
        registry.get("Inter", 18).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(provider.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_racing_callers_share_one_build() {
        let provider = Arc::new(CountingProvider::default());
        let registry = registry(&provider);

        let renderers: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get("Inter", 36).unwrap()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
        assert!(renderers.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn test_failure_is_cached() {
        let provider = Arc::new(CountingProvider { fail: true, ..CountingProvider::default() });
        let registry = registry(&provider);

        assert!(matches!(registry.get("Missing", 12), Err(FontError::Load(_))));
        assert!(matches!(registry.get("Missing", 12), Err(FontError::Load(_))));
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unusable_supersample_falls_back_to_default() {
        let provider: Arc<dyn FontProvider> = Arc::new(CountingProvider::default());
        let atlas = AtlasConfig { supersample: f32::NAN, ..AtlasConfig::default() };
        let renderer = FontRegistry::new(provider, &atlas).get("Inter", 36).unwrap();

        assert!((renderer.supersample() - DEFAULT_SUPERSAMPLE).abs() < f32::EPSILON);
        assert!(renderer.measure("Inter").is_finite());
    }

    #[test]
    fn test_default_renderer_uses_configured_font() {
        let provider = Arc::new(CountingProvider::default());
        let dyn_provider: Arc<dyn FontProvider> = provider.clone();
        let configured = FontRegistry::from_config(dyn_provider, &LabelEngineConfig::default());

        assert!(configured.is_empty());
        assert!(configured.default_renderer().unwrap().is_ok());
        let font = LabelEngineConfig::default().font;
        assert!(configured.contains(&font.name, font.size));
        assert!(registry(&provider).default_renderer().is_none());
    }
}
