//! Name tags
//!
//! [`NameTagRenderer`] is what the host calls in place of its own name tag
//! drawing. A tag is a translucent background with the text drawn twice: once
//! faintly with depth testing off, so it shows through walls, then opaque with
//! depth testing on. Failures never reach the host; the tag is skipped and a
//! warning logged.

use std::sync::Arc;

use super::positioner::{CameraOrientation, LabelPositioner};
use crate::config::{LabelConfig, LabelEngineConfig};
use crate::foundation::math::{Vec3, Vec4};
use crate::render::backend::{Primitive, RenderBackend, VertexFormat};
use crate::render::text::{FontRegistry, FontRenderer, FontResult};
use crate::render::RenderResult;

/// Top edge of the background quad, relative to the text origin
const BACKGROUND_TOP: f32 = -1.5;

/// Bottom edge of the background quad
const BACKGROUND_BOTTOM: f32 = 8.5;

/// Vertical offset of the text inside the tag
const TEXT_OFFSET: f32 = -1.0;

/// Subtitle baseline shift in world units before its size is added
const SUBTITLE_BASE_SHIFT: f32 = -0.2;

/// Something that can carry a name tag
pub trait LabelSubject {
    /// World position of the entity's feet
    fn position(&self) -> Vec3;

    /// Visual height of the entity
    fn height(&self) -> f32;

    /// Formatted name shown in the tag
    fn display_name(&self) -> String;

    /// Sneaking entities get a see-through only tag
    fn is_sneaking(&self) -> bool {
        false
    }
}

/// A subtitle drawn above the name, with its own size
#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    /// Formatted subtitle text
    pub text: String,
    /// Relative size; 1.0 is the host's default subtitle size
    pub size: f32,
}

/// Optional lines stacked below an entity's name
///
/// Lines are drawn bottom-up: subtitle, score, then the name itself. Which
/// lines exist is up to the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelLine {
    /// Subtitle shown lowest
    pub subtitle: Option<Subtitle>,
    /// Score line shown between subtitle and name
    pub score: Option<String>,
}

impl LabelLine {
    /// Add a subtitle
    pub fn with_subtitle(mut self, text: impl Into<String>, size: f32) -> Self {
        self.subtitle = Some(Subtitle { text: text.into(), size });
        self
    }

    /// Add a score line
    pub fn with_score(mut self, text: impl Into<String>) -> Self {
        self.score = Some(text.into());
        self
    }
}

/// Draws name tags above entities
pub struct NameTagRenderer {
    font: Arc<FontRenderer>,
    config: LabelConfig,
    positioner: LabelPositioner,
}

impl NameTagRenderer {
    /// Name tag renderer drawing with a font
    pub fn new(font: Arc<FontRenderer>, config: LabelConfig) -> Self {
        let positioner = LabelPositioner::new(&config);
        Self { font, config, positioner }
    }

    /// Name tag renderer using the registry's configured default font
    pub fn from_registry(registry: &FontRegistry, config: &LabelEngineConfig) -> FontResult<Self> {
        let font = registry.get(&config.font.name, config.font.size)?;
        Ok(Self::new(font, config.label.clone()))
    }

    /// Font used for tags
    pub fn font(&self) -> &Arc<FontRenderer> {
        &self.font
    }

    /// Placement of tags above entities
    pub fn positioner(&self) -> &LabelPositioner {
        &self.positioner
    }

    /// Width of a tag's text in text units
    pub fn measure_label(&self, text: &str) -> f32 {
        self.font.measure(text)
    }

    /// Draw a tag above a point
    pub fn render_label(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        anchor: Vec3,
        entity_height: f32,
        camera: CameraOrientation,
    ) {
        let result = self
            .positioner
            .with_billboard(backend, anchor, entity_height, camera, |backend| {
                self.draw_tag(backend, text)
            });
        if let Err(e) = result {
            log::warn!("Skipping label {text:?}: {e}");
        }
    }

    /// Draw the see-through only tag of a sneaking entity
    pub fn render_sneaking(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        anchor: Vec3,
        entity_height: f32,
        camera: CameraOrientation,
    ) {
        let result = self
            .positioner
            .with_billboard(backend, anchor, entity_height, camera, |backend| {
                let width = self.font.measure(text);
                self.draw_background(backend, width);
                backend.set_depth_test(true);
                backend.set_depth_write(true);
                self.font
                    .draw(backend, text, -width / 2.0, TEXT_OFFSET, self.config.see_through_color)
                    .map(|_| ())
            });
        if let Err(e) = result {
            log::warn!("Skipping sneaking label {text:?}: {e}");
        }
    }

    /// Draw an entity's name tag
    pub fn render_entity(
        &self,
        backend: &mut dyn RenderBackend,
        subject: &dyn LabelSubject,
        camera: CameraOrientation,
    ) {
        self.render_stack(backend, subject, &LabelLine::default(), camera);
    }

    /// Draw an entity's name with optional lines stacked below it
    ///
    /// Sneaking entities only get their name, see-through.
    pub fn render_stack(
        &self,
        backend: &mut dyn RenderBackend,
        subject: &dyn LabelSubject,
        lines: &LabelLine,
        camera: CameraOrientation,
    ) {
        let name = subject.display_name();
        let height = subject.height();
        let mut anchor = subject.position();

        if subject.is_sneaking() {
            self.render_sneaking(backend, &name, anchor, height, camera);
            return;
        }

        if let Some(subtitle) = &lines.subtitle {
            self.render_subtitle(backend, subtitle, anchor, height, camera);
            anchor.y += subtitle.size / 6.0;
        }

        if let Some(score) = &lines.score {
            self.render_label(backend, score, anchor, height, camera);
            let step = self.font.line_height() / 2.0 * self.config.score_line_step;
            anchor.y += step * self.config.scale;
        }

        self.render_label(backend, &name, anchor, height, camera);
    }

    fn render_subtitle(
        &self,
        backend: &mut dyn RenderBackend,
        subtitle: &Subtitle,
        anchor: Vec3,
        entity_height: f32,
        camera: CameraOrientation,
    ) {
        let shifted = anchor + Vec3::new(0.0, SUBTITLE_BASE_SHIFT + subtitle.size / 8.0, 0.0);
        // relative to the label scale the billboard already applied
        let shrink = self.config.subtitle_scale * subtitle.size / self.config.scale;
        let result = self
            .positioner
            .with_billboard(backend, shifted, entity_height, camera, |backend| {
                backend.scale(Vec3::new(shrink, shrink, shrink));
                self.draw_tag(backend, &subtitle.text)
            });
        if let Err(e) = result {
            log::warn!("Skipping subtitle {:?}: {e}", subtitle.text);
        }
    }

    fn draw_tag(&self, backend: &mut dyn RenderBackend, text: &str) -> RenderResult<()> {
        let width = self.font.measure(text);
        let x = -width / 2.0;
        self.draw_background(backend, width);

        self.font.draw(backend, text, x, TEXT_OFFSET, self.config.see_through_color)?;
        backend.set_depth_test(true);
        backend.set_depth_write(true);
        self.font.draw(backend, text, x, TEXT_OFFSET, self.config.text_color)?;
        Ok(())
    }

    fn draw_background(&self, backend: &mut dyn RenderBackend, width: f32) {
        let half = width / 2.0;
        let [r, g, b, a] = self.config.background;
        let color = Vec4::new(r, g, b, a);

        backend.set_texturing(false);
        backend.begin_batch(Primitive::Quads, VertexFormat::PositionColor);
        for (x, y) in [
            (-half - 1.0, BACKGROUND_TOP),
            (-half - 1.0, BACKGROUND_BOTTOM),
            (half + 1.0, BACKGROUND_BOTTOM),
            (half + 1.0, BACKGROUND_TOP),
        ] {
            backend.vertex_color(Vec3::new(x, y, 0.0), color);
        }
        backend.end_batch();
        backend.set_texturing(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::argb_to_rgba;
    use crate::render::recorder::{CommandRecorder, RenderCommand, StateFlags};
    use crate::tests::support::{synthetic_renderer, TestEntity};
    use approx::assert_relative_eq;

    fn name_tags() -> NameTagRenderer {
        NameTagRenderer::new(Arc::new(synthetic_renderer(1.0)), LabelConfig::default())
    }

    fn camera() -> CameraOrientation {
        CameraOrientation::new(10.0, 5.0)
    }

    #[test]
    fn test_background_spans_text() {
        let tags = name_tags();
        let mut recorder = CommandRecorder::new();
        tags.render_label(&mut recorder, "Steve", Vec3::zeros(), 1.8, camera());

        let width = tags.measure_label("Steve");
        match recorder.colored_batches().next() {
            Some(RenderCommand::Batch { vertices, flags, .. }) => {
                assert_eq!(vertices.len(), 4);
                assert_relative_eq!(vertices[0].position, Vec3::new(-width / 2.0 - 1.0, -1.5, 0.0));
                assert_relative_eq!(vertices[2].position, Vec3::new(width / 2.0 + 1.0, 8.5, 0.0));
                assert_relative_eq!(vertices[0].color.unwrap(), Vec4::new(0.0, 0.0, 0.0, 0.25));
                assert!(!flags.contains(StateFlags::TEXTURE_2D));
            }
            other => panic!("Expected background batch, got {other:?}"),
        };
    }

    #[test]
    fn test_see_through_pass_then_opaque_pass() {
        let tags = name_tags();
        let mut recorder = CommandRecorder::new();
        tags.render_label(&mut recorder, "A", Vec3::zeros(), 1.8, camera());

        let passes: Vec<_> = recorder
            .textured_batches()
            .map(|command| match command {
                RenderCommand::Batch { color, flags, .. } => (*color, *flags),
                RenderCommand::Line { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(passes.len(), 2);

        let (faint, faint_flags) = passes[0];
        assert_relative_eq!(faint, argb_to_rgba(0x20FF_FFFF));
        assert!(!faint_flags.contains(StateFlags::DEPTH_TEST));

        let (opaque, opaque_flags) = passes[1];
        assert_relative_eq!(opaque, argb_to_rgba(0xFFFF_FFFF));
        assert!(opaque_flags.contains(StateFlags::DEPTH_TEST | StateFlags::DEPTH_WRITE));
    }

    #[test]
    fn test_text_is_centered() {
        let tags = name_tags();
        let mut recorder = CommandRecorder::new();
        tags.render_label(&mut recorder, "AB", Vec3::zeros(), 1.8, camera());

        match recorder.textured_batches().next() {
            Some(RenderCommand::Batch { vertices, .. }) => {
                // glyph origin sits one unit left of and 1.5 above the pen
                assert_relative_eq!(vertices[1].position.x, -10.0 - 1.0);
                assert_relative_eq!(vertices[1].position.y, -1.0 - 1.5);
            }
            other => panic!("Expected glyph batch, got {other:?}"),
        };
    }

    #[test]
    fn test_sneaking_draws_see_through_only() {
        let tags = name_tags();
        let mut recorder = CommandRecorder::new();
        let sneaking = TestEntity::new("Alex").sneaking();
        tags.render_entity(&mut recorder, &sneaking, camera());

        assert_eq!(recorder.colored_batches().count(), 1);
        let colors: Vec<_> = recorder
            .textured_batches()
            .map(|command| match command {
                RenderCommand::Batch { color, flags, .. } => {
                    assert!(flags.contains(StateFlags::DEPTH_TEST));
                    *color
                }
                RenderCommand::Line { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(colors.len(), "Alex".len());
        for color in colors {
            assert_relative_eq!(color, argb_to_rgba(0x20FF_FFFF));
        }
    }

    #[test]
    fn test_stack_steps_upward() {
        let tags = name_tags();
        let mut recorder = CommandRecorder::new();
        let entity = TestEntity::new("Alex");
        let lines = LabelLine::default().with_subtitle("Builder", 1.0).with_score("12 kills");
        tags.render_stack(&mut recorder, &entity, &lines, camera());

        let heights: Vec<f32> = recorder
            .colored_batches()
            .map(|command| match command {
                RenderCommand::Batch { transform, .. } => transform[(1, 3)],
                RenderCommand::Line { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(heights.len(), 3);

        let base = entity.height + LabelConfig::default().height_offset;
        assert_relative_eq!(heights[0], base - 0.2 + 1.0 / 8.0, epsilon = 1e-5);
        let score_height = base + 1.0 / 6.0;
        assert_relative_eq!(heights[1], score_height, epsilon = 1e-5);
        let step = tags.font().line_height() / 2.0 * 2.35 * LabelConfig::default().scale;
        assert_relative_eq!(heights[2], score_height + step, epsilon = 1e-5);
        assert_eq!(recorder.state().depth(), 1);
    }

    #[test]
    fn test_upload_failure_skips_label() {
        let tags = name_tags();
        let mut backend = crate::tests::support::FailingUploadBackend::default();
        tags.render_label(&mut backend, "Steve", Vec3::zeros(), 1.8, camera());

        let state = backend.recorder.state();
        assert_eq!(state.depth(), 1);
        let restored = StateFlags::LIGHTING | StateFlags::DEPTH_TEST | StateFlags::DEPTH_WRITE;
        assert!(state.flags.contains(restored));
        assert!(!state.flags.contains(StateFlags::BLEND));
        assert_eq!(backend.recorder.textured_batches().count(), 0);
    }
}
