//! Formatted text renderer
//!
//! [`FontRenderer`] draws and measures text made of atlas glyphs and inline
//! format codes. Measuring and drawing run the same single left-to-right pass
//! over the text, so the width a caller measures is exactly the width the
//! draw consumes.
//!
//! # Coordinate System
//!
//! Callers work in text units. Internally the pass runs in atlas pixels, which
//! are `supersample` times finer; the transform is scaled down by that factor
//! while drawing and every returned width is divided back by it.

use std::sync::{Arc, OnceLock};

use super::font_atlas::FontAtlas;
use super::format::{self, FormatState, Token};
use super::glyph::Glyph;
use super::palette;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::backend::{
    argb_to_rgba, Primitive, RenderBackend, TextureFilter, TextureId, VertexFormat,
};
use crate::render::RenderResult;

/// Glyph drawn in place of every character while obfuscated
pub const OBFUSCATION_FILLER: char = '*';

/// Default supersampling factor between atlas pixels and text units
pub const DEFAULT_SUPERSAMPLE: f32 = 8.0;

/// Pen origin offset applied to every draw, in text units
const ORIGIN_OFFSET_X: f32 = 1.0;
const ORIGIN_OFFSET_Y: f32 = 1.5;

/// Width of strikethrough and underline strokes
const DECORATION_WIDTH: f32 = 2.0;

/// Distance of the underline above the bottom of its glyph cell
const UNDERLINE_INSET: f32 = 2.0;

/// Colors with none of these bits set count as fully opaque
const ALPHA_PRESENT_MASK: u32 = 0xFC00_0000;

/// Host facility that draws characters the atlas does not cover
pub trait HostTextFallback: Send + Sync {
    /// Width of a character in text units
    fn char_width(&self, ch: char) -> f32;

    /// Draw a character with its top-left at `(x, y)` in text units
    fn draw_char(&self, backend: &mut dyn RenderBackend, ch: char, x: f32, y: f32, color: u32);
}

/// Draw target of one pass
struct Pen<'b> {
    backend: &'b mut dyn RenderBackend,
    texture: TextureId,
    origin: Vec2,
    base_color: u32,
    alpha: f32,
    shadow: bool,
}

impl Pen<'_> {
    /// Packed `0xAARRGGBB` of the active color
    fn color(&self, state: &FormatState) -> u32 {
        let mut rgb = state.rgb(self.base_color);
        if self.shadow && state.color_index.is_some() {
            rgb = palette::shadow(rgb);
        }
        ((state.base_alpha * 255.0).round() as u32) << 24 | rgb & 0x00FF_FFFF
    }

    fn apply_color(&mut self, state: &FormatState) {
        let color = self.color(state);
        self.backend.set_color(argb_to_rgba(color));
    }

    fn restore_atlas(&mut self, state: &FormatState) {
        self.backend.set_texturing(true);
        self.backend.bind_texture(self.texture);
        self.apply_color(state);
    }
}

/// Text renderer over one font atlas
pub struct FontRenderer {
    atlas: FontAtlas,
    supersample: f32,
    fallback: Option<Arc<dyn HostTextFallback>>,
    texture: OnceLock<TextureId>,
}

impl FontRenderer {
    /// Renderer with the default supersampling factor and no fallback
    pub fn new(atlas: FontAtlas) -> Self {
        Self {
            atlas,
            supersample: DEFAULT_SUPERSAMPLE,
            fallback: None,
            texture: OnceLock::new(),
        }
    }

    /// Set the supersampling factor (atlas pixels per text unit)
    ///
    /// Zero, negative and non-finite factors are ignored with a warning.
    pub fn with_supersample(mut self, supersample: f32) -> Self {
        self.supersample = checked_supersample(supersample, self.supersample);
        self
    }

    /// Route characters outside 0-255 to a host facility
    pub fn with_fallback(mut self, fallback: Arc<dyn HostTextFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// The atlas this renderer draws from
    pub fn atlas(&self) -> &FontAtlas {
        &self.atlas
    }

    /// Supersampling factor
    pub fn supersample(&self) -> f32 {
        self.supersample
    }

    /// Line height in text units
    pub fn line_height(&self) -> f32 {
        ((self.atlas.line_height() - 6.0) / self.supersample).floor().max(0.0)
    }

    /// Width of formatted text in text units
    pub fn measure(&self, text: &str) -> f32 {
        self.layout(text, None)
    }

    /// Draw formatted text with its top-left at `(x, y)`
    ///
    /// `color` is `0xAARRGGBB`; returns the consumed width.
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        x: f32,
        y: f32,
        color: u32,
    ) -> RenderResult<f32> {
        self.draw_pass(backend, text, Vec2::new(x, y), color, false)
    }

    /// Draw a darkened copy one unit down-right, then the text itself
    pub fn draw_with_shadow(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        x: f32,
        y: f32,
        color: u32,
    ) -> RenderResult<f32> {
        let shadow_width = self.draw_pass(backend, text, Vec2::new(x + 1.0, y + 1.0), color, true)?;
        let width = self.draw_pass(backend, text, Vec2::new(x, y), color, false)?;
        Ok(shadow_width.max(width))
    }

    /// Draw text horizontally centered on `x`
    pub fn draw_centered(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        x: f32,
        y: f32,
        color: u32,
    ) -> RenderResult<f32> {
        self.draw(backend, text, x - self.measure(text) / 2.0, y, color)
    }

    /// Draw shadowed text horizontally centered on `x`
    pub fn draw_centered_with_shadow(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        x: f32,
        y: f32,
        color: u32,
    ) -> RenderResult<f32> {
        self.draw_with_shadow(backend, text, x - self.measure(text) / 2.0, y, color)
    }

    fn draw_pass(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        origin: Vec2,
        color: u32,
        shadow: bool,
    ) -> RenderResult<f32> {
        let texture = self.texture_for(backend)?;

        let color = if color & ALPHA_PRESENT_MASK == 0 { color | 0xFF00_0000 } else { color };
        let alpha = (color >> 24 & 0xFF) as f32 / 255.0;
        let base_color = if shadow { palette::shadow(color) } else { color };

        backend.push_matrix();
        backend.set_blend(true);
        backend.scale(Vec3::new(1.0 / self.supersample, 1.0 / self.supersample, 1.0));
        backend.set_texturing(true);
        backend.bind_texture(texture);
        backend.set_texture_filter(TextureFilter::Linear);

        let mut pen = Pen { backend, texture, origin, base_color, alpha, shadow };
        let width = self.layout(text, Some(&mut pen));

        pen.backend.set_texture_filter(TextureFilter::Nearest);
        pen.backend.pop_matrix();
        Ok(width)
    }

    fn texture_for(&self, backend: &mut dyn RenderBackend) -> RenderResult<TextureId> {
        if let Some(texture) = self.texture.get() {
            return Ok(*texture);
        }
        let texture = backend.upload_texture(self.atlas.image())?;
        log::debug!("Uploaded font atlas as {texture:?}");
        Ok(*self.texture.get_or_init(|| texture))
    }

    /// The single pass behind measuring and drawing
    ///
    /// Returns the width in text units. With a pen, glyphs are drawn as they
    /// are placed.
    fn layout(&self, text: &str, mut pen: Option<&mut Pen<'_>>) -> f32 {
        let scale = self.supersample;
        let padding = self.atlas.padding();
        let mut state = FormatState::new(pen.as_ref().map_or(1.0, |pen| pen.alpha));
        let mut advance = 0.0f32;

        if let Some(pen) = pen.as_deref_mut() {
            pen.apply_color(&state);
        }

        for token in format::tokens(text) {
            match token {
                Token::Ignored => {}
                Token::Code(code) => {
                    state.apply(code);
                    if let Some(pen) = pen.as_deref_mut() {
                        pen.apply_color(&state);
                    }
                }
                Token::Char(ch) => {
                    let shown = if state.obfuscated { OBFUSCATION_FILLER } else { ch };
                    match self.atlas.glyph(shown) {
                        Some(glyph) => {
                            if let Some(pen) = pen.as_deref_mut() {
                                self.draw_glyph(pen, &state, glyph, advance);
                            }
                            advance += glyph.width - padding;
                        }
                        None => {
                            let Some(fallback) = self.fallback.as_deref() else {
                                log::trace!("No fallback for {ch:?}, skipping");
                                continue;
                            };
                            if let Some(pen) = pen.as_deref_mut() {
                                let x = pen.origin.x + advance / scale;
                                let color = pen.color(&state);
                                pen.backend.scale(Vec3::new(scale, scale, 1.0));
                                fallback.draw_char(&mut *pen.backend, ch, x, pen.origin.y, color);
                                pen.backend.scale(Vec3::new(1.0 / scale, 1.0 / scale, 1.0));
                                pen.restore_atlas(&state);
                            }
                            advance += fallback.char_width(ch) * scale;
                        }
                    }
                }
            }
        }

        advance / scale
    }

    fn draw_glyph(&self, pen: &mut Pen<'_>, state: &FormatState, glyph: &Glyph, advance: f32) {
        let scale = self.supersample;
        let x = (pen.origin.x - ORIGIN_OFFSET_X) * scale + advance;
        let y = (pen.origin.y - ORIGIN_OFFSET_Y) * scale;
        let size = self.atlas.dimension() as f32;

        let (s0, t0) = (glyph.x / size, glyph.y / size);
        let (s1, t1) = ((glyph.x + glyph.width) / size, (glyph.y + glyph.height) / size);
        let (x1, y1) = (x + glyph.width, y + glyph.height);

        let backend = &mut *pen.backend;
        backend.begin_batch(Primitive::Triangles, VertexFormat::PositionTex);
        for (vx, vy, u, v) in [
            (x1, y, s1, t0),
            (x, y, s0, t0),
            (x, y1, s0, t1),
            (x, y1, s0, t1),
            (x1, y1, s1, t1),
            (x1, y, s1, t0),
        ] {
            backend.vertex_tex(Vec3::new(vx, vy, 0.0), Vec2::new(u, v));
        }
        backend.end_batch();

        let drawn = glyph.width - self.atlas.padding();
        if state.strikethrough {
            let mid = y + glyph.height / 2.0;
            decoration(backend, x, x + drawn, mid);
        }
        if state.underline {
            let base = y + glyph.height - UNDERLINE_INSET;
            decoration(backend, x, x + drawn, base);
        }
    }
}

fn decoration(backend: &mut dyn RenderBackend, from: f32, to: f32, y: f32) {
    backend.set_texturing(false);
    backend.draw_line(Vec2::new(from, y), Vec2::new(to, y), DECORATION_WIDTH);
    backend.set_texturing(true);
}

/// `requested` when it is a usable factor, otherwise `current`
pub(crate) fn checked_supersample(requested: f32, current: f32) -> f32 {
    if requested.is_finite() && requested > 0.0 {
        requested
    } else {
        log::warn!("Ignoring supersample factor {requested}, keeping {current}");
        current
    }
}
