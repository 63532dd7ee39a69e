//! Test fixtures: a synthetic font, a recording fallback, test entities and a
//! backend whose uploads fail

use std::collections::HashMap;
use std::sync::Mutex;

use image::{Rgba, RgbaImage};

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::backend::{
    BackendError, BackendResult, BlendFunc, Primitive, RenderBackend, TextureFilter, TextureId,
    VertexFormat,
};
use crate::render::label::LabelSubject;
use crate::render::recorder::CommandRecorder;
use crate::render::text::{
    AtlasBuilder, FontProvider, FontRenderer, FontResult, GlyphBounds, GlyphRasterizer,
    HostTextFallback, RasterSettings,
};

/// Rasterizer with fixed metrics that paints solid cells
#[derive(Debug, Clone)]
pub struct SyntheticRasterizer {
    advance: f32,
    height: f32,
    ascent: f32,
    overrides: HashMap<char, (f32, f32)>,
}

impl Default for SyntheticRasterizer {
    fn default() -> Self {
        Self::uniform(10.0, 20.0)
    }
}

impl SyntheticRasterizer {
    /// Every glyph `advance` wide and `height` tall
    pub fn uniform(advance: f32, height: f32) -> Self {
        Self {
            advance,
            height,
            ascent: height * 0.8,
            overrides: HashMap::new(),
        }
    }

    /// Give one character its own metrics
    pub fn with_glyph(mut self, ch: char, advance: f32, height: f32) -> Self {
        self.overrides.insert(ch, (advance, height));
        self
    }

    fn metrics(&self, ch: char) -> (f32, f32) {
        self.overrides.get(&ch).copied().unwrap_or((self.advance, self.height))
    }
}

impl GlyphRasterizer for SyntheticRasterizer {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn glyph_bounds(&self, ch: char) -> FontResult<GlyphBounds> {
        let (advance, height) = self.metrics(ch);
        Ok(GlyphBounds { advance, height })
    }

    fn rasterize(
        &self,
        ch: char,
        target: &mut RgbaImage,
        pen_x: f32,
        baseline_y: f32,
    ) -> FontResult<()> {
        let (advance, height) = self.metrics(ch);
        let top = baseline_y - self.ascent;
        let (width, rows) = target.dimensions();
        for y in top as u32..((top + height) as u32).min(rows) {
            for x in pen_x as u32..((pen_x + advance) as u32).min(width) {
                target.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        Ok(())
    }
}

/// Provider handing out the default synthetic font for every name
#[derive(Debug, Default)]
pub struct SyntheticFontProvider;

impl FontProvider for SyntheticFontProvider {
    fn load(&self, _name: &str, _settings: RasterSettings) -> FontResult<Box<dyn GlyphRasterizer>> {
        Ok(Box::new(SyntheticRasterizer::default()))
    }
}

/// Renderer over a 1024px atlas of the default synthetic font
pub fn synthetic_renderer(supersample: f32) -> FontRenderer {
    renderer_with(&SyntheticRasterizer::default(), supersample)
}

/// Renderer over a 1024px atlas of a given synthetic font
pub fn renderer_with(rasterizer: &SyntheticRasterizer, supersample: f32) -> FontRenderer {
    let atlas = AtlasBuilder::new(1024).build(rasterizer).unwrap();
    FontRenderer::new(atlas).with_supersample(supersample)
}

/// Fallback that reports a fixed width and remembers what it drew
#[derive(Debug)]
pub struct RecordingFallback {
    width: f32,
    drawn: Mutex<Vec<(char, f32, f32, u32)>>,
}

impl RecordingFallback {
    pub fn new(width: f32) -> Self {
        Self { width, drawn: Mutex::new(Vec::new()) }
    }

    /// Every `(char, x, y, color)` drawn so far
    pub fn drawn(&self) -> Vec<(char, f32, f32, u32)> {
        self.drawn.lock().unwrap().clone()
    }
}

impl HostTextFallback for RecordingFallback {
    fn char_width(&self, _ch: char) -> f32 {
        self.width
    }

    fn draw_char(&self, _backend: &mut dyn RenderBackend, ch: char, x: f32, y: f32, color: u32) {
        self.drawn.lock().unwrap().push((ch, x, y, color));
    }
}

/// Entity with a name, a position and a height
#[derive(Debug, Clone)]
pub struct TestEntity {
    pub name: String,
    pub position: Vec3,
    pub height: f32,
    pub sneaking: bool,
}

impl TestEntity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: Vec3::zeros(),
            height: 1.8,
            sneaking: false,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn sneaking(mut self) -> Self {
        self.sneaking = true;
        self
    }
}

impl LabelSubject for TestEntity {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_sneaking(&self) -> bool {
        self.sneaking
    }
}

/// Recorder whose texture uploads always fail
#[derive(Debug, Default)]
pub struct FailingUploadBackend {
    pub recorder: CommandRecorder,
}

impl RenderBackend for FailingUploadBackend {
    fn begin_batch(&mut self, primitive: Primitive, format: VertexFormat) {
        self.recorder.begin_batch(primitive, format);
    }

    fn vertex_color(&mut self, position: Vec3, color: Vec4) {
        self.recorder.vertex_color(position, color);
    }

    fn vertex_tex(&mut self, position: Vec3, uv: Vec2) {
        self.recorder.vertex_tex(position, uv);
    }

    fn end_batch(&mut self) {
        self.recorder.end_batch();
    }

    fn upload_texture(&mut self, _image: &RgbaImage) -> BackendResult<TextureId> {
        Err(BackendError::TextureUpload("out of texture memory".to_string()))
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.recorder.bind_texture(texture);
    }

    fn set_texture_filter(&mut self, filter: TextureFilter) {
        self.recorder.set_texture_filter(filter);
    }

    fn set_blend(&mut self, enabled: bool) {
        self.recorder.set_blend(enabled);
    }

    fn set_blend_func(&mut self, func: BlendFunc) {
        self.recorder.set_blend_func(func);
    }

    fn push_matrix(&mut self) {
        self.recorder.push_matrix();
    }

    fn pop_matrix(&mut self) {
        self.recorder.pop_matrix();
    }

    fn translate(&mut self, offset: Vec3) {
        self.recorder.translate(offset);
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.recorder.rotate(degrees, axis);
    }

    fn scale(&mut self, factors: Vec3) {
        self.recorder.scale(factors);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32) {
        self.recorder.draw_line(from, to, width);
    }

    fn set_color(&mut self, color: Vec4) {
        self.recorder.set_color(color);
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.recorder.set_depth_write(enabled);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.recorder.set_depth_test(enabled);
    }

    fn set_lighting(&mut self, enabled: bool) {
        self.recorder.set_lighting(enabled);
    }

    fn set_texturing(&mut self, enabled: bool) {
        self.recorder.set_texturing(enabled);
    }
}
