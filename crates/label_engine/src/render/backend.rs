//! Render Backend Trait
//!
//! Defines the interface between the label pipeline and the host renderer.
//! Keeps atlas, text and billboard code independent of OpenGL/Vulkan specifics:
//! everything the pipeline needs from the GPU goes through [`RenderBackend`].

use image::RgbaImage;

use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors a backend may report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Failed to create or upload a texture
    #[error("Texture upload failed: {0}")]
    TextureUpload(String),
}

/// Handle to a texture owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Primitive assembled from a vertex batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles, three vertices each
    Triangles,
    /// Independent quads, four vertices each
    Quads,
}

/// Vertex layout of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Position plus per-vertex color
    PositionColor,
    /// Position plus texture coordinate, tinted by the uniform draw color
    PositionTex,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest-texel sampling
    Nearest,
    /// Bilinear sampling
    Linear,
}

/// Blend factor for one side of the blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
}

/// Separate color/alpha blend function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendFunc {
    /// Source factor for RGB
    pub src_color: BlendFactor,
    /// Destination factor for RGB
    pub dst_color: BlendFactor,
    /// Source factor for alpha
    pub src_alpha: BlendFactor,
    /// Destination factor for alpha
    pub dst_alpha: BlendFactor,
}

impl BlendFunc {
    /// Conventional translucent blending that leaves destination alpha alone
    pub const ALPHA: Self = Self {
        src_color: BlendFactor::SrcAlpha,
        dst_color: BlendFactor::OneMinusSrcAlpha,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::Zero,
    };
}

/// Backend-agnostic immediate-mode rendering interface
///
/// Mirrors a fixed-function pipeline: a transform stack, a uniform draw color,
/// global toggles and vertex batches. Implementations are driven from a single
/// render thread; no method is expected to block.
pub trait RenderBackend {
    /// Start a vertex batch
    fn begin_batch(&mut self, primitive: Primitive, format: VertexFormat);

    /// Emit a vertex with its own color (for `PositionColor` batches)
    fn vertex_color(&mut self, position: Vec3, color: Vec4);

    /// Emit a textured vertex (for `PositionTex` batches)
    fn vertex_tex(&mut self, position: Vec3, uv: Vec2);

    /// Submit the current batch
    fn end_batch(&mut self);

    /// Upload an RGBA image and return its handle
    fn upload_texture(&mut self, image: &RgbaImage) -> BackendResult<TextureId>;

    /// Bind a previously uploaded texture
    fn bind_texture(&mut self, texture: TextureId);

    /// Set the magnification filter of the bound texture
    fn set_texture_filter(&mut self, filter: TextureFilter);

    /// Enable or disable blending
    fn set_blend(&mut self, enabled: bool);

    /// Set the blend function
    fn set_blend_func(&mut self, func: BlendFunc);

    /// Push a copy of the current transform
    fn push_matrix(&mut self);

    /// Restore the transform saved by the matching push
    fn pop_matrix(&mut self);

    /// Post-multiply a translation
    fn translate(&mut self, offset: Vec3);

    /// Post-multiply a rotation of `degrees` around `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3);

    /// Post-multiply a non-uniform scale
    fn scale(&mut self, factors: Vec3);

    /// Draw a line segment in the current transform, untextured
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32);

    /// Set the uniform draw color (RGBA, 0.0 - 1.0)
    fn set_color(&mut self, color: Vec4);

    /// Enable or disable depth writes
    fn set_depth_write(&mut self, enabled: bool);

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Enable or disable fixed-function lighting
    fn set_lighting(&mut self, enabled: bool);

    /// Enable or disable 2D texturing
    fn set_texturing(&mut self, enabled: bool);
}

/// Split a packed `0xAARRGGBB` color into normalized RGBA
pub fn argb_to_rgba(argb: u32) -> Vec4 {
    Vec4::new(
        channel(argb >> 16),
        channel(argb >> 8),
        channel(argb),
        channel(argb >> 24),
    )
}

fn channel(bits: u32) -> f32 {
    (bits & 0xFF) as f32 / 255.0
}
