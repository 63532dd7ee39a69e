//! Recording render backend
//!
//! [`CommandRecorder`] implements [`RenderBackend`] without a GPU. It keeps a
//! faithful model of the fixed-function state (matrix stack, toggles, color,
//! bound texture) and records every draw as a [`RenderCommand`]. Hosts can
//! replay the commands into a real renderer; tests assert against them.

use bitflags::bitflags;
use image::RgbaImage;

use super::backend::{
    BackendResult, BlendFunc, Primitive, RenderBackend, TextureFilter, TextureId, VertexFormat,
};
use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4};

bitflags! {
    /// Global toggles of the fixed-function pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// Fixed-function lighting
        const LIGHTING = 1 << 0;
        /// Depth testing
        const DEPTH_TEST = 1 << 1;
        /// Depth writes
        const DEPTH_WRITE = 1 << 2;
        /// Blending
        const BLEND = 1 << 3;
        /// 2D texturing
        const TEXTURE_2D = 1 << 4;
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        Self::LIGHTING | Self::DEPTH_TEST | Self::DEPTH_WRITE | Self::TEXTURE_2D
    }
}

/// Snapshot of everything a label render may touch
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Transform stack; the last entry is the current transform
    pub matrix_stack: Vec<Mat4>,
    /// Global toggles
    pub flags: StateFlags,
    /// Uniform draw color
    pub color: Vec4,
    /// Active blend function, if one was ever set
    pub blend_func: Option<BlendFunc>,
    /// Currently bound texture
    pub bound_texture: Option<TextureId>,
    /// Magnification filter of the bound texture
    pub texture_filter: TextureFilter,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            matrix_stack: vec![Mat4::identity()],
            flags: StateFlags::default(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            blend_func: None,
            bound_texture: None,
            texture_filter: TextureFilter::Nearest,
        }
    }
}

impl RenderState {
    /// Current transform
    pub fn transform(&self) -> Mat4 {
        self.matrix_stack.last().copied().unwrap_or_else(Mat4::identity)
    }

    /// Depth of the transform stack (1 when balanced)
    pub fn depth(&self) -> usize {
        self.matrix_stack.len()
    }

    fn apply(&mut self, matrix: &Mat4) {
        if let Some(top) = self.matrix_stack.last_mut() {
            *top *= matrix;
        }
    }
}

/// One recorded vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedVertex {
    /// Local position as submitted
    pub position: Vec3,
    /// Per-vertex color (`PositionColor` batches)
    pub color: Option<Vec4>,
    /// Texture coordinate (`PositionTex` batches)
    pub uv: Option<Vec2>,
}

/// A recorded draw
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// A vertex batch
    Batch {
        /// Primitive type
        primitive: Primitive,
        /// Vertex layout
        format: VertexFormat,
        /// Submitted vertices
        vertices: Vec<RecordedVertex>,
        /// Uniform color at submission time
        color: Vec4,
        /// Texture bound at submission time, if texturing was on
        texture: Option<TextureId>,
        /// Transform at submission time
        transform: Mat4,
        /// Toggles at submission time
        flags: StateFlags,
    },
    /// A line segment
    Line {
        /// Start point in local space
        from: Vec2,
        /// End point in local space
        to: Vec2,
        /// Line width in pixels
        width: f32,
        /// Uniform color at submission time
        color: Vec4,
        /// Transform at submission time
        transform: Mat4,
    },
}

/// Backend that records draws and tracks state instead of rendering
#[derive(Debug, Default)]
pub struct CommandRecorder {
    state: RenderState,
    commands: Vec<RenderCommand>,
    pending: Option<(Primitive, VertexFormat, Vec<RecordedVertex>)>,
    textures: Vec<(u32, u32)>,
    stack_underflows: usize,
}

impl CommandRecorder {
    /// Create a recorder with the default pipeline state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pipeline state
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// All recorded draws in submission order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Textured batches (glyph quads)
    pub fn textured_batches(&self) -> impl Iterator<Item = &RenderCommand> {
        self.commands.iter().filter(|command| {
            matches!(command, RenderCommand::Batch { format: VertexFormat::PositionTex, .. })
        })
    }

    /// Colored batches (backgrounds)
    pub fn colored_batches(&self) -> impl Iterator<Item = &RenderCommand> {
        self.commands.iter().filter(|command| {
            matches!(command, RenderCommand::Batch { format: VertexFormat::PositionColor, .. })
        })
    }

    /// Recorded line segments
    pub fn lines(&self) -> impl Iterator<Item = &RenderCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Line { .. }))
    }

    /// Dimensions of every uploaded texture, indexed by `TextureId`
    pub fn textures(&self) -> &[(u32, u32)] {
        &self.textures
    }

    /// Number of pops that found only the root transform
    pub fn stack_underflows(&self) -> usize {
        self.stack_underflows
    }

    /// Forget recorded commands, keep state and textures
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn set_flag(&mut self, flag: StateFlags, enabled: bool) {
        self.state.flags.set(flag, enabled);
    }

    fn push_vertex(&mut self, vertex: RecordedVertex) {
        match self.pending.as_mut() {
            Some((_, _, vertices)) => vertices.push(vertex),
            None => log::warn!("Vertex emitted outside of a batch, ignoring"),
        }
    }
}

impl RenderBackend for CommandRecorder {
    fn begin_batch(&mut self, primitive: Primitive, format: VertexFormat) {
        if self.pending.is_some() {
            log::warn!("Batch started while another batch was open, discarding the open batch");
        }
        self.pending = Some((primitive, format, Vec::new()));
    }

    fn vertex_color(&mut self, position: Vec3, color: Vec4) {
        self.push_vertex(RecordedVertex { position, color: Some(color), uv: None });
    }

    fn vertex_tex(&mut self, position: Vec3, uv: Vec2) {
        self.push_vertex(RecordedVertex { position, color: None, uv: Some(uv) });
    }

    fn end_batch(&mut self) {
        let Some((primitive, format, vertices)) = self.pending.take() else {
            log::warn!("end_batch without begin_batch");
            return;
        };
        let texture = if self.state.flags.contains(StateFlags::TEXTURE_2D) {
            self.state.bound_texture
        } else {
            None
        };
        self.commands.push(RenderCommand::Batch {
            primitive,
            format,
            vertices,
            color: self.state.color,
            texture,
            transform: self.state.transform(),
            flags: self.state.flags,
        });
    }

    fn upload_texture(&mut self, image: &RgbaImage) -> BackendResult<TextureId> {
        self.textures.push(image.dimensions());
        Ok(TextureId(self.textures.len() as u64 - 1))
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.state.bound_texture = Some(texture);
    }

    fn set_texture_filter(&mut self, filter: TextureFilter) {
        self.state.texture_filter = filter;
    }

    fn set_blend(&mut self, enabled: bool) {
        self.set_flag(StateFlags::BLEND, enabled);
    }

    fn set_blend_func(&mut self, func: BlendFunc) {
        self.state.blend_func = Some(func);
    }

    fn push_matrix(&mut self) {
        let top = self.state.transform();
        self.state.matrix_stack.push(top);
    }

    fn pop_matrix(&mut self) {
        if self.state.matrix_stack.len() > 1 {
            self.state.matrix_stack.pop();
        } else {
            self.stack_underflows += 1;
            log::warn!("Transform stack underflow");
        }
    }

    fn translate(&mut self, offset: Vec3) {
        self.state.apply(&Mat4::translation(offset.x, offset.y, offset.z));
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.state.apply(&Mat4::rotation_degrees(degrees, axis));
    }

    fn scale(&mut self, factors: Vec3) {
        self.state.apply(&Mat4::scaling(factors.x, factors.y, factors.z));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32) {
        self.commands.push(RenderCommand::Line {
            from,
            to,
            width,
            color: self.state.color,
            transform: self.state.transform(),
        });
    }

    fn set_color(&mut self, color: Vec4) {
        self.state.color = color;
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.set_flag(StateFlags::DEPTH_WRITE, enabled);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.set_flag(StateFlags::DEPTH_TEST, enabled);
    }

    fn set_lighting(&mut self, enabled: bool) {
        self.set_flag(StateFlags::LIGHTING, enabled);
    }

    fn set_texturing(&mut self, enabled: bool) {
        self.set_flag(StateFlags::TEXTURE_2D, enabled);
    }
}
