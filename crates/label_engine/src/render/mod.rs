//! # Rendering System
//!
//! Everything between a label's text and the host renderer.
//!
//! ## Architecture
//!
//! - **Backend**: [`RenderBackend`], the fixed-function interface the host implements
//! - **Recorder**: [`CommandRecorder`], a backend that records draws instead of issuing them
//! - **Text**: font atlases, format codes and the text renderer
//! - **Label**: billboard placement and the name tag surface the host calls

pub mod backend;
pub mod label;
pub mod recorder;
pub mod text;

pub use backend::{
    argb_to_rgba, BackendError, BackendResult, BlendFactor, BlendFunc, Primitive, RenderBackend,
    TextureFilter, TextureId, VertexFormat,
};
pub use label::{
    with_billboard, BillboardScope, CameraOrientation, LabelLine, LabelPositioner, LabelSubject,
    NameTagRenderer, Subtitle,
};
pub use recorder::{CommandRecorder, RenderCommand, RenderState, StateFlags};
pub use text::{FontAtlas, FontError, FontRegistry, FontRenderer, HostTextFallback};

/// Result type for drawing operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors surfaced while drawing text or labels
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The backend rejected a request
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A font failed to load or build
    #[error("Font error: {0}")]
    Font(#[from] FontError),
}
