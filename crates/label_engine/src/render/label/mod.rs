//! Labels in the world
//!
//! Billboard placement above entities and the name tags drawn inside it.

pub mod name_tag;
pub mod positioner;

pub use name_tag::{LabelLine, LabelSubject, NameTagRenderer, Subtitle};
pub use positioner::{
    billboard_transform, with_billboard, BillboardScope, CameraOrientation, LabelPositioner,
    LABEL_HEIGHT_OFFSET, LABEL_SCALE,
};
