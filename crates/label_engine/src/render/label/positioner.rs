//! Billboard placement
//!
//! A label is a flat 2D surface that always faces the camera. Entering a
//! [`BillboardScope`] moves the transform to a point above an entity, turns it
//! towards the camera, shrinks text units to world units and switches the
//! pipeline into translucent, unlit, depth-ignoring mode. Dropping the scope
//! puts everything back, however the scope is left.

use std::ops::{Deref, DerefMut};

use crate::config::LabelConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::backend::{BlendFunc, RenderBackend};

/// World units per text unit on a label
pub const LABEL_SCALE: f32 = 0.026_666_67;

/// Height above an entity's visual height a label sits at
pub const LABEL_HEIGHT_OFFSET: f32 = 0.5;

/// Camera orientation a billboard turns towards
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOrientation {
    /// Horizontal view angle in degrees
    pub yaw: f32,
    /// Vertical view angle in degrees
    pub pitch: f32,
    /// Third person view looking back at the player
    pub third_person_flipped: bool,
}

impl CameraOrientation {
    /// Orientation of a first person or regular third person camera
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch, third_person_flipped: false }
    }

    /// Same orientation seen from the flipped third person camera
    pub fn flipped(mut self) -> Self {
        self.third_person_flipped = true;
        self
    }

    fn effective_pitch(&self) -> f32 {
        if self.third_person_flipped {
            -self.pitch
        } else {
            self.pitch
        }
    }
}

/// Transform a billboard applies on top of the current transform
///
/// `lift` is the full height above `anchor`; `scale` the text-to-world factor.
/// With zero yaw and pitch the result is a translation followed by the
/// mirrored scale.
pub fn billboard_transform(anchor: Vec3, lift: f32, camera: CameraOrientation, scale: f32) -> Mat4 {
    let origin = anchor + Vec3::new(0.0, lift, 0.0);
    Mat4::translation(origin.x, origin.y, origin.z)
        * Mat4::rotation_degrees(-camera.yaw, Vec3::y())
        * Mat4::rotation_degrees(camera.effective_pitch(), Vec3::x())
        * Mat4::scaling(-scale, -scale, scale)
}

/// Places labels above entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPositioner {
    /// Extra height above the entity's visual height
    pub height_offset: f32,
    /// World units per text unit
    pub scale: f32,
}

impl LabelPositioner {
    /// Positioner from label configuration
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            height_offset: config.height_offset,
            scale: config.scale,
        }
    }

    /// Billboard transform for a label above an entity
    pub fn transform(&self, anchor: Vec3, entity_height: f32, camera: CameraOrientation) -> Mat4 {
        billboard_transform(anchor, entity_height + self.height_offset, camera, self.scale)
    }

    /// Enter a billboard scope above an entity
    pub fn enter<'a>(
        &self,
        backend: &'a mut dyn RenderBackend,
        anchor: Vec3,
        entity_height: f32,
        camera: CameraOrientation,
    ) -> BillboardScope<'a> {
        let origin = anchor + Vec3::new(0.0, entity_height + self.height_offset, 0.0);

        backend.push_matrix();
        backend.translate(origin);
        backend.rotate(-camera.yaw, Vec3::y());
        backend.rotate(camera.effective_pitch(), Vec3::x());
        backend.scale(Vec3::new(-self.scale, -self.scale, self.scale));

        backend.set_lighting(false);
        backend.set_depth_write(false);
        backend.set_depth_test(false);
        backend.set_blend(true);
        backend.set_blend_func(BlendFunc::ALPHA);

        BillboardScope { backend }
    }

    /// Run `body` inside a billboard scope
    ///
    /// State is restored before this returns, whether `body` succeeds, fails
    /// or panics.
    pub fn with_billboard<T, E, F>(
        &self,
        backend: &mut dyn RenderBackend,
        anchor: Vec3,
        entity_height: f32,
        camera: CameraOrientation,
        body: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut dyn RenderBackend) -> Result<T, E>,
    {
        let mut scope = self.enter(backend, anchor, entity_height, camera);
        body(&mut *scope)
    }
}

impl Default for LabelPositioner {
    fn default() -> Self {
        Self {
            height_offset: LABEL_HEIGHT_OFFSET,
            scale: LABEL_SCALE,
        }
    }
}

/// Run `body` inside a billboard scope with the default label placement
pub fn with_billboard<T, E, F>(
    backend: &mut dyn RenderBackend,
    anchor: Vec3,
    entity_height: f32,
    camera: CameraOrientation,
    body: F,
) -> Result<T, E>
where
    F: FnOnce(&mut dyn RenderBackend) -> Result<T, E>,
{
    LabelPositioner::default().with_billboard(backend, anchor, entity_height, camera, body)
}

/// Active billboard; restores render state when dropped
///
/// Dereferences to the borrowed backend so drawing goes through the scope.
pub struct BillboardScope<'a> {
    backend: &'a mut dyn RenderBackend,
}

impl<'a> Deref for BillboardScope<'a> {
    type Target = dyn RenderBackend + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.backend
    }
}

impl<'a> DerefMut for BillboardScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
    }
}

impl Drop for BillboardScope<'_> {
    fn drop(&mut self) {
        let backend = &mut *self.backend;
        backend.set_lighting(true);
        backend.set_blend(false);
        backend.set_color(Vec4::new(1.0, 1.0, 1.0, 1.0));
        backend.set_depth_test(true);
        backend.set_depth_write(true);
        backend.pop_matrix();
    }
}
