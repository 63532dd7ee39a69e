//! Math utilities and types
//!
//! Provides the small set of math types the label pipeline needs: world
//! positions, transform matrices and the axis rotations used for billboards.

pub use nalgebra::{Vector2, Vector3, Vector4, Matrix4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around an arbitrary axis, angle in degrees
    ///
    /// A zero-length axis yields the identity.
    fn rotation_degrees(angle: f32, axis: Vec3) -> Mat4;

    /// Create a non-uniform scaling matrix
    fn scaling(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a translation matrix
    fn translation(x: f32, y: f32, z: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_degrees(angle: f32, axis: Vec3) -> Mat4 {
        match nalgebra::Unit::try_new(axis, f32::EPSILON) {
            Some(unit) => Mat4::from_axis_angle(&unit, utils::deg_to_rad(angle)),
            None => Mat4::identity(),
        }
    }

    fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }

    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_about_y_turns_x_into_negative_z() {
        let rotation = Mat4::rotation_degrees(90.0, Vec3::y());
        let rotated = rotation.transform_vector(&Vec3::x());
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(Mat4::rotation_degrees(45.0, Vec3::zeros()), Mat4::identity());
    }

    #[test]
    fn test_degree_round_trip() {
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(37.5)), 37.5, epsilon = 1e-5);
    }
}
