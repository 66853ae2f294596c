//! Math utilities and types
//!
//! Provides the fundamental math types for the scene hierarchy, plus the
//! fixed transform composition used by transform nodes.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

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

/// Compose a local affine matrix from translation, Euler rotation, and
/// per-axis scale.
///
/// The composition order is fixed: `Translate · RotateX · RotateY ·
/// RotateZ · Scale`. Rotation angles are given in degrees. Changing this
/// order changes where every placed object ends up, so it is part of the
/// scene format contract.
pub fn compose_trs(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    let rx = Mat4::from_axis_angle(&Vec3::x_axis(), utils::deg_to_rad(rotation_degrees.x));
    let ry = Mat4::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(rotation_degrees.y));
    let rz = Mat4::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(rotation_degrees.z));

    Mat4::new_translation(&translation) * rx * ry * rz * Mat4::new_nonuniform_scaling(&scale)
}

/// Extract the per-axis scale factors of an affine matrix.
///
/// Uses the magnitudes of the upper-left 3x3 columns, which is exact for any
/// translate/rotate/scale product and a reasonable approximation in the
/// presence of shear.
pub fn decompose_scale(matrix: &Mat4) -> Vec3 {
    let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
    let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
    let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
    Vec3::new(scale_x, scale_y, scale_z)
}
