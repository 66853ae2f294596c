//! Ray type for picking queries

use super::GeometryError;
use crate::foundation::math::{Point3, Vec3};

/// A ray for picking queries.
///
/// The direction is stored as given, without normalization; the parametric
/// distances reported by intersection tests are therefore in units of the
/// direction's length. Construction rejects zero-length directions so the
/// tests never divide by zero.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point in world space.
    pub origin: Point3,
    /// Direction of travel; non-zero but not necessarily unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, failing fast on a degenerate direction.
    pub fn new(origin: Point3, direction: Vec3) -> Result<Self, GeometryError> {
        if direction.magnitude_squared() <= f32::EPSILON * f32::EPSILON {
            return Err(GeometryError::DegenerateRay);
        }
        Ok(Self { origin, direction })
    }

    /// The point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}
