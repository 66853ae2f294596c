//! Bounding sphere construction, world transform, and ray intersection

use super::{extents, GeometryError, Ray};
use crate::foundation::math::{decompose_scale, Mat4, Point3};

/// Result of a ray test against a bounding sphere.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Intersection point in world space (the nearer of the two roots).
    pub point: Point3,
    /// Parametric distance from the ray origin, in units of the ray
    /// direction's length. Not clamped against any ray extent; the caller
    /// decides whether a far hit is still interesting.
    pub distance: f32,
}

/// Sphere fitted around a local-space point cloud.
///
/// The center is the midpoint of the cloud's axis-aligned extent, and the
/// radius the largest distance from that center to any point. This is not
/// the minimal enclosing sphere, but it is cheap, deterministic, and always
/// conservative.
#[derive(Debug, Clone)]
pub struct BoundingSphere {
    center: Point3,
    radius: f32,
    world_center: Point3,
    world_radius: f32,
}

impl BoundingSphere {
    /// Fit a sphere to a point cloud. At least one point is required.
    pub fn from_points(points: &[Point3]) -> Result<Self, GeometryError> {
        let (min, max) = extents(points)?;
        let center = Point3::from((min.coords + max.coords) * 0.5);
        let radius = points
            .iter()
            .map(|point| (point - center).magnitude())
            .fold(0.0, f32::max);
        Ok(Self {
            center,
            radius,
            world_center: center,
            world_radius: radius,
        })
    }

    /// Local-space center.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Local-space radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Cached world-space center, valid after the latest
    /// [`apply_world_transform`](Self::apply_world_transform).
    pub fn world_center(&self) -> Point3 {
        self.world_center
    }

    /// Cached world-space radius.
    pub fn world_radius(&self) -> f32 {
        self.world_radius
    }

    /// Refresh the world-space cache from an accumulated model matrix.
    ///
    /// Under non-uniform scale the radius picks up the largest of the three
    /// scale factors, keeping the sphere conservative. Local fields are
    /// never touched.
    pub fn apply_world_transform(&mut self, world: &Mat4) {
        self.world_center = world.transform_point(&self.center);
        let scale = decompose_scale(world);
        self.world_radius = self.radius * scale.x.max(scale.y).max(scale.z);
    }

    /// Test a ray against the world-space sphere.
    ///
    /// A ray whose origin lies inside or on the sphere reports no hit: this
    /// volume only detects entry from outside. Otherwise the standard
    /// projection test runs and the nearer root is reported.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let to_center = self.world_center - ray.origin;
        let radius_sq = self.world_radius * self.world_radius;
        let to_center_len_sq = to_center.magnitude_squared();
        if to_center_len_sq <= radius_sq {
            return None;
        }

        // Distance along the ray to the foot of the perpendicular from the
        // sphere center.
        let direction_len = ray.direction.magnitude();
        let dist_to_foot = to_center.dot(&ray.direction) / direction_len;
        if dist_to_foot < 0.0 {
            return None;
        }

        // Squared half-chord between the foot and the surface.
        let half_chord_sq = radius_sq - (to_center_len_sq - dist_to_foot * dist_to_foot);
        if half_chord_sq < 0.0 {
            return None;
        }

        let t = (dist_to_foot - half_chord_sq.sqrt()) / direction_len;
        Some(RayHit {
            point: ray.point_at(t),
            distance: t,
        })
    }
}
