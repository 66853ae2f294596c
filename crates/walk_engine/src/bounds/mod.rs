//! Bounding volumes and geometric query primitives
//!
//! Geometry nodes carry a [`BoundingSphere`] (ray picking) and a
//! [`BoundingBox`] (swept collision). Both fit a local-space point cloud
//! once at construction and afterwards only refresh a cached world-space
//! copy from the accumulated model matrix of the traversal that visits them.

mod aabb;
mod ray;
mod sphere;

pub use aabb::BoundingBox;
pub use ray::Ray;
pub use sphere::{BoundingSphere, RayHit};

use crate::foundation::math::{Point3, Vec3};
use thiserror::Error;

/// Errors raised by bounding-volume construction and queries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A bounding volume was requested for a mesh with no vertices.
    #[error("cannot fit a bounding volume to an empty point cloud")]
    EmptyPointCloud,

    /// A ray was built with a zero-length direction.
    #[error("ray direction has zero length")]
    DegenerateRay,
}

/// Outcome of one swept-box test against one obstacle.
///
/// A query returns one of these per broad-phase candidate, including
/// candidates that turn out not to collide; callers filter with
/// [`Collision::is_hit`] or simply process the whole list, since a
/// no-collision entry contributes nothing to the resolved velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Axis-aligned unit contact normal, or zero when nothing was hit.
    pub normal: Vec3,
    /// Entry time within the frame's displacement, in `[0, 1]`. The value
    /// `1.0` encodes "no collision this frame"; `0.0` is a legitimate
    /// immediate contact, not an error.
    pub entry_time: f32,
}

impl Collision {
    /// The "no contact this frame" value.
    pub fn none() -> Self {
        Self {
            normal: Vec3::zeros(),
            entry_time: 1.0,
        }
    }

    /// Whether this entry represents an actual contact within the frame.
    pub fn is_hit(&self) -> bool {
        self.entry_time < 1.0
    }
}

/// Per-axis extrema of a point cloud; the shared first step of both
/// bounding-volume constructors.
pub(crate) fn extents(points: &[Point3]) -> Result<(Point3, Point3), GeometryError> {
    let first = points.first().ok_or(GeometryError::EmptyPointCloud)?;
    let mut min = *first;
    let mut max = *first;
    for point in &points[1..] {
        min = Point3::from(min.coords.inf(&point.coords));
        max = Point3::from(max.coords.sup(&point.coords));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents_match_per_axis_extrema() {
        let points = [
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-3.0, 4.0, 0.0),
            Point3::new(2.0, 0.0, -1.5),
        ];
        let (min, max) = extents(&points).unwrap();
        assert_eq!(min, Point3::new(-3.0, -2.0, -1.5));
        assert_eq!(max, Point3::new(2.0, 4.0, 0.5));
    }

    #[test]
    fn test_extents_empty_cloud_fails() {
        assert_eq!(extents(&[]).unwrap_err(), GeometryError::EmptyPointCloud);
    }
}
