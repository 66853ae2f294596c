//! Axis-aligned bounding boxes: construction, world refit, broad-phase
//! pruning, and swept time-of-impact collision

use super::{extents, Collision, GeometryError};
use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-aligned box fitted around a local-space point cloud, with a cached
/// world-space refit.
///
/// The world cache is recomputed by transforming all eight local corners and
/// taking the component-wise extrema, so a rotated box stays a conservative
/// axis-aligned hull rather than an oriented box.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    center: Point3,
    min: Point3,
    max: Point3,
    world_center: Point3,
    world_min: Point3,
    world_max: Point3,
}

impl BoundingBox {
    /// Fit a box to a point cloud. At least one point is required.
    pub fn from_points(points: &[Point3]) -> Result<Self, GeometryError> {
        let (min, max) = extents(points)?;
        let center = Point3::from((min.coords + max.coords) * 0.5);
        Ok(Self {
            center,
            min,
            max,
            world_center: center,
            world_min: min,
            world_max: max,
        })
    }

    /// Box of explicit extents around a center, for the movable player
    /// proxy which has no mesh. Width spans x, height y, length z. The
    /// world cache starts out equal to the local placement.
    pub fn from_center_size(center: Point3, height: f32, width: f32, length: f32) -> Self {
        let half = Vec3::new(width * 0.5, height * 0.5, length * 0.5);
        let min = center - half;
        let max = center + half;
        Self {
            center,
            min,
            max,
            world_center: center,
            world_min: min,
            world_max: max,
        }
    }

    /// Local-space minimum corner.
    pub fn local_min(&self) -> Point3 {
        self.min
    }

    /// Local-space maximum corner.
    pub fn local_max(&self) -> Point3 {
        self.max
    }

    /// Cached world-space minimum corner.
    pub fn world_min(&self) -> Point3 {
        self.world_min
    }

    /// Cached world-space maximum corner.
    pub fn world_max(&self) -> Point3 {
        self.world_max
    }

    /// Cached world-space center.
    pub fn world_center(&self) -> Point3 {
        self.world_center
    }

    /// Refresh the world-space cache from an accumulated model matrix by
    /// refitting around the eight transformed corners.
    pub fn apply_world_transform(&mut self, world: &Mat4) {
        self.world_center = world.transform_point(&self.center);

        let corners = [
            self.min,
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            self.max,
            Point3::new(self.max.x, self.min.y, self.max.z),
        ];

        let first = world.transform_point(&corners[0]);
        let mut min = first;
        let mut max = first;
        for corner in &corners[1..] {
            let point = world.transform_point(corner);
            min = Point3::from(min.coords.inf(&point.coords));
            max = Point3::from(max.coords.sup(&point.coords));
        }

        self.world_min = min;
        self.world_max = max;
    }

    /// Shift the world cache directly by a displacement.
    ///
    /// Used for the player's own box after a resolved move; scene geometry
    /// always goes through [`apply_world_transform`](Self::apply_world_transform).
    pub fn translate_world(&mut self, velocity: Vec3) {
        self.world_center += velocity;
        self.world_min += velocity;
        self.world_max += velocity;
    }

    /// Broad-phase prune: grow this box's world extent along the direction
    /// of travel and test overlap against `other`.
    ///
    /// Passing is necessary but not sufficient for a swept contact, so
    /// every pair the swept test reports as colliding also passes here.
    pub fn broad_check(&self, other: &BoundingBox, velocity: Vec3) -> bool {
        for axis in 0..3 {
            let (lo, hi) = if velocity[axis] > 0.0 {
                (self.world_min[axis], self.world_max[axis] + velocity[axis])
            } else {
                (self.world_min[axis] + velocity[axis], self.world_max[axis])
            };
            if hi < other.world_min[axis] || lo > other.world_max[axis] {
                return false;
            }
        }
        true
    }

    /// Swept-AABB time of impact of this (moving) box against a stationary
    /// `other`, over one frame's displacement `velocity`.
    ///
    /// Per axis, the entry and exit distances come from the gap between the
    /// facing faces; a zero velocity component constrains nothing on that
    /// axis. The overall entry time is the latest per-axis entry, the exit
    /// time the earliest per-axis exit. The contact normal lies on the axis
    /// with the latest entry (ties fall to the earlier axis in x, y, z
    /// order) and points back against the direction of approach.
    ///
    /// Returns [`Collision::none`] when the interval is empty, the boxes
    /// already overlap on every axis, or the contact falls beyond this
    /// frame.
    pub fn swept_collision(&self, other: &BoundingBox, velocity: Vec3) -> Collision {
        let mut inv_entry = Vec3::zeros();
        let mut inv_exit = Vec3::zeros();
        for axis in 0..3 {
            if velocity[axis] > 0.0 {
                inv_entry[axis] = other.world_min[axis] - self.world_max[axis];
                inv_exit[axis] = other.world_max[axis] - self.world_min[axis];
            } else {
                inv_entry[axis] = other.world_max[axis] - self.world_min[axis];
                inv_exit[axis] = other.world_min[axis] - self.world_max[axis];
            }
        }

        let mut entry = Vec3::zeros();
        let mut exit = Vec3::zeros();
        for axis in 0..3 {
            if velocity[axis] == 0.0 {
                entry[axis] = f32::NEG_INFINITY;
                exit[axis] = f32::INFINITY;
            } else {
                entry[axis] = inv_entry[axis] / velocity[axis];
                exit[axis] = inv_exit[axis] / velocity[axis];
            }
        }

        let entry_time = entry.x.max(entry.y).max(entry.z);
        let exit_time = exit.x.min(exit.y).min(exit.z);

        let missed = entry_time > exit_time
            || (entry.x < 0.0 && entry.y < 0.0 && entry.z < 0.0)
            || entry.x > 1.0
            || entry.y > 1.0
            || entry.z > 1.0;
        if missed {
            return Collision::none();
        }

        let axis = if entry.x >= entry.y && entry.x >= entry.z {
            0
        } else if entry.y >= entry.z {
            1
        } else {
            2
        };
        let mut normal = Vec3::zeros();
        normal[axis] = if inv_entry[axis] < 0.0 { 1.0 } else { -1.0 };

        Collision { normal, entry_time }
    }
}
