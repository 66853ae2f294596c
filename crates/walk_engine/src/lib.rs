//! # Walk Engine
//!
//! Scene-graph traversal and collision core for an interactive 3D room
//! walkthrough.
//!
//! ## Features
//!
//! - **Scene hierarchy**: group, transform, and geometry nodes stored in one
//!   owning table with shared (non-owning) child edges
//! - **Four traversal passes**: color draw, depth-only draw, ray picking,
//!   and swept-collision queries, all threading the accumulated world
//!   matrix explicitly through the recursion
//! - **Bounding volumes**: point-cloud spheres and boxes with cached
//!   world-space state, ray-sphere picking, and swept-AABB time of impact
//! - **Walk controller**: first-person camera movement resolved against the
//!   scene with per-obstacle velocity projection
//!
//! ## Quick Start
//!
//! ```rust
//! use walk_engine::prelude::*;
//!
//! # fn main() -> Result<(), walk_engine::scene::SceneError> {
//! let mut scene = Scene::new();
//! let cube = [
//!     Point3::new(-0.5, -0.5, -0.5),
//!     Point3::new(0.5, 0.5, 0.5),
//! ];
//! let wall = scene.add_geometry("wall", MeshHandle(0), &cube)?;
//! let placed = scene.add_transform(
//!     "wall placement",
//!     Vec3::new(0.0, 0.0, -3.0),
//!     Vec3::zeros(),
//!     Vec3::new(1.0, 1.0, 1.0),
//! );
//! scene.add_child(placed, wall)?;
//! scene.add_child(scene.root(), placed)?;
//!
//! let mut backend = RecordingBackend::default();
//! scene.draw(&mut backend);
//! assert_eq!(backend.draws.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod bounds;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::ObjPoints,
        bounds::{BoundingBox, BoundingSphere, Collision, GeometryError, Ray},
        config::Config,
        foundation::math::{Mat4, Point3, Vec3},
        render::{DrawBackend, MeshHandle, RecordingBackend},
        scene::{
            ControllerConfig, Intersection, MoveDirection, Scene, SceneDescription,
            WalkController,
        },
    };
}
