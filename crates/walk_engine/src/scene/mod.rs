//! Scene hierarchy, traversals, and the walking camera
//!
//! The scene is a hierarchy of group, transform, and geometry nodes over
//! which four passes run: color draw, depth-only draw, ray picking, and
//! swept collision. [`WalkController`] ties the collision pass to a
//! first-person camera, and [`assembly`] builds a scene from a declarative
//! description.

pub mod assembly;
pub mod controller;
mod graph;
mod node;

pub use assembly::{
    build_scene, AssemblyError, GeometryDescription, PlacementDescription, SceneDescription,
};
pub use controller::{ControllerConfig, MoveDirection, WalkController};
pub use graph::{Intersection, Scene, SceneError};
pub use node::{GeometryData, GroupData, Node, NodeKey, NodeKind, TransformData};
