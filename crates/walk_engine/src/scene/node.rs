//! Scene node variants
//!
//! The hierarchy is a closed set of three node kinds. Group and transform
//! nodes hold ordered child edges as plain [`NodeKey`]s; geometry leaves
//! hold a mesh handle and the bounding volumes derived from its vertices.

use crate::bounds::{BoundingBox, BoundingSphere};
use crate::foundation::math::{compose_trs, Mat4, Vec3};
use crate::render::MeshHandle;
use slotmap::new_key_type;

new_key_type! {
    /// Stable identity of a node within its [`Scene`](super::Scene).
    pub struct NodeKey;
}

/// A named node in the walkthrough scene.
#[derive(Debug, Clone)]
pub struct Node {
    /// Human-readable name, for diagnostics and pick results.
    pub name: String,
    /// The node's kind and kind-specific data.
    pub kind: NodeKind,
}

impl Node {
    /// Child edges, in traversal order. Empty for geometry leaves.
    pub fn children(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Group(group) => &group.children,
            NodeKind::Transform(transform) => &transform.children,
            NodeKind::Geometry(_) => &[],
        }
    }
}

/// The three node kinds of the hierarchy.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Ordered container of children; contributes no transform.
    Group(GroupData),
    /// Container that scopes a local affine transform over its subtree.
    Transform(TransformData),
    /// Leaf holding a mesh and its bounding volumes.
    Geometry(GeometryData),
}

/// Payload of a plain group node.
#[derive(Debug, Clone, Default)]
pub struct GroupData {
    /// Non-owning child edges; order fixes traversal and result order.
    pub children: Vec<NodeKey>,
}

/// Payload of a transform node.
#[derive(Debug, Clone)]
pub struct TransformData {
    /// Non-owning child edges.
    pub children: Vec<NodeKey>,
    /// Local translation.
    pub translation: Vec3,
    /// Euler angles in degrees, applied in X, Y, Z order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl TransformData {
    /// The composed local matrix, `Translate · Rx · Ry · Rz · Scale`.
    pub fn local_matrix(&self) -> Mat4 {
        compose_trs(self.translation, self.rotation, self.scale)
    }
}

/// Payload of a geometry leaf.
///
/// The local fields of both bounding volumes are fixed once at
/// construction; only their world-space caches mutate, refreshed by
/// whichever traversal visits the leaf.
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Opaque renderer-side mesh reference.
    pub mesh: MeshHandle,
    /// Picking volume.
    pub sphere: BoundingSphere,
    /// Collision volume.
    pub aabb: BoundingBox,
}
