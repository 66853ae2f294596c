//! Scene storage and the four traversal passes
//!
//! All traversals thread the accumulated world matrix through the recursion
//! as an explicit parameter, so sibling subtrees can never observe each
//! other's transforms and a finished traversal leaves no state behind.

use crate::bounds::{BoundingBox, Collision, GeometryError, Ray};
use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::render::{DrawBackend, MeshHandle};
use slotmap::SlotMap;
use thiserror::Error;

use super::node::{GeometryData, GroupData, Node, NodeKey, NodeKind, TransformData};

/// Errors from scene construction.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A child key does not belong to this scene.
    #[error("unknown node key")]
    UnknownNode,

    /// The named node is a geometry leaf and cannot hold children.
    #[error("node `{0}` cannot hold children")]
    NotAContainer(String),

    /// A node was offered as its own child.
    #[error("node `{0}` cannot be its own child")]
    SelfChild(String),

    /// Bounding-volume construction failed for a new geometry node.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A ray hit produced by [`Scene::query_intersections`].
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Intersection point in world space.
    pub point: Point3,
    /// Parametric distance along the ray (units of the direction length).
    pub distance: f32,
    /// The geometry node whose bounding sphere was hit.
    pub node: NodeKey,
    /// Group/transform chain from the root down to the hit leaf, in
    /// traversal order. A snapshot: later traversal does not alter it.
    pub path: Vec<NodeKey>,
}

/// The walkthrough scene: one owning node table plus a root group.
///
/// Parent-to-child edges are plain [`NodeKey`]s, so a subtree may appear
/// under several parents; the room layout reuses wall, floor, and window
/// geometry this way. Every query tests a geometry leaf immediately after
/// refreshing its world-space bounds, which keeps results correct for each
/// visiting parent; after a traversal the *cached* world bounds of a shared
/// leaf belong to whichever parent visited it last. Cycles are not
/// supported: a cyclic edge set makes traversal non-terminating.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

impl Scene {
    /// Create a scene containing only the root group.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            name: "root".to_string(),
            kind: NodeKind::Group(GroupData::default()),
        });
        Self { nodes, root }
    }

    /// The root group all traversals start from.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Look up a node by key.
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable node lookup, for adjusting transforms between frames.
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Number of nodes in the scene, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add an unparented group node.
    pub fn add_group(&mut self, name: &str) -> NodeKey {
        self.nodes.insert(Node {
            name: name.to_string(),
            kind: NodeKind::Group(GroupData::default()),
        })
    }

    /// Add an unparented transform node.
    pub fn add_transform(
        &mut self,
        name: &str,
        translation: Vec3,
        rotation_degrees: Vec3,
        scale: Vec3,
    ) -> NodeKey {
        self.nodes.insert(Node {
            name: name.to_string(),
            kind: NodeKind::Transform(TransformData {
                children: Vec::new(),
                translation,
                rotation: rotation_degrees,
                scale,
            }),
        })
    }

    /// Add an unparented geometry leaf, fitting both bounding volumes to
    /// the mesh's local-space vertex positions.
    pub fn add_geometry(
        &mut self,
        name: &str,
        mesh: MeshHandle,
        points: &[Point3],
    ) -> Result<NodeKey, SceneError> {
        let sphere = crate::bounds::BoundingSphere::from_points(points)?;
        let aabb = BoundingBox::from_points(points)?;
        log::debug!("geometry `{name}`: {} vertices fitted", points.len());
        Ok(self.nodes.insert(Node {
            name: name.to_string(),
            kind: NodeKind::Geometry(GeometryData { mesh, sphere, aabb }),
        }))
    }

    /// Attach `child` under `parent`. The same child may be attached under
    /// several parents to share a subtree.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if !self.nodes.contains_key(child) {
            return Err(SceneError::UnknownNode);
        }
        let node = self.nodes.get_mut(parent).ok_or(SceneError::UnknownNode)?;
        if parent == child {
            return Err(SceneError::SelfChild(node.name.clone()));
        }
        match &mut node.kind {
            NodeKind::Group(group) => group.children.push(child),
            NodeKind::Transform(transform) => transform.children.push(child),
            NodeKind::Geometry(_) => return Err(SceneError::NotAContainer(node.name.clone())),
        }
        Ok(())
    }

    /// Color draw pass.
    ///
    /// Geometry leaves refresh both world-space bounding volumes and emit a
    /// draw with their accumulated world matrix, exactly as the per-frame
    /// loop expects: collision and picking later in the frame reuse the
    /// same traversal shape.
    pub fn draw(&mut self, backend: &mut dyn DrawBackend) {
        self.draw_node(self.root, &Mat4::identity(), backend);
    }

    fn draw_node(&mut self, key: NodeKey, world: &Mat4, backend: &mut dyn DrawBackend) {
        let node = match self.nodes.get_mut(key) {
            Some(node) => node,
            None => return,
        };
        let (children, world) = match &mut node.kind {
            NodeKind::Group(group) => (group.children.clone(), *world),
            NodeKind::Transform(transform) => {
                (transform.children.clone(), world * transform.local_matrix())
            }
            NodeKind::Geometry(geometry) => {
                geometry.sphere.apply_world_transform(world);
                geometry.aabb.apply_world_transform(world);
                backend.draw_mesh(world, geometry.mesh);
                return;
            }
        };
        for child in children {
            self.draw_node(child, &world, backend);
        }
    }

    /// Depth-only draw pass for shadow rendering.
    ///
    /// Identical traversal to [`draw`](Self::draw) but leaves the bounding
    /// volumes untouched; the depth pass runs more than once per frame and
    /// must not churn the caches.
    pub fn draw_depth(&mut self, backend: &mut dyn DrawBackend) {
        self.draw_depth_node(self.root, &Mat4::identity(), backend);
    }

    fn draw_depth_node(&mut self, key: NodeKey, world: &Mat4, backend: &mut dyn DrawBackend) {
        let node = match self.nodes.get(key) {
            Some(node) => node,
            None => return,
        };
        let (children, world) = match &node.kind {
            NodeKind::Group(group) => (group.children.clone(), *world),
            NodeKind::Transform(transform) => {
                (transform.children.clone(), world * transform.local_matrix())
            }
            NodeKind::Geometry(geometry) => {
                backend.draw_mesh_depth(world, geometry.mesh);
                return;
            }
        };
        for child in children {
            self.draw_depth_node(child, &world, backend);
        }
    }

    /// Ray-pick query over the whole scene.
    ///
    /// Every geometry leaf transforms its bounding sphere to world space
    /// and tests the ray; hits carry the ancestor path so the caller can
    /// recover which transform governs the picked object. Results appear
    /// in traversal order, not sorted by distance.
    pub fn query_intersections(&mut self, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();
        let mut path = Vec::new();
        self.intersect_node(self.root, &Mat4::identity(), ray, &mut path, &mut hits);
        debug_assert!(path.is_empty());
        hits
    }

    fn intersect_node(
        &mut self,
        key: NodeKey,
        world: &Mat4,
        ray: &Ray,
        path: &mut Vec<NodeKey>,
        hits: &mut Vec<Intersection>,
    ) {
        let node = match self.nodes.get_mut(key) {
            Some(node) => node,
            None => return,
        };
        let (children, world) = match &mut node.kind {
            NodeKind::Group(group) => (group.children.clone(), *world),
            NodeKind::Transform(transform) => {
                (transform.children.clone(), world * transform.local_matrix())
            }
            NodeKind::Geometry(geometry) => {
                geometry.sphere.apply_world_transform(world);
                if let Some(hit) = geometry.sphere.intersect_ray(ray) {
                    hits.push(Intersection {
                        point: hit.point,
                        distance: hit.distance,
                        node: key,
                        path: path.clone(),
                    });
                }
                return;
            }
        };
        path.push(key);
        for child in children {
            self.intersect_node(child, &world, ray, path, hits);
        }
        path.pop();
    }

    /// Swept-collision query of a moving box against the whole scene.
    ///
    /// Every geometry leaf transforms its bounding box to world space and
    /// runs the broad-phase prune; candidates that pass contribute one
    /// [`Collision`] each, *including* "no collision" outcomes with
    /// `entry_time == 1.0`, which resolve to a zero correction downstream.
    pub fn query_collisions(&mut self, player: &BoundingBox, velocity: Vec3) -> Vec<Collision> {
        let mut collisions = Vec::new();
        self.collide_node(self.root, &Mat4::identity(), player, velocity, &mut collisions);
        collisions
    }

    fn collide_node(
        &mut self,
        key: NodeKey,
        world: &Mat4,
        player: &BoundingBox,
        velocity: Vec3,
        collisions: &mut Vec<Collision>,
    ) {
        let node = match self.nodes.get_mut(key) {
            Some(node) => node,
            None => return,
        };
        let (children, world) = match &mut node.kind {
            NodeKind::Group(group) => (group.children.clone(), *world),
            NodeKind::Transform(transform) => {
                (transform.children.clone(), world * transform.local_matrix())
            }
            NodeKind::Geometry(geometry) => {
                geometry.aabb.apply_world_transform(world);
                if player.broad_check(&geometry.aabb, velocity) {
                    collisions.push(player.swept_collision(&geometry.aabb, velocity));
                }
                return;
            }
        };
        for child in children {
            self.collide_node(child, &world, player, velocity, collisions);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    fn unit_cube() -> Vec<Point3> {
        let mut points = Vec::new();
        for &x in &[-0.5, 0.5] {
            for &y in &[-0.5, 0.5] {
                for &z in &[-0.5, 0.5] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        points
    }

    fn scene_with_cube_at(translation: Vec3) -> (Scene, NodeKey, NodeKey) {
        let mut scene = Scene::new();
        let cube = scene
            .add_geometry("cube", MeshHandle(0), &unit_cube())
            .unwrap();
        let placed = scene.add_transform(
            "placement",
            translation,
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
        );
        scene.add_child(placed, cube).unwrap();
        scene.add_child(scene.root(), placed).unwrap();
        (scene, placed, cube)
    }

    #[test]
    fn test_add_child_rejects_geometry_parent() {
        let mut scene = Scene::new();
        let cube = scene
            .add_geometry("cube", MeshHandle(0), &unit_cube())
            .unwrap();
        let group = scene.add_group("group");
        assert!(matches!(
            scene.add_child(cube, group),
            Err(SceneError::NotAContainer(_))
        ));
    }

    #[test]
    fn test_add_child_rejects_self_reference() {
        let mut scene = Scene::new();
        let group = scene.add_group("group");
        assert!(matches!(
            scene.add_child(group, group),
            Err(SceneError::SelfChild(_))
        ));
    }

    #[test]
    fn test_draw_emits_accumulated_world_matrix() {
        let (mut scene, _, _) = scene_with_cube_at(Vec3::new(0.0, 0.0, -3.0));
        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        assert_eq!(backend.draws.len(), 1);
        let expected = Mat4::new_translation(&Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(backend.draws[0].0, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_nested_transforms_compose_in_order() {
        let mut scene = Scene::new();
        let cube = scene
            .add_geometry("cube", MeshHandle(0), &unit_cube())
            .unwrap();
        let outer = scene.add_transform(
            "outer",
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 90.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let inner = scene.add_transform(
            "inner",
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
        );
        scene.add_child(inner, cube).unwrap();
        scene.add_child(outer, inner).unwrap();
        scene.add_child(scene.root(), outer).unwrap();

        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        // The inner offset (0,0,-2) rotates onto -x before the outer
        // translation applies, landing the cube center at (-1, 0, 0).
        let origin = backend.draws[0].0.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sibling_transforms_stay_isolated() {
        let mut scene = Scene::new();
        let cube = scene
            .add_geometry("cube", MeshHandle(0), &unit_cube())
            .unwrap();
        let left = scene.add_transform(
            "left",
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let plain = scene.add_group("plain");
        scene.add_child(left, cube).unwrap();
        scene.add_child(plain, cube).unwrap();
        scene.add_child(scene.root(), left).unwrap();
        scene.add_child(scene.root(), plain).unwrap();

        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        assert_eq!(backend.draws.len(), 2);
        // The second visit, under the plain group, sees the identity world
        // matrix: the left sibling's transform did not leak.
        assert_relative_eq!(backend.draws[1].0, Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_shared_geometry_draws_once_per_parent() {
        let mut scene = Scene::new();
        let wall = scene
            .add_geometry("wall", MeshHandle(7), &unit_cube())
            .unwrap();
        let mut placements = Vec::new();
        for (index, x) in [-4.0f32, 4.0].iter().enumerate() {
            let transform = scene.add_transform(
                &format!("wall{index}"),
                Vec3::new(*x, 0.0, 0.0),
                Vec3::zeros(),
                Vec3::new(1.0, 1.0, 1.0),
            );
            scene.add_child(transform, wall).unwrap();
            scene.add_child(scene.root(), transform).unwrap();
            placements.push(transform);
        }

        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        assert_eq!(backend.draws.len(), 2);
        let first = backend.draws[0].0.transform_point(&Point3::origin());
        let second = backend.draws[1].0.transform_point(&Point3::origin());
        assert_relative_eq!(first, Point3::new(-4.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(second, Point3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_depth_pass_leaves_bounds_untouched() {
        let (mut scene, placed, cube) = scene_with_cube_at(Vec3::new(0.0, 0.0, -3.0));
        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);

        // Move the placement, then run only the depth pass; the cached
        // world bounds must still reflect the old draw.
        if let NodeKind::Transform(transform) = &mut scene.node_mut(placed).unwrap().kind {
            transform.translation = Vec3::new(10.0, 0.0, 0.0);
        }
        scene.draw_depth(&mut backend);
        assert_eq!(backend.depth_draws.len(), 1);

        if let NodeKind::Geometry(geometry) = &scene.node(cube).unwrap().kind {
            assert_relative_eq!(
                geometry.aabb.world_center(),
                Point3::new(0.0, 0.0, -3.0),
                epsilon = 1e-5
            );
        } else {
            panic!("cube is not a geometry node");
        }
    }

    #[test]
    fn test_query_intersections_path_snapshot() {
        let (mut scene, placed, cube) = scene_with_cube_at(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let hits = scene.query_intersections(&ray);
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.node, cube);
        assert_eq!(hit.path, vec![scene.root(), placed]);
        // Sphere radius of a unit cube is half its diagonal.
        let radius = (3.0f32).sqrt() * 0.5;
        assert_relative_eq!(hit.distance, 5.0 - radius, epsilon = 1e-5);
    }

    #[test]
    fn test_query_intersections_misses_off_axis() {
        let (mut scene, _, _) = scene_with_cube_at(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(scene.query_intersections(&ray).is_empty());
    }

    #[test]
    fn test_query_collisions_through_transform() {
        let (mut scene, _, _) = scene_with_cube_at(Vec3::new(0.0, 0.0, -2.0));
        let player = BoundingBox::from_center_size(Point3::origin(), 1.0, 0.5, 1.0);
        let velocity = Vec3::new(0.0, 0.0, -1.5);
        let collisions = scene.query_collisions(&player, velocity);
        assert_eq!(collisions.len(), 1);
        let collision = &collisions[0];
        assert!(collision.is_hit());
        // Player front face at z=-0.5, wall front face at z=-1.5: contact
        // after covering 1.0 of the 1.5 displacement.
        assert_relative_eq!(collision.entry_time, 1.0 / 1.5, epsilon = 1e-5);
        assert_eq!(collision.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_query_collisions_prunes_distant_geometry() {
        let (mut scene, _, _) = scene_with_cube_at(Vec3::new(0.0, 0.0, -50.0));
        let player = BoundingBox::from_center_size(Point3::origin(), 1.0, 0.5, 1.0);
        let collisions = scene.query_collisions(&player, Vec3::new(0.0, 0.0, -1.5));
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_shared_geometry_collides_per_parent() {
        let mut scene = Scene::new();
        let wall = scene
            .add_geometry("wall", MeshHandle(0), &unit_cube())
            .unwrap();
        for (name, z) in [("ahead", -2.0f32), ("behind", 50.0)] {
            let transform = scene.add_transform(
                name,
                Vec3::new(0.0, 0.0, z),
                Vec3::zeros(),
                Vec3::new(1.0, 1.0, 1.0),
            );
            scene.add_child(transform, wall).unwrap();
            scene.add_child(scene.root(), transform).unwrap();
        }
        let player = BoundingBox::from_center_size(Point3::origin(), 1.0, 0.5, 1.0);
        let collisions = scene.query_collisions(&player, Vec3::new(0.0, 0.0, -1.5));
        // Only the placement ahead of the player survives the broad phase,
        // even though both placements share one geometry node.
        assert_eq!(collisions.len(), 1);
        assert!(collisions[0].is_hit());
    }
}
