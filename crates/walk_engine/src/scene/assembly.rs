//! Declarative scene construction
//!
//! A [`SceneDescription`] lists geometries by name and placements that
//! reference them; [`build_scene`] turns the description into a live
//! [`Scene`], creating each geometry node once and hanging it under every
//! placement that names it. Descriptions serialize through the
//! [`Config`](crate::config::Config) trait, so a room layout can live in a
//! RON or TOML file next to the binary.

use crate::foundation::math::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::{NodeKey, Scene, SceneError};
use crate::config::Config;
use crate::render::MeshHandle;

/// One named geometry of the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDescription {
    /// Name placements refer to this geometry by.
    pub name: String,
    /// Identifier handed to the point provider, typically a mesh file path.
    pub source: String,
}

/// One placement of a named geometry in the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementDescription {
    /// Name of the transform node created for this placement.
    pub name: String,
    /// Local translation.
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler angles in degrees, applied in X, Y, Z order.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Per-axis scale.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Name of the geometry to place.
    pub geometry: String,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// A complete declarative room layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Geometries, created once each.
    pub geometries: Vec<GeometryDescription>,
    /// Placements, hung under the scene root in order.
    pub placements: Vec<PlacementDescription>,
}

impl Config for SceneDescription {}

/// Errors from building a scene out of a description.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A placement names a geometry the description never declares.
    #[error("placement `{placement}` references unknown geometry `{geometry}`")]
    UnknownGeometry {
        /// The offending placement.
        placement: String,
        /// The missing geometry name.
        geometry: String,
    },

    /// The point provider failed for a geometry source.
    #[error("loading points for `{name}` failed: {message}")]
    PointSource {
        /// The geometry whose source failed.
        name: String,
        /// Provider error text.
        message: String,
    },

    /// Scene construction rejected a node.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Build a scene from a description.
///
/// `points_for` maps a geometry source to its local-space vertex
/// positions; mesh handles are minted in declaration order, so the
/// renderer can upload meshes by iterating `description.geometries` with
/// the same indices.
pub fn build_scene<E, F>(
    description: &SceneDescription,
    mut points_for: F,
) -> Result<Scene, AssemblyError>
where
    E: std::fmt::Display,
    F: FnMut(&str) -> Result<Vec<Point3>, E>,
{
    let mut scene = Scene::new();
    let mut geometry_nodes: HashMap<&str, NodeKey> = HashMap::new();

    for (index, geometry) in description.geometries.iter().enumerate() {
        let points = points_for(&geometry.source).map_err(|e| AssemblyError::PointSource {
            name: geometry.name.clone(),
            message: e.to_string(),
        })?;
        let handle = MeshHandle(index as u32);
        let node = scene.add_geometry(&geometry.name, handle, &points)?;
        geometry_nodes.insert(geometry.name.as_str(), node);
    }

    for placement in &description.placements {
        let geometry = *geometry_nodes.get(placement.geometry.as_str()).ok_or_else(|| {
            AssemblyError::UnknownGeometry {
                placement: placement.name.clone(),
                geometry: placement.geometry.clone(),
            }
        })?;
        let transform = scene.add_transform(
            &placement.name,
            Vec3::from(placement.translation),
            Vec3::from(placement.rotation),
            Vec3::from(placement.scale),
        );
        scene.add_child(transform, geometry)?;
        scene.add_child(scene.root(), transform)?;
    }

    log::info!(
        "assembled scene: {} geometries, {} placements, {} nodes",
        description.geometries.len(),
        description.placements.len(),
        scene.node_count()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;
    use std::convert::Infallible;

    fn cube_points(_source: &str) -> Result<Vec<Point3>, Infallible> {
        let mut points = Vec::new();
        for &x in &[-0.5, 0.5] {
            for &y in &[-0.5, 0.5] {
                for &z in &[-0.5, 0.5] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        Ok(points)
    }

    fn two_wall_description() -> SceneDescription {
        SceneDescription {
            geometries: vec![GeometryDescription {
                name: "wall".to_string(),
                source: "meshes/wall.obj".to_string(),
            }],
            placements: vec![
                PlacementDescription {
                    name: "west wall".to_string(),
                    translation: [-4.0, 0.0, 0.0],
                    rotation: [0.0, 0.0, 0.0],
                    scale: [1.0, 1.0, 1.0],
                    geometry: "wall".to_string(),
                },
                PlacementDescription {
                    name: "east wall".to_string(),
                    translation: [4.0, 0.0, 0.0],
                    rotation: [0.0, 90.0, 0.0],
                    scale: [1.0, 2.0, 1.0],
                    geometry: "wall".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_build_shares_geometry_across_placements() {
        let mut scene = build_scene(&two_wall_description(), cube_points).unwrap();
        // Root, one geometry node, two transforms.
        assert_eq!(scene.node_count(), 4);
        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        assert_eq!(backend.draws.len(), 2);
        assert_eq!(backend.draws[0].1, backend.draws[1].1);
        let first = backend.draws[0].0.transform_point(&Point3::origin());
        assert_relative_eq!(first, Point3::new(-4.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_handles_follow_declaration_order() {
        let mut description = two_wall_description();
        description.geometries.push(GeometryDescription {
            name: "floor".to_string(),
            source: "meshes/floor.obj".to_string(),
        });
        description.placements.push(PlacementDescription {
            name: "floor placement".to_string(),
            translation: [0.0, -1.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            geometry: "floor".to_string(),
        });
        let mut scene = build_scene(&description, cube_points).unwrap();
        let mut backend = RecordingBackend::default();
        scene.draw(&mut backend);
        assert_eq!(backend.draws[0].1, MeshHandle(0));
        assert_eq!(backend.draws[2].1, MeshHandle(1));
    }

    #[test]
    fn test_unknown_geometry_is_reported() {
        let mut description = two_wall_description();
        description.placements[1].geometry = "ceiling".to_string();
        let result = build_scene(&description, cube_points);
        assert!(matches!(
            result,
            Err(AssemblyError::UnknownGeometry { ref placement, ref geometry })
                if placement == "east wall" && geometry == "ceiling"
        ));
    }

    #[test]
    fn test_provider_failure_is_reported() {
        let description = two_wall_description();
        let result = build_scene(&description, |_source| -> Result<Vec<Point3>, String> {
            Err("file not found".to_string())
        });
        assert!(matches!(
            result,
            Err(AssemblyError::PointSource { ref name, ref message })
                if name == "wall" && message == "file not found"
        ));
    }

    #[test]
    fn test_description_ron_round_trip() {
        let description = two_wall_description();
        let text = ron::ser::to_string_pretty(&description, Default::default()).unwrap();
        let parsed: SceneDescription = ron::from_str(&text).unwrap();
        assert_eq!(parsed.placements.len(), 2);
        assert_eq!(parsed.placements[1].rotation, [0.0, 90.0, 0.0]);
    }

    #[test]
    fn test_placement_defaults_fill_in() {
        let text = r#"(
            geometries: [(name: "wall", source: "meshes/wall.obj")],
            placements: [(name: "plain", geometry: "wall")],
        )"#;
        let parsed: SceneDescription = ron::from_str(text).unwrap();
        assert_eq!(parsed.placements[0].translation, [0.0, 0.0, 0.0]);
        assert_eq!(parsed.placements[0].scale, [1.0, 1.0, 1.0]);
    }
}
