//! Renderer-facing seam
//!
//! The core never rasterizes. During a draw traversal each geometry leaf
//! hands its accumulated world matrix and an opaque mesh handle to a
//! [`DrawBackend`]; everything about shaders, buffers, and GPU state lives
//! on the other side of this trait.

use crate::foundation::math::Mat4;

/// Opaque reference to renderer-side mesh data.
///
/// The engine never looks inside; the renderer mints handles when it
/// uploads meshes and resolves them again at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Rendering capability required by the draw traversals.
pub trait DrawBackend {
    /// Emit one mesh with its world transform for the color pass.
    fn draw_mesh(&mut self, world: &Mat4, mesh: MeshHandle);

    /// Emit one mesh for the depth-only shadow pass.
    fn draw_mesh_depth(&mut self, world: &Mat4, mesh: MeshHandle);
}

/// Backend double that records emitted draws, for tests and headless demos.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Color-pass emissions in traversal order.
    pub draws: Vec<(Mat4, MeshHandle)>,
    /// Depth-pass emissions in traversal order.
    pub depth_draws: Vec<(Mat4, MeshHandle)>,
}

impl DrawBackend for RecordingBackend {
    fn draw_mesh(&mut self, world: &Mat4, mesh: MeshHandle) {
        self.draws.push((*world, mesh));
    }

    fn draw_mesh_depth(&mut self, world: &Mat4, mesh: MeshHandle) {
        self.depth_draws.push((*world, mesh));
    }
}
