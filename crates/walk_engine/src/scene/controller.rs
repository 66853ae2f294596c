//! First-person walking camera with collision resolution
//!
//! The controller owns the camera basis vectors, the player's collision
//! proxy, and the movement rules of a ground-locked walkthrough: looking
//! steers yaw and pitch, walking slides the proxy through the scene's
//! swept-collision query and projects the velocity off every contact
//! before the camera moves.

use crate::bounds::BoundingBox;
use crate::config::Config;
use crate::foundation::math::{utils, Mat4, Point3, Vec3};
use serde::{Deserialize, Serialize};

use super::Scene;

/// Walking directions relative to the camera's current heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Along the horizontal projection of the view direction.
    Forward,
    /// Against the view direction.
    Backward,
    /// Along the negated right vector.
    Left,
    /// Along the right vector.
    Right,
}

/// Serializable controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Mouse-look sensitivity in degrees per input unit.
    pub sensitivity: f32,
    /// Initial field-of-view zoom in degrees.
    pub zoom: f32,
    /// Initial eye position.
    pub position: [f32; 3],
    /// Initial yaw in degrees. `-90` faces down the negative z axis.
    pub yaw: f32,
    /// Initial pitch in degrees.
    pub pitch: f32,
    /// Height of the player's collision box.
    pub player_height: f32,
    /// Width of the player's collision box.
    pub player_width: f32,
    /// Length of the player's collision box.
    pub player_length: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sensitivity: 0.5,
            zoom: 45.0,
            position: [0.0, 2.5, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            player_height: 1.0,
            player_width: 0.5,
            player_length: 1.0,
        }
    }
}

impl Config for ControllerConfig {}

const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

/// The walking camera.
#[derive(Debug)]
pub struct WalkController {
    position: Point3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    speed: f32,
    sensitivity: f32,
    zoom: f32,
    player_box: BoundingBox,
}

impl WalkController {
    /// Build a controller from settings.
    pub fn new(config: &ControllerConfig) -> Self {
        let position = Point3::new(config.position[0], config.position[1], config.position[2]);
        let mut controller = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            world_up: Vec3::new(0.0, 1.0, 0.0),
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            speed: config.speed,
            sensitivity: config.sensitivity,
            zoom: config.zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            player_box: BoundingBox::from_center_size(
                position,
                config.player_height,
                config.player_width,
                config.player_length,
            ),
        };
        controller.refresh_vectors();
        controller
    }

    /// Current eye position.
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Current view direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Current field-of-view zoom in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// The player's collision proxy, centered on the eye.
    pub fn player_box(&self) -> &BoundingBox {
        &self.player_box
    }

    /// View matrix for the current pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&self.position, &(self.position + self.front), &self.up)
    }

    /// Walk one frame in `direction`, resolving collisions against `scene`.
    ///
    /// The intended displacement is projected off the contact normal of
    /// every reported collision, scaled by the remaining fraction of the
    /// frame, and its vertical component is dropped so the walker stays on
    /// the ground plane. Returns the displacement actually applied.
    pub fn walk(&mut self, direction: MoveDirection, delta_time: f32, scene: &mut Scene) -> Vec3 {
        let step = self.speed * delta_time;
        let mut velocity = match direction {
            MoveDirection::Forward => self.front * step,
            MoveDirection::Backward => -self.front * step,
            MoveDirection::Left => -self.right * step,
            MoveDirection::Right => self.right * step,
        };

        for collision in scene.query_collisions(&self.player_box, velocity) {
            let along_normal = velocity.dot(&collision.normal);
            velocity -= collision.normal * along_normal * (1.0 - collision.entry_time);
        }
        velocity.y = 0.0;

        self.position += velocity;
        self.player_box.translate_world(velocity);
        velocity
    }

    /// Apply a mouse-look delta, in input units.
    pub fn look(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch = (self.pitch + delta_y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.refresh_vectors();
    }

    /// Apply a scroll-wheel zoom delta.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom - delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn refresh_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}
