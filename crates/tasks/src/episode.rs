use scene::Vec3;
use serde::Serialize;

/// Geometry fixed at reset and read by every evaluation until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeState {
    pub obj_init_pos: Vec3,
    /// Yaw the object was placed with.
    pub obj_init_angle: f64,
    pub target_pos: Vec3,
    pub hand_init_pos: Vec3,
    pub init_tcp: Vec3,
}
