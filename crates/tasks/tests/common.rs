#![allow(dead_code)]

use scene::{assemble, Frame, KinematicScene, Pose, Quat, Scene, Vec3};
use tasks::{EpisodeState, TaskConfig};

pub fn basketball_scene(config: &TaskConfig) -> KinematicScene {
    config.kinematic_scene().unwrap()
}

/// Episode state with the hand at its configured start.
pub fn episode(config: &TaskConfig, obj_init_pos: Vec3, target_pos: Vec3) -> EpisodeState {
    let mut scene = basketball_scene(config);
    scene.reset_hand(config.hand_init_pos);
    EpisodeState {
        obj_init_pos,
        obj_init_angle: config.obj_init_angle,
        target_pos,
        hand_init_pos: config.hand_init_pos,
        init_tcp: scene.tcp_center(),
    }
}

/// Observation whose current and previous frames are identical.
pub fn observation(tcp: Vec3, gripper_open: f64, object: Vec3, goal: Vec3) -> Vec<f64> {
    let frame = Frame {
        tcp,
        gripper_open,
        object: Pose::new(object, Quat::IDENTITY),
    };
    assemble(&frame, &frame, goal)
}

/// Observation read straight off a scene.
pub fn observe(scene: &impl Scene, goal: Vec3) -> Vec<f64> {
    let frame = Frame::capture(scene);
    assemble(&frame, &frame, goal)
}
