use scene::{assemble, Frame, KinematicScene, ObservationError, ObservationView, Pose, Quat, Scene, Vec3, OBS_DIM};

fn frame(tcp: Vec3, gripper_open: f64, object: Vec3) -> Frame {
    Frame {
        tcp,
        gripper_open,
        object: Pose::new(object, Quat::from_yaw(0.3)),
    }
}

#[test]
fn assembled_vector_has_documented_offsets() {
    let current = frame(Vec3::new(0.0, 0.6, 0.2), 1.0, Vec3::new(0.05, 0.65, 0.03));
    let previous = frame(Vec3::new(0.0, 0.59, 0.21), 0.8, Vec3::new(0.05, 0.65, 0.03));
    let goal = Vec3::new(0.0, 0.9, 0.3);
    let obs = assemble(&current, &previous, goal);

    assert_eq!(obs.len(), OBS_DIM);
    assert_eq!(&obs[0..3], &[0.0, 0.6, 0.2]);
    assert_eq!(obs[3], 1.0);
    assert_eq!(&obs[4..7], &[0.05, 0.65, 0.03]);
    assert!(obs[11..18].iter().all(|v| *v == 0.0));
    assert_eq!(obs[21], 0.8);
    assert_eq!(&obs[36..39], &[0.0, 0.9, 0.3]);

    let view = ObservationView::parse(&obs).unwrap();
    assert_eq!(view.tcp(), current.tcp);
    assert_eq!(view.gripper_open(), 1.0);
    assert_eq!(view.object_position(), current.object.position);
    assert_eq!(view.object_orientation(), Quat::from_yaw(0.3));
    assert_eq!(view.current(), current);
    assert_eq!(view.previous(), previous);
    assert_eq!(view.goal(), goal);
}

#[test]
fn wrong_length_is_rejected() {
    let short = vec![0.0; OBS_DIM - 1];
    assert_eq!(
        ObservationView::parse(&short).unwrap_err(),
        ObservationError::WrongLength { expected: OBS_DIM, actual: OBS_DIM - 1 }
    );
    assert!(ObservationView::parse(&[]).is_err());
}

#[test]
fn non_finite_entries_are_rejected() {
    let mut obs = vec![0.0; OBS_DIM];
    obs[5] = f64::NAN;
    assert!(matches!(
        ObservationView::parse(&obs),
        Err(ObservationError::NonFinite { index: 5, .. })
    ));
}

#[test]
fn vec3_serializes_as_array() {
    let v: Vec3 = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
    assert_eq!(v, Vec3::new(0.1, 0.2, 0.3));
    assert_eq!(serde_json::to_string(&Vec3::new(1.0, 0.0, -1.0)).unwrap(), "[1.0,0.0,-1.0]");
}

#[test]
fn planar_and_xz_distances() {
    let a = Vec3::new(0.0, 0.0, 5.0);
    let b = Vec3::new(3.0, 4.0, -5.0);
    assert!((a.planar_distance(b) - 5.0).abs() < 1e-12);
    assert!((a.xz_distance(b) - (9.0_f64 + 100.0).sqrt()).abs() < 1e-12);
    assert_eq!(a.scale(Vec3::new(1.0, 1.0, 2.0)).z, 10.0);
}

#[test]
fn captured_frame_records_tool_center_point() {
    let mut scene = KinematicScene::new(Vec3::new(-0.5, 0.4, 0.05), Vec3::new(0.5, 1.0, 0.5), 0.02);
    scene.reset_hand(Vec3::new(0.1, 0.7, 0.2));
    let frame = Frame::capture(&scene);
    assert_eq!(frame.tcp, scene.tcp_center());
    assert_ne!(frame.tcp, scene.hand_position());

    let obs = assemble(&frame, &frame, Vec3::ZERO);
    assert_eq!(ObservationView::parse(&obs).unwrap().tcp(), scene.tcp_center());
}
