// tests/robot_topology.rs
use glam::DVec3;
use robot_rig::{
    Axis, HeadlessScene, LimbRole, RigError, Robot, RobotGeometry, ShapePrimitive,
};
use std::f64::consts::FRAC_PI_2;

const EPS: f64 = 1e-9;

fn setup() -> (Robot, HeadlessScene) {
    let mut scene = HeadlessScene::new();
    let robot = Robot::build(&RobotGeometry::default(), &mut scene).unwrap();
    let report = robot.skeleton().sync_all(&mut scene);
    assert_eq!(report.synced, LimbRole::ALL.len());
    (robot, scene)
}

#[test]
fn test_robot_topology() {
    let (robot, scene) = setup();
    let skeleton = robot.skeleton();

    assert_eq!(skeleton.len(), 14, "Should have 14 limbs");
    assert_eq!(scene.len(), 14, "Should request one proxy per limb");
    assert_eq!(skeleton.root(), robot.limb(LimbRole::Torso));

    for role in LimbRole::ALL {
        let id = robot.limb(role);
        assert_eq!(skeleton.find(role.name()), Some(id));
        assert_eq!(robot.role_of(id), Some(role));

        let limb = skeleton.limb(id).unwrap();
        assert_eq!(limb.parent(), role.parent().map(|parent| robot.limb(parent)));
        assert_eq!(limb.allowed_axes(), role.allowed_axes());
    }

    let torso = skeleton.limb(robot.limb(LimbRole::Torso)).unwrap();
    let names: Vec<&str> = torso
        .children()
        .iter()
        .map(|&id| skeleton.limb(id).unwrap().name())
        .collect();
    assert_eq!(names, ["head", "left_arm", "right_arm", "left_leg", "right_leg"]);
}

#[test]
fn test_rest_pose_placement() {
    let (robot, scene) = setup();
    let geometry = RobotGeometry::default();
    let placement = |role: LimbRole| {
        let limb = robot.skeleton().limb(robot.limb(role)).unwrap();
        scene.get(limb.proxy().unwrap()).unwrap().placement
    };

    // Torso sits at its configured position.
    assert!(placement(LimbRole::Torso).position.abs_diff_eq(DVec3::new(0.0, 4.0, 0.0), EPS));

    // Head rests on top: torso centre + half height + head radius.
    let head = placement(LimbRole::Head).position;
    assert!(head.abs_diff_eq(DVec3::new(0.0, 4.0 + 0.75 + 0.32, 0.0), EPS), "{head}");

    // Left and right hands mirror each other across X.
    let left = placement(LimbRole::LeftHand).position;
    let right = placement(LimbRole::RightHand).position;
    assert!(left.abs_diff_eq(DVec3::new(-right.x, right.y, right.z), EPS));
    let expected_y = 4.0 + 0.75 - geometry.arm_radius - geometry.arm_length - geometry.forearm_length;
    assert!((left.y - expected_y).abs() < EPS);

    // Feet carry their flattening stretch into the proxy scale.
    let foot = placement(LimbRole::LeftFoot);
    assert!(foot.scale.abs_diff_eq(DVec3::new(1.0, 0.5, 1.6), EPS));
}

#[test]
fn test_shapes_reach_the_factory() {
    let (robot, scene) = setup();
    let torso = robot.skeleton().limb(robot.limb(LimbRole::Torso)).unwrap();
    let proxy = scene.get(torso.proxy().unwrap()).unwrap();
    assert_eq!(
        proxy.shape,
        ShapePrimitive::Box(DVec3::new(0.75, 0.75, 0.375))
    );
    assert!(matches!(
        scene.get(robot.skeleton().limb(robot.limb(LimbRole::LeftShin)).unwrap().proxy().unwrap()).unwrap().shape,
        ShapePrimitive::Capsule { .. }
    ));
}

#[test]
fn test_roles_parse_by_name() {
    assert_eq!("left_forearm".parse::<LimbRole>(), Ok(LimbRole::LeftForearm));
    assert_eq!(
        "tail".parse::<LimbRole>(),
        Err(RigError::UnknownLimb("tail".to_owned()))
    );
}

#[test]
fn test_walk_after_turning() {
    let (mut robot, mut scene) = setup();
    let foot = robot.limb(LimbRole::RightFoot);
    let foot_before = robot.skeleton().world_position(foot).unwrap();

    robot.rotate(LimbRole::Torso, FRAC_PI_2, Axis::Y, &mut scene).unwrap();
    let report = robot.translate(LimbRole::Torso, 1.0, &mut scene).unwrap();
    assert_eq!(report.synced, 14);

    let torso = robot.skeleton().world_position(robot.limb(LimbRole::Torso)).unwrap();
    assert!(torso.abs_diff_eq(DVec3::new(1.0, 4.0, 0.0), EPS), "{torso}");

    // Turning about the torso's vertical axis swings the foot round it.
    let foot_after = robot.skeleton().world_position(foot).unwrap();
    let offset_before = foot_before - DVec3::new(0.0, 4.0, 0.0);
    let offset_after = foot_after - torso;
    assert!(offset_after.abs_diff_eq(
        DVec3::new(offset_before.z, offset_before.y, -offset_before.x),
        EPS
    ));
}

#[test]
fn test_head_looks_at_point() {
    let (mut robot, mut scene) = setup();
    let head = robot.limb(LimbRole::Head);
    let at = robot.skeleton().world_position(head).unwrap();

    robot
        .look_at(LimbRole::Head, at + DVec3::new(3.0, 3.0, 0.0), &mut scene)
        .unwrap();

    let heading = robot.skeleton().world_heading(head).unwrap();
    let expected = DVec3::new(1.0, 1.0, 0.0).normalize();
    assert!(heading.abs_diff_eq(expected, 1e-9), "{heading}");
    assert!(robot.skeleton().world_position(head).unwrap().abs_diff_eq(at, EPS));
}

#[test]
fn test_look_at_skips_disallowed_axes() {
    let (mut robot, mut scene) = setup();
    let torso = robot.limb(LimbRole::Torso);
    let at = robot.skeleton().world_position(torso).unwrap();

    // The torso only yaws, so the upward component of the target is ignored.
    robot
        .look_at(LimbRole::Torso, at + DVec3::new(-2.0, 5.0, 0.0), &mut scene)
        .unwrap();
    let heading = robot.skeleton().world_heading(torso).unwrap();
    assert!(heading.abs_diff_eq(-DVec3::X, EPS), "{heading}");

    // A target straight ahead needs no correction at all.
    let report = robot
        .look_at(LimbRole::Torso, at - DVec3::X * 4.0, &mut scene)
        .unwrap();
    assert_eq!(report.synced, 0);
}

#[test]
fn test_logical_robot_has_no_proxies() {
    let robot = Robot::build_logical(&RobotGeometry::default()).unwrap();
    let mut scene = HeadlessScene::new();
    let report = robot.skeleton().sync_all(&mut scene);
    assert_eq!(report.synced, 0);
    assert_eq!(report.missing_proxy.len(), 14);
    assert!(!report.is_complete());
}
