use dungeon_shooter::camera::Camera;
use glam::Vec2;

fn viewport() -> Vec2 {
    Vec2::new(800.0, 700.0)
}

fn world() -> Vec2 {
    Vec2::new(14.0 * 128.0, 9.0 * 128.0)
}

#[test]
fn desired_offset_centers_the_focus() {
    let desired = Camera::desired_offset(Vec2::new(900.0, 600.0), viewport(), world());
    assert_eq!(desired, Vec2::new(500.0, 250.0));
}

#[test]
fn desired_offset_clamps_at_every_edge() {
    let low = Camera::desired_offset(Vec2::new(10.0, 10.0), viewport(), world());
    assert_eq!(low, Vec2::ZERO);

    let high = Camera::desired_offset(Vec2::new(1780.0, 1140.0), viewport(), world());
    assert_eq!(high, world() - viewport());
}

#[test]
fn world_smaller_than_viewport_pins_to_origin() {
    let tiny = Vec2::new(300.0, 200.0);
    let desired = Camera::desired_offset(Vec2::new(150.0, 100.0), viewport(), tiny);
    assert_eq!(desired, Vec2::ZERO);
}

#[test]
fn retarget_moves_a_fraction_of_the_way() {
    let mut camera = Camera::new(0.1);
    camera.retarget(Vec2::new(900.0, 600.0), viewport(), world());
    assert!((camera.offset - Vec2::new(50.0, 25.0)).length() < 1e-4);
}

#[test]
fn retarget_settles_without_overshooting_the_bound() {
    let mut camera = Camera::new(0.1);
    let focus = Vec2::new(1780.0, 1140.0);
    let bound = world() - viewport();

    let mut previous = camera.offset;
    for _ in 0..300 {
        camera.retarget(focus, viewport(), world());
        assert!(camera.offset.x <= bound.x && camera.offset.y <= bound.y);
        assert!(camera.offset.x >= previous.x && camera.offset.y >= previous.y);
        previous = camera.offset;
    }
    assert!((camera.offset - bound).length() < 0.01);
}

#[test]
fn full_smoothing_reaches_target_in_one_tick() {
    let mut camera = Camera::new(1.0);
    camera.retarget(Vec2::new(900.0, 600.0), viewport(), world());
    assert_eq!(camera.offset, Vec2::new(500.0, 250.0));
}

#[test]
fn screen_world_round_trip() {
    let mut camera = Camera::new(0.5);
    camera.offset = Vec2::new(120.0, 40.0);
    let world_point = Vec2::new(500.0, 300.0);
    assert_eq!(camera.world_to_screen(world_point), Vec2::new(380.0, 260.0));
    assert_eq!(camera.screen_to_world(Vec2::new(380.0, 260.0)), world_point);
}
