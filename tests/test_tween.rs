use flying_spur::tween::{Easing, Tween};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn linear_midpoint() {
    let mut t = Tween::new(0.0, 10.0, 2.0, Easing::Linear);
    assert!(close(t.update(1.0), 5.0));
    assert!(!t.is_finished());
}

#[test]
fn out_quad_front_loads_progress() {
    assert!(close(Easing::OutQuad.apply(0.0), 0.0));
    assert!(close(Easing::OutQuad.apply(0.5), 0.75));
    assert!(close(Easing::OutQuad.apply(1.0), 1.0));
}

#[test]
fn clamps_at_target() {
    let mut t = Tween::new(0.6, 0.0, 0.5, Easing::Linear);
    t.update(0.25);
    assert!(close(t.update(10.0), 0.0));
    assert!(t.is_finished());
    assert!(close(t.value(), 0.0));
}

#[test]
fn zero_duration_jumps_to_target() {
    let t = Tween::new(1.0, 3.0, 0.0, Easing::OutQuad);
    assert!(t.is_finished());
    assert!(close(t.value(), 3.0));
}
