//! Animation Curve Tests
//!
//! Tests for:
//! - KeyframeBezierSpline evaluation, clamping and layout validation
//! - KeyframeTrack linear/step sampling
//! - Vec3Animation dispatch and validation
//! - Interpolatable trait implementations (f32, Vec3)

use glam::Vec3;

use marionette::MarionetteError;
use marionette::animation::spline::KeyframeBezierSpline;
use marionette::animation::tracks::{InterpolationMode, KeyframeTrack};
use marionette::animation::values::Interpolatable;
use marionette::animation::Vec3Animation;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn line_spline() -> KeyframeBezierSpline {
    KeyframeBezierSpline::new(
        vec![0.0, 1.0],
        vec![
            Vec3::ZERO,
            Vec3::new(1.0 / 3.0, 0.0, 0.0),
            Vec3::new(2.0 / 3.0, 0.0, 0.0),
            Vec3::X,
        ],
    )
    .unwrap()
}

fn curved_spline() -> KeyframeBezierSpline {
    KeyframeBezierSpline::new(
        vec![0.0, 2.0, 3.0],
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(2.0, 4.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(3.0, -1.0, 1.0),
            Vec3::new(4.0, -1.0, 2.0),
            Vec3::new(5.0, 0.0, 3.0),
        ],
    )
    .unwrap()
}

// ============================================================================
// Bezier Spline: Evaluation
// ============================================================================

#[test]
fn spline_collinear_midpoint() {
    let v = line_spline().evaluate(0.5).unwrap();
    assert!(vec3_approx(v, Vec3::new(0.5, 0.0, 0.0)), "Expected (0.5,0,0), got {v}");
}

#[test]
fn spline_keyframes_are_exact() {
    let spline = curved_spline();
    assert_eq!(spline.evaluate(0.0).unwrap(), Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(spline.evaluate(2.0).unwrap(), Vec3::new(2.0, 0.0, 1.0));
    assert_eq!(spline.evaluate(3.0).unwrap(), Vec3::new(5.0, 0.0, 3.0));
}

#[test]
fn spline_clamps_before_first_keyframe() {
    let spline = curved_spline();
    assert_eq!(spline.evaluate(-10.0).unwrap(), Vec3::ZERO);
}

#[test]
fn spline_clamps_after_last_keyframe() {
    let spline = curved_spline();
    assert_eq!(spline.evaluate(99.0).unwrap(), Vec3::new(5.0, 0.0, 3.0));
}

#[test]
fn spline_bezier_weights_inside_segment() {
    // u = 0.5 on the first segment: (P0 + 3 P1 + 3 P2 + P3) / 8
    let spline = curved_spline();
    let v = spline.evaluate(1.0).unwrap();
    let expected = (Vec3::new(0.0, 0.0, 0.0)
        + 3.0 * Vec3::new(0.0, 4.0, 0.0)
        + 3.0 * Vec3::new(2.0, 4.0, 1.0)
        + Vec3::new(2.0, 0.0, 1.0))
        / 8.0;
    assert!(vec3_approx(v, expected), "Expected {expected}, got {v}");
}

#[test]
fn spline_single_keyframe_is_constant() {
    let spline = KeyframeBezierSpline::new(vec![1.0], vec![Vec3::new(1.0, 2.0, 3.0)]).unwrap();
    for t in [-5.0, 0.0, 1.0, 100.0] {
        assert_eq!(spline.evaluate(t).unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }
}

#[test]
fn spline_from_linear_keyframes_moves_at_constant_speed() {
    let spline =
        KeyframeBezierSpline::from_linear_keyframes(vec![0.0, 1.0, 3.0], &[Vec3::ZERO, Vec3::Y, Vec3::ZERO]).unwrap();
    assert!(vec3_approx(spline.evaluate(0.25).unwrap(), Vec3::new(0.0, 0.25, 0.0)));
    assert!(vec3_approx(spline.evaluate(2.0).unwrap(), Vec3::new(0.0, 0.5, 0.0)));
    assert_eq!(spline.keyframe_count(), 3);
    assert_eq!(spline.keyframe_value(1), Some(Vec3::Y));
}

#[test]
fn spline_time_range() {
    let spline = curved_spline();
    assert_eq!(spline.start_time(), Some(0.0));
    assert_eq!(spline.end_time(), Some(3.0));
}

// ============================================================================
// Bezier Spline: Validation
// ============================================================================

#[test]
fn spline_rejects_control_point_count_mismatch() {
    let result = KeyframeBezierSpline::new(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    assert!(matches!(result, Err(MarionetteError::InvalidSpline(_))));
}

#[test]
fn spline_rejects_non_increasing_times() {
    let result = KeyframeBezierSpline::new(vec![1.0, 1.0], vec![Vec3::ZERO; 4]);
    assert!(matches!(result, Err(MarionetteError::InvalidSpline(_))));
}

#[test]
fn spline_rejects_empty_keyframes() {
    let result = KeyframeBezierSpline::new(Vec::new(), Vec::new());
    assert!(matches!(result, Err(MarionetteError::InvalidSpline(_))));
}

#[test]
fn spline_rejects_non_finite_control_points() {
    let result = KeyframeBezierSpline::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::X, Vec3::X],
    );
    assert!(matches!(result, Err(MarionetteError::InvalidSpline(_))));

    let mut spline = line_spline();
    spline.control_points[3] = Vec3::splat(f32::INFINITY);
    assert!(spline.validate().is_err());
}

#[test]
fn spline_evaluate_fails_after_corrupting_arrays() {
    let mut spline = line_spline();
    spline.control_points.pop();
    assert!(matches!(spline.evaluate(0.5), Err(MarionetteError::InvalidSpline(_))));
}

// ============================================================================
// KeyframeTrack
// ============================================================================

#[test]
fn track_linear_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);
    let val = track.sample(0.5).unwrap();
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_clamps_beyond_range() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::ONE], InterpolationMode::Linear);
    assert_eq!(track.sample(-1.0).unwrap(), Vec3::ZERO);
    assert_eq!(track.sample(2.0).unwrap(), Vec3::ONE);
}

#[test]
fn track_step_holds_previous_value() {
    let track = KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![1.0_f32, 2.0, 3.0], InterpolationMode::Step);
    assert!(approx(track.sample(0.99).unwrap(), 1.0));
    assert!(approx(track.sample(1.0).unwrap(), 2.0));
    assert!(approx(track.sample(1.5).unwrap(), 2.0));
}

#[test]
fn track_rejects_length_mismatch() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32], InterpolationMode::Linear);
    assert!(matches!(track.validate(), Err(MarionetteError::InvalidSpline(_))));
    assert!(track.sample(0.5).is_err());
}

#[test]
fn track_rejects_non_finite_values() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::new(0.0, f32::NAN, 0.0)], InterpolationMode::Linear);
    assert!(matches!(track.validate(), Err(MarionetteError::InvalidSpline(_))));
}

// ============================================================================
// Vec3Animation
// ============================================================================

#[test]
fn animation_dispatches_to_variant() {
    let bezier: Vec3Animation = line_spline().into();
    let track: Vec3Animation = KeyframeTrack::new(vec![0.0, 2.0], vec![Vec3::ZERO, Vec3::Y * 2.0], InterpolationMode::Linear).into();
    let constant = Vec3Animation::Constant(Vec3::splat(7.0));

    assert!(vec3_approx(bezier.evaluate(0.5).unwrap(), Vec3::new(0.5, 0.0, 0.0)));
    assert!(vec3_approx(track.evaluate(1.0).unwrap(), Vec3::Y));
    assert_eq!(constant.evaluate(123.0).unwrap(), Vec3::splat(7.0));
}

#[test]
fn constant_animation_rejects_non_finite_value() {
    assert!(Vec3Animation::Constant(Vec3::splat(2.0)).validate().is_ok());
    assert!(matches!(
        Vec3Animation::Constant(Vec3::new(f32::NAN, 0.0, 0.0)).validate(),
        Err(MarionetteError::InvalidSpline(_))
    ));
}

#[test]
fn animation_end_time() {
    let bezier: Vec3Animation = curved_spline().into();
    assert_eq!(bezier.end_time(), Some(3.0));
    assert_eq!(Vec3Animation::Constant(Vec3::ZERO).end_time(), None);
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn interpolate_linear_vec3() {
    let v = Vec3::interpolate_linear(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.5);
    assert!(vec3_approx(v, Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn interpolate_bezier_endpoints_f32() {
    assert!(approx(f32::interpolate_bezier(1.0, 5.0, -3.0, 2.0, 0.0), 1.0));
    assert!(approx(f32::interpolate_bezier(1.0, 5.0, -3.0, 2.0, 1.0), 2.0));
}
