use nalgebra::{Point2, Rotation2, Vector2};
use std::f64::consts::{PI, TAU};

/// Rotates `offset` counter-clockwise (in canvas axes) by `angle_degrees`.
pub fn rotate_by_degrees(offset: &Vector2<f64>, angle_degrees: f64) -> Vector2<f64> {
    Rotation2::new(angle_degrees.to_radians()) * *offset
}

/// Rotates `point` about `origin` by `angle_degrees`.
pub fn rotate_about(point: &Point2<f64>, origin: &Point2<f64>, angle_degrees: f64) -> Point2<f64> {
    *origin + rotate_by_degrees(&(point - origin), angle_degrees)
}

/// Polar angle of `target` seen from `origin`, in radians within `(-π, π]`.
pub fn angle_between(origin: &Point2<f64>, target: &Point2<f64>) -> f64 {
    let offset = target - origin;
    offset.y.atan2(offset.x)
}

/// Brings a difference of two `atan2` angles back into `[-π, π]`.
///
/// Differences of two `atan2` results lie in `(-2π, 2π)`, so one correction suffices.
pub fn normalize_angle_delta(delta: f64) -> f64 {
    if delta > PI {
        delta - TAU
    } else if delta < -PI {
        delta + TAU
    } else {
        delta
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub fn distance(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Clamps `point` into the rectangle `[0, width] x [0, height]`.
pub fn clamp_to_bounds(point: &Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    Point2::new(point.x.clamp(0.0, width), point.y.clamp(0.0, height))
}
