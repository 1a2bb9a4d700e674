//! Brake force distribution and stopping-distance estimates.

use crate::spec::CarSpec;

/// Share of total brake force carried by the front axle.
pub const FRONT_BRAKE_BIAS: f64 = 0.6;

/// Estimated distance to a stop from `speed`, with a ten percent safety pad.
/// Degenerate specs yield infinity so callers treat the stop as infeasible.
pub fn braking_distance(spec: &CarSpec, speed: f64) -> f64 {
    if spec.brake_force <= 0.0 || spec.mass <= 0.0 {
        return f64::INFINITY;
    }
    let d = spec.mass * speed * speed / (2.0 * spec.brake_force) * 1.1;
    if d.is_finite() {
        d
    } else {
        f64::INFINITY
    }
}

/// Deceleration from full braking, m/s^2.
pub fn brake_deceleration(spec: &CarSpec, front_grip: f64, rear_grip: f64) -> f64 {
    if spec.mass <= 0.0 {
        return 0.0;
    }
    let effective =
        spec.brake_force * (FRONT_BRAKE_BIAS * front_grip + (1.0 - FRONT_BRAKE_BIAS) * rear_grip);
    effective / spec.mass
}

/// Deceleration from the handbrake acting on the rear axle only.
pub fn handbrake_deceleration(spec: &CarSpec, rear_grip: f64) -> f64 {
    if spec.mass <= 0.0 {
        return 0.0;
    }
    spec.handbrake_force * rear_grip / spec.mass
}
