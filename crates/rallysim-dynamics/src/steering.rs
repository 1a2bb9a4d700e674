//! Steering response.
//!
//! Steering sensitivity and the maximum achievable wheel angle both fall
//! off with speed so cars do not spin out from a small input at pace.
//! While the rear is sliding a counter-steer torque leans the wheel back
//! against the yaw.

use rallysim_core::enums::DrivetrainLayout;
use rallysim_core::math::{lerp, sample_curve};

use crate::spec::CarSpec;

/// Sensitivity by speed in km/h.
const SENSITIVITY_CURVE: &[(f64, f64)] = &[
    (0.0, 1.5),
    (20.0, 1.3),
    (60.0, 1.1),
    (100.0, 0.8),
    (150.0, 0.6),
    (200.0, 0.5),
];

/// Yaw rate above which the counter-steer assist engages, rad/s.
const COUNTER_STEER_THRESHOLD: f64 = 0.2;

const MIN_STEER_ANGLE_DEG: f64 = 10.0;

pub fn sensitivity(speed: f64) -> f64 {
    sample_curve(SENSITIVITY_CURVE, speed * 3.6)
}

/// Maximum wheel angle at this speed, radians. Full lock is only
/// available near standstill and shrinks toward ten degrees at 200 km/h.
pub fn dynamic_max_angle(spec: &CarSpec, speed: f64) -> f64 {
    let kmh = speed * 3.6;
    let t = (1.0 - kmh / 200.0).clamp(0.0, 1.0);
    lerp(
        MIN_STEER_ANGLE_DEG.to_radians(),
        spec.max_steer_angle_rad(),
        t,
    )
}

/// Wheel angle for a steer input in [-1, 1].
pub fn steer_angle(spec: &CarSpec, steer_input: f64, speed: f64, yaw_rate: f64, handbrake: bool) -> f64 {
    let mut angle = steer_input.clamp(-1.0, 1.0) * sensitivity(speed) * dynamic_max_angle(spec, speed);

    angle *= match spec.drivetrain {
        DrivetrainLayout::Front => 0.9,
        DrivetrainLayout::Rear => 1.1,
        DrivetrainLayout::All => 1.0,
    };

    if handbrake {
        angle *= 1.3;
    }

    // Counter-steer once the car rotates faster than the driver asked for.
    if yaw_rate.abs() > COUNTER_STEER_THRESHOLD {
        angle -= yaw_rate.signum() * spec.drift_steer_assist * (yaw_rate.abs() - COUNTER_STEER_THRESHOLD);
    }

    angle.clamp(-spec.max_steer_angle_rad(), spec.max_steer_angle_rad())
}
