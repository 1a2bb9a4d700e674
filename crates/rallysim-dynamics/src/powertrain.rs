//! Engine torque and RPM model.

use rallysim_core::math::{lerp, smooth_lerp};

use crate::gearbox::NEUTRAL_GEAR;
use crate::spec::CarSpec;

/// RPM band below the redline where engine braking kicks in.
pub const REDLINE_GUARD_BAND: f64 = 100.0;

/// Speed (m/s) at which the acceleration multiplier reaches its
/// high-speed value.
pub const ACCEL_BLEND_SPEED: f64 = 50.0;

/// Equivalent wheel-referred engine RPM at the given road speed.
pub fn wheel_rpm(spec: &CarSpec, speed: f64, gear_ratio: f64) -> f64 {
    let wheel_revs_per_sec = speed / (std::f64::consts::TAU * spec.wheel_radius);
    wheel_revs_per_sec * 60.0 * gear_ratio.abs() * spec.differential_ratio
}

/// Engine torque delivered to the driveline this tick, updating `rpm`
/// in place.
///
/// In neutral the engine free-revs toward a gas-proportional RPM and no
/// torque reaches the wheels. In gear, RPM rev-matches toward the wheel
/// RPM every tick, including inside the redline guard band, so a slowing
/// car sheds revs instead of pinning there. At or beyond the guard band
/// the output turns into an engine-braking (negative) value instead of
/// drive torque.
pub fn calculate_torque(
    spec: &CarSpec,
    gear: usize,
    rpm: &mut f64,
    gas: f64,
    speed: f64,
    dt: f64,
) -> f64 {
    let ratio = spec.gear_ratio(gear);

    if gear == NEUTRAL_GEAR {
        let target = lerp(spec.idle_rpm, spec.redline, gas.clamp(0.0, 1.0));
        *rpm = smooth_lerp(*rpm, target, 5.0, dt);
        return 0.0;
    }

    let over_redline = *rpm >= spec.redline;
    let in_guard_band = *rpm >= spec.redline - REDLINE_GUARD_BAND;

    let matched = wheel_rpm(spec, speed, ratio).clamp(spec.idle_rpm, spec.redline);
    *rpm = smooth_lerp(*rpm, matched, 3.0, dt);

    if over_redline {
        return -spec.engine_braking * 2.0;
    }
    if in_guard_band {
        return -spec.engine_braking;
    }

    let base = spec.motor_power * ratio.abs() * spec.differential_ratio;
    let speed_effect = (speed / ACCEL_BLEND_SPEED).clamp(0.0, 1.0);
    let multiplier = lerp(
        spec.low_speed_accel_multiplier,
        spec.high_speed_accel_multiplier,
        speed_effect,
    );

    // Hard ceiling at twice the base torque regardless of multipliers
    let limit = base * 2.0;
    (base * multiplier * gas.clamp(0.0, 1.0)).clamp(-limit, limit)
}
