//! Ground-plane vector helpers used by steering and sensing.

use glam::DVec3;

/// Project onto the XZ plane and normalize. Returns +Z for degenerate input.
pub fn ground_dir(v: DVec3) -> DVec3 {
    let flat = DVec3::new(v.x, 0.0, v.z);
    if flat.length_squared() < 1e-12 {
        DVec3::Z
    } else {
        flat / flat.length()
    }
}

/// Rotate a vector around +Y by `angle` radians.
///
/// Matches the yaw convention in [`crate::types::VehicleBody`]: rotating
/// the forward vector of yaw `a` by `b` yields the forward vector of
/// yaw `a + b`.
pub fn rotate_y(v: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(v.x * cos + v.z * sin, v.y, v.z * cos - v.x * sin)
}

/// Signed angle from `from` to `to` around +Y, both projected to the
/// ground plane (radians, positive toward +yaw).
pub fn signed_angle_y(from: DVec3, to: DVec3) -> f64 {
    let a = ground_dir(from);
    let b = ground_dir(to);
    let cross_y = a.z * b.x - a.x * b.z;
    let dot = a.x * b.x + a.z * b.z;
    cross_y.atan2(dot)
}

/// Linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Frame-rate-safe exponential approach of `current` toward `target`
/// at `rate` per second. Equivalent to the per-frame `lerp(c, t, rate*dt)`
/// smoothing the control filters use, clamped so large steps never
/// overshoot.
pub fn smooth_lerp(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    lerp(current, target, (rate * dt).clamp(0.0, 1.0))
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_toward(current: f64, target: f64, max_delta: f64) -> f64 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Sample a piecewise-linear curve given as sorted `(key, value)` pairs.
/// Clamps outside the key range.
pub fn sample_curve(curve: &[(f64, f64)], key: f64) -> f64 {
    match curve {
        [] => 1.0,
        [only] => only.1,
        _ => {
            if key <= curve[0].0 {
                return curve[0].1;
            }
            for pair in curve.windows(2) {
                let (k0, v0) = pair[0];
                let (k1, v1) = pair[1];
                if key <= k1 {
                    let t = (key - k0) / (k1 - k0);
                    return lerp(v0, v1, t);
                }
            }
            curve[curve.len() - 1].1
        }
    }
}
