//! Spline steering toward the waypoint path.
//!
//! The canonical steering target comes from a Catmull-Rom segment through
//! four consecutive waypoints, walked in fixed samples with every sample
//! edge-clamped; a two-point quadratic Bezier stands in when fewer points
//! are usable. Both paths degrade to a straight-ahead edge-clamped aim
//! when the curve is judged unsafe.

use glam::DVec3;

use rallysim_core::constants::*;
use rallysim_core::math::{ground_dir, rotate_y, signed_angle_y};
use rallysim_core::path::WaypointPath;
use rallysim_core::query::SurfaceQuery;
use rallysim_core::types::VehicleBody;

use crate::profiles::ProfileTunables;

/// Catmull-Rom interpolation through p1..p2 at parameter `t` in [0, 1].
pub fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Push a candidate point inward if it sits within `safety` of the
/// surface edge. Points that cannot be sampled onto the surface at all
/// are returned unchanged; the caller validates safety separately.
pub fn edge_clamp(surface: &dyn SurfaceQuery, point: DVec3, safety: f64) -> DVec3 {
    let Some(on_surface) = surface.sample_position(point, SURFACE_SAMPLE_DIST) else {
        return point;
    };
    let Some(edge) = surface.closest_edge(on_surface) else {
        return on_surface;
    };
    if edge.distance >= safety {
        return on_surface;
    }
    let inward = ground_dir(on_surface - edge.edge_position);
    on_surface + inward * (safety - edge.distance)
}

/// Whether a point sits on the surface with room for the vehicle.
pub fn is_position_safe(surface: &dyn SurfaceQuery, point: DVec3, half_width: f64) -> bool {
    let Some(on_surface) = surface.sample_position(point, SURFACE_SAMPLE_DIST) else {
        return false;
    };
    match surface.closest_edge(on_surface) {
        Some(edge) => edge.distance >= half_width + EDGE_SAFETY_MARGIN,
        None => false,
    }
}

/// Lookahead distance for the current speed, clamped to the fixed range.
pub fn lookahead(tunables: &ProfileTunables, speed: f64) -> f64 {
    (speed * tunables.lookahead_speed_factor).clamp(LOOKAHEAD_MIN, LOOKAHEAD_MAX)
}

/// Steering target from the waypoint path.
///
/// With four distinct usable points around `index` the Catmull-Rom walk
/// applies; with fewer the Bezier fallback, which itself degrades to a
/// straight-ahead aim on an unusable path.
pub fn steering_target(
    surface: &dyn SurfaceQuery,
    body: &VehicleBody,
    path: &WaypointPath,
    index: usize,
    tunables: &ProfileTunables,
) -> DVec3 {
    if let Some(points) = four_points_around(path, index) {
        if let Some(target) = walk_spline(surface, body, points, tunables) {
            return target;
        }
        return fail_safe_target(surface, body, tunables);
    }

    bezier_target(surface, body, path, index, tunables)
}

/// Four consecutive present waypoints centered on the segment that starts
/// at `index`, wrapping at the path ends. None when fewer than four
/// distinct waypoints are usable.
fn four_points_around(path: &WaypointPath, index: usize) -> Option<[DVec3; 4]> {
    if path.len() < 4 {
        return None;
    }
    let mut points = [DVec3::ZERO; 4];
    let mut indices = [usize::MAX; 4];
    let mut cursor = path.wrap(index + path.len() - 1);
    for slot in 0..4 {
        let (found, wp) = path.first_present_from(cursor)?;
        // A wrapped-around repeat means the path has fewer than four
        // present entries; a spline through duplicates degenerates.
        if indices[..slot].contains(&found) {
            return None;
        }
        indices[slot] = found;
        points[slot] = wp.position;
        cursor = path.wrap(found + 1);
    }
    Some(points)
}

fn walk_spline(
    surface: &dyn SurfaceQuery,
    body: &VehicleBody,
    [p0, p1, p2, p3]: [DVec3; 4],
    tunables: &ProfileTunables,
) -> Option<DVec3> {
    let ahead = lookahead(tunables, body.speed());
    let mut arc = 0.0;
    let mut previous = edge_clamp(surface, p1, STEER_EDGE_CLAMP);
    let mut chosen = previous;

    for step in 1..=SPLINE_SAMPLES {
        let t = step as f64 / SPLINE_SAMPLES as f64;
        let sample = edge_clamp(surface, catmull_rom(p0, p1, p2, p3, t), STEER_EDGE_CLAMP);
        if !is_position_safe(surface, sample, body.half_width()) {
            return None;
        }
        arc += (sample - previous).length();
        previous = sample;
        chosen = sample;
        if arc >= ahead {
            break;
        }
    }
    Some(chosen)
}

/// Quadratic Bezier fallback through the vehicle position, the current
/// waypoint, and the next one, evaluated at the profile's inner
/// parameter: a sharper profile pulls the target toward the inside of the
/// turn. With only one usable waypoint the control point instead leans
/// along the current heading so the turn-in stays gradual.
pub fn bezier_target(
    surface: &dyn SurfaceQuery,
    body: &VehicleBody,
    path: &WaypointPath,
    index: usize,
    tunables: &ProfileTunables,
) -> DVec3 {
    let Some((i1, current)) = path.first_present_from(index) else {
        return fail_safe_target(surface, body, tunables);
    };
    let p0 = body.position;
    let p1 = current.position;
    let next = path
        .first_present_from(path.wrap(i1 + 1))
        .filter(|(i2, _)| *i2 != i1)
        .map(|(_, wp)| wp.position);

    let target = match next {
        Some(p2) => {
            let t = tunables.bezier_inner_t;
            let one_t = 1.0 - t;
            p0 * (one_t * one_t) + p1 * (2.0 * one_t * t) + p2 * (t * t)
        }
        None => {
            let distance = (p1 - p0).length();
            let control =
                p0 + body.forward() * (distance * tunables.bezier_inner_t).max(1.0);
            0.25 * p0 + 0.5 * control + 0.25 * p1
        }
    };
    edge_clamp(surface, target, STEER_EDGE_CLAMP)
}

/// Aim straight down the current heading at lookahead distance,
/// edge-clamped.
pub fn fail_safe_target(
    surface: &dyn SurfaceQuery,
    body: &VehicleBody,
    tunables: &ProfileTunables,
) -> DVec3 {
    let ahead = body.position + body.forward() * lookahead(tunables, body.speed());
    edge_clamp(surface, ahead, STEER_EDGE_CLAMP)
}

/// Normalized steering command toward `target` in [-1, 1].
pub fn steer_command(body: &VehicleBody, target: DVec3, tunables: &ProfileTunables) -> f64 {
    let offset = target - body.position;
    if DVec3::new(offset.x, 0.0, offset.z).length_squared() < 1e-9 {
        return 0.0;
    }
    let error = signed_angle_y(body.forward(), ground_dir(offset));
    (error / tunables.max_steer_angle_rad()).clamp(-1.0, 1.0)
}

/// An upcoming bend on the path: where it turns and by how much.
#[derive(Debug, Clone, Copy)]
pub struct UpcomingBend {
    /// Angle between the entry and exit segments (degrees, >= 0).
    pub severity_deg: f64,
    /// Waypoint position at which the path turns.
    pub vertex: DVec3,
}

/// Bend ahead of the segment entered at `index`: the angle between that
/// segment and the one after it, vertexed at the shared waypoint. None
/// on paths too sparse to define two segments.
pub fn upcoming_bend(path: &WaypointPath, index: usize) -> Option<UpcomingBend> {
    let (i1, w1) = path.first_present_from(index)?;
    let (i2, w2) = path.first_present_from(path.wrap(i1 + 1))?;
    if i2 == i1 {
        return None;
    }
    let (i3, w3) = path.first_present_from(path.wrap(i2 + 1))?;
    if i3 == i1 || i3 == i2 {
        return None;
    }
    let entry = ground_dir(w2.position - w1.position);
    let exit = ground_dir(w3.position - w2.position);
    Some(UpcomingBend {
        severity_deg: signed_angle_y(entry, exit).abs().to_degrees(),
        vertex: w2.position,
    })
}

/// Short-horizon trajectory check: integrate the current motion with the
/// commanded steering and report whether any predicted point leaves the
/// safe interior of the surface.
pub fn predict_trajectory_unsafe(
    surface: &dyn SurfaceQuery,
    body: &VehicleBody,
    steer: f64,
    tunables: &ProfileTunables,
) -> bool {
    let speed = body.speed();
    if speed < 0.5 {
        return false;
    }
    let horizon = PREDICTION_BASE_SECS + speed / 20.0;
    let step = horizon / PREDICTION_STEPS as f64;
    let yaw_rate = steer * tunables.max_steer_angle_rad();

    let mut position = body.position;
    let mut yaw = body.yaw;
    for _ in 0..PREDICTION_STEPS {
        yaw += yaw_rate * step;
        position += rotate_y(DVec3::Z, yaw) * speed * step;
        let Some(on_surface) = surface.sample_position(position, SURFACE_SAMPLE_DIST) else {
            return true;
        };
        match surface.closest_edge(on_surface) {
            Some(edge) if edge.distance >= PREDICTION_SAFE_DIST => {}
            _ => return true,
        }
    }
    false
}
