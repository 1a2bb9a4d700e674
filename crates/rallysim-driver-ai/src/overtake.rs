//! Overtake side selection.
//!
//! Probed fresh every tick rather than cached: the gap that was open
//! when the overtake began may have closed.

use glam::DVec3;
use rand::Rng;

use rallysim_core::constants::{OVERTAKE_FORWARD_CHECK, OVERTAKE_RELEASE_FACTOR};
use rallysim_core::query::{LayerMask, SpatialProbe};
use rallysim_core::types::VehicleBody;

/// Outcome of the side evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvertakeSide {
    Left,
    Right,
    /// Neither side is clear; hold position and brake.
    Blocked,
}

/// Lateral offset magnitude of the side probe positions.
pub fn side_clearance(body: &VehicleBody) -> f64 {
    body.width * 1.5
}

/// Probe both sides of the vehicle and pick a passing side.
pub fn evaluate_side(
    probe: &dyn SpatialProbe,
    body: &VehicleBody,
    rng: &mut impl Rng,
) -> OvertakeSide {
    let right = body.right();
    let clearance = side_clearance(body);
    let left_pos = body.position - right * clearance;
    let right_pos = body.position + right * clearance;

    let left_clear = side_is_clear(probe, body, left_pos);
    let right_clear = side_is_clear(probe, body, right_pos);

    match (left_clear, right_clear) {
        (true, false) => OvertakeSide::Left,
        (false, true) => OvertakeSide::Right,
        (false, false) => OvertakeSide::Blocked,
        (true, true) => {
            // Both open: prefer the longer forward clearance, coin-flip a
            // near tie so trains of AI cars split around slow traffic.
            let left_room = forward_clearance(probe, body, left_pos);
            let right_room = forward_clearance(probe, body, right_pos);
            let tied = (left_room.is_infinite() && right_room.is_infinite())
                || (left_room - right_room).abs() < 0.5;
            if tied {
                if rng.gen_bool(0.5) {
                    OvertakeSide::Left
                } else {
                    OvertakeSide::Right
                }
            } else if left_room > right_room {
                OvertakeSide::Left
            } else {
                OvertakeSide::Right
            }
        }
    }
}

fn side_is_clear(probe: &dyn SpatialProbe, body: &VehicleBody, side_pos: DVec3) -> bool {
    let half_extents = DVec3::new(body.half_width(), 1.0, 3.0);
    if probe.check_box(side_pos, half_extents, body.yaw, LayerMask::ALL) {
        return false;
    }
    probe
        .raycast(side_pos, body.forward(), OVERTAKE_FORWARD_CHECK, LayerMask::ALL)
        .is_none()
}

fn forward_clearance(probe: &dyn SpatialProbe, body: &VehicleBody, side_pos: DVec3) -> f64 {
    probe
        .raycast(side_pos, body.forward(), OVERTAKE_FORWARD_CHECK * 2.0, LayerMask::ALL)
        .map_or(f64::INFINITY, |hit| hit.distance)
}

/// Whether a held target is still worth chasing: ahead of the vehicle and
/// inside the release radius.
pub fn target_still_valid(body: &VehicleBody, target_pos: DVec3, detection_range: f64) -> bool {
    let offset = target_pos - body.position;
    let ahead = body.forward().dot(offset) > 0.0;
    ahead && offset.length() <= detection_range * OVERTAKE_RELEASE_FACTOR
}
