//! Off-surface recovery.
//!
//! The recovery target is sampled once when the state is entered and
//! held; re-sampling every tick lets the target wander and the vehicle
//! orbit it. A bounded timer backstops the whole state with a teleport.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use rallysim_core::constants::RECOVERY_SAMPLE_RADIUS;
use rallysim_core::math::signed_angle_y;
use rallysim_core::path::WaypointPath;
use rallysim_core::query::SurfaceQuery;
use rallysim_core::types::VehicleBody;

/// Present only while the driver is in the Recovery state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecoveryContext {
    pub timer: f64,
    pub target: DVec3,
    pub last_valid_index: usize,
}

impl RecoveryContext {
    /// Begin recovery toward the nearest on-surface point, falling back
    /// to the last validated waypoint when no surface is in reach.
    pub fn begin(
        surface: &dyn SurfaceQuery,
        body: &VehicleBody,
        path: &WaypointPath,
        last_valid_index: usize,
    ) -> Self {
        let fallback = path
            .get(last_valid_index)
            .map(|wp| wp.position)
            .unwrap_or(body.position);
        let target = surface
            .sample_position(body.position, RECOVERY_SAMPLE_RADIUS)
            .unwrap_or(fallback);
        Self {
            timer: 0.0,
            target,
            last_valid_index,
        }
    }

    /// Steering toward the held target, normalized by `max_angle_rad`.
    pub fn steer_toward_target(&self, body: &VehicleBody, max_angle_rad: f64) -> f64 {
        let offset = self.target - body.position;
        if DVec3::new(offset.x, 0.0, offset.z).length_squared() < 1e-9 {
            return 0.0;
        }
        let error = signed_angle_y(body.forward(), offset);
        (error / max_angle_rad).clamp(-1.0, 1.0)
    }
}

/// Pose for the teleport backstop: the last validated waypoint, heading
/// at the next present one.
pub fn teleport_pose(path: &WaypointPath, last_valid_index: usize) -> Option<(DVec3, f64)> {
    let (index, waypoint) = path.first_present_from(last_valid_index)?;
    let yaw = match path.first_present_from(path.wrap(index + 1)) {
        Some((next_index, next)) if next_index != index => {
            let dir = next.position - waypoint.position;
            dir.x.atan2(dir.z)
        }
        _ => waypoint.yaw,
    };
    Some((waypoint.position, yaw))
}
