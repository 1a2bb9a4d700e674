//! Race snapshot — the complete visible state produced each tick for the
//! external UI/leaderboard collaborators.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AiDrivingState, AiProfile, RacePhase};
use crate::events::{Alert, RaceEvent};
use crate::types::{SimTime, VehicleId};

/// Complete race state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub time: SimTime,
    pub phase: RacePhase,
    pub vehicles: Vec<VehicleView>,
    pub events: Vec<RaceEvent>,
    pub alerts: Vec<Alert>,
}

/// One vehicle as shown on the external display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: VehicleId,
    pub position: DVec3,
    pub yaw: f64,
    /// Speed (m/s).
    pub speed: f64,
    /// Gear display label: "R", "N", or the forward gear number.
    pub gear: String,
    pub rpm: f64,
    /// AI profile, absent for human-controlled vehicles.
    pub profile: Option<AiProfile>,
    /// AI driving state, absent for human-controlled vehicles.
    pub ai_state: Option<AiDrivingState>,
    pub lap: u32,
    pub waypoint_index: usize,
}
