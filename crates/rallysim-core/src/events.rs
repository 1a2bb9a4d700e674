//! Events emitted by the simulation for the external lap-timer and
//! leaderboard collaborators, plus the diagnostic alert queue.

use serde::{Deserialize, Serialize};

use crate::enums::AlertLevel;
use crate::types::VehicleId;

/// Race-progress events, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RaceEvent {
    /// A vehicle crossed the lap boundary on the main route.
    LapCompleted { vehicle: VehicleId, lap: u32 },
    /// A vehicle finished the joker route and rejoined the main path.
    JokerLapCompleted { vehicle: VehicleId, rejoin_index: usize },
    /// A vehicle advanced past a waypoint.
    WaypointReached { vehicle: VehicleId, index: usize },
    /// A vehicle completed the configured number of laps.
    RaceFinished { vehicle: VehicleId, laps: u32 },
}

/// Diagnostic signal for the external debug overlay. Degraded conditions
/// (empty path, recovery teleport) surface here; they never stop the tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
