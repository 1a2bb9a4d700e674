//! Control intents and engine commands.
//!
//! Input sourcing (human or AI) is decoupled from the dynamics core: both
//! produce a `ControlIntent` that is handed into the tick, instead of the
//! dynamics polling any input device.

use serde::{Deserialize, Serialize};

use crate::enums::ShiftIntent;
use crate::types::VehicleId;

/// The complete control request for one vehicle for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlIntent {
    /// Throttle, clamped to [0, 1].
    pub gas: f64,
    /// Steering, clamped to [-1, 1].
    pub steer: f64,
    /// Service brake on/off.
    pub brake: bool,
    /// Handbrake (drift mode) on/off.
    pub handbrake: bool,
    /// Discrete gear-change request.
    pub shift: ShiftIntent,
}

impl ControlIntent {
    /// Returns the intent with gas and steer clamped to their valid ranges.
    /// The dynamics only ever sees clamped values.
    pub fn clamped(self) -> Self {
        Self {
            gas: self.gas.clamp(0.0, 1.0),
            steer: self.steer.clamp(-1.0, 1.0),
            ..self
        }
    }
}

/// Commands queued into the race engine, processed at the next tick
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RaceCommand {
    /// Begin the race.
    Start,
    /// Pause the simulation.
    Pause,
    /// Resume from pause.
    Resume,
    /// Set the time scale (1.0 = normal).
    SetTimeScale { scale: f64 },
    /// Provide the control intent for a human-controlled vehicle.
    /// Ignored for AI-controlled vehicles.
    SetIntent {
        vehicle: VehicleId,
        intent: ControlIntent,
    },
}
