//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Named tunable set governing an AI vehicle's aggressiveness.
/// Assigned at spawn, immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiProfile {
    /// Conservative speeds, wide lines.
    #[default]
    Careful,
    /// Faster, tighter lines, earlier overtakes.
    Aggressive,
    /// Pro-like: highest speeds, swerves through its current heading
    /// while overtaking instead of probing straight ahead.
    Fast,
}

/// Driving state of an AI vehicle. Exactly one active per vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiDrivingState {
    /// Waiting until the spawn position is confirmed on the surface.
    #[default]
    Idle,
    /// Normal path following.
    Driving,
    /// A blocking vehicle or obstacle ahead is being negotiated.
    Overtaking,
    /// Off the drivable surface, navigating back (bounded by a timeout).
    Recovery,
}

/// Which axles receive engine torque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivetrainLayout {
    /// Front-wheel drive: understeer bias.
    Front,
    /// Rear-wheel drive: oversteer bias.
    #[default]
    Rear,
    /// All-wheel drive: balanced, 50/50 torque split.
    All,
}

/// Discrete gear-change request carried in a control intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftIntent {
    #[default]
    None,
    Up,
    Down,
}

/// Surface region classification. Each kind carries a traversal cost that
/// the grip model inverts into a grip multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Asphalt,
    Dirt,
    Gravel,
    Mud,
}

impl SurfaceKind {
    /// Traversal cost (1.0 = full grip reference).
    pub fn traversal_cost(self) -> f64 {
        match self {
            SurfaceKind::Asphalt => 1.0,
            SurfaceKind::Dirt => 1.5,
            SurfaceKind::Gravel => 2.0,
            SurfaceKind::Mud => 3.0,
        }
    }
}

/// Race lifecycle phase (top-level engine state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    #[default]
    Setup,
    Running,
    Paused,
    Finished,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
