//! Fundamental geometric and simulation types.
//!
//! World space is Y-up with the XZ plane as the ground. Yaw is measured so
//! that a vehicle with yaw 0 faces +Z and positive yaw turns toward +X.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` simulated seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Non-owning handle to a vehicle in the race.
///
/// Used wherever one vehicle refers to another (probe hits, the overtake
/// target, race events). Holders must tolerate the referenced vehicle
/// disappearing: a failed lookup means the handle is stale, not a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

/// Rigid-body state of one vehicle, owned by the physics pass.
///
/// The AI reads this through a shared reference and never mutates it
/// directly; all motion goes through the dynamics integration (or a
/// recovery teleport applied by the engine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleBody {
    /// World position (meters).
    pub position: DVec3,
    /// Heading angle around +Y (radians).
    pub yaw: f64,
    /// Linear velocity (m/s).
    pub velocity: DVec3,
    /// Angular velocity around +Y (rad/s).
    pub yaw_rate: f64,
    /// Vehicle mass (kg).
    pub mass: f64,
    /// Track width of the chassis (meters).
    pub width: f64,
    /// Distance between axles (meters).
    pub wheelbase: f64,
}

impl VehicleBody {
    pub fn new(position: DVec3, yaw: f64, mass: f64, width: f64, wheelbase: f64) -> Self {
        Self {
            position,
            yaw,
            velocity: DVec3::ZERO,
            yaw_rate: 0.0,
            mass,
            width,
            wheelbase,
        }
    }

    /// Unit forward vector on the ground plane.
    pub fn forward(&self) -> DVec3 {
        DVec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Unit right-hand vector on the ground plane.
    pub fn right(&self) -> DVec3 {
        DVec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Half the chassis width, used by edge-safety checks.
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }
}
