//! Tire grip model.
//!
//! Grip is a product of a drivetrain-layout bias applied once at setup
//! and a per-tick multiplier from the surface traversal cost. The
//! handbrake swaps the balance toward the front to break the rear loose.

use serde::{Deserialize, Serialize};

use rallysim_core::constants::{GRIP_MAX, GRIP_MIN};
use rallysim_core::enums::DrivetrainLayout;

use crate::spec::CarSpec;

/// Friction stiffness of one axle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxleFriction {
    pub forward: f64,
    pub sideways: f64,
}

/// Friction stiffness of both axles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelFriction {
    pub front: AxleFriction,
    pub rear: AxleFriction,
}

impl WheelFriction {
    pub fn scaled(self, multiplier: f64) -> Self {
        Self {
            front: AxleFriction {
                forward: self.front.forward * multiplier,
                sideways: self.front.sideways * multiplier,
            },
            rear: AxleFriction {
                forward: self.rear.forward * multiplier,
                sideways: self.rear.sideways * multiplier,
            },
        }
    }

    pub fn avg_sideways(&self) -> f64 {
        (self.front.sideways + self.rear.sideways) * 0.5
    }
}

/// Layout bias applied once when the vehicle is set up: front-driven cars
/// gain front grip and shed rear grip (understeer), rear-driven the
/// inverse (oversteer), all-wheel stays balanced.
pub fn layout_friction(spec: &CarSpec) -> WheelFriction {
    let mut front = AxleFriction {
        forward: spec.forward_stiffness,
        sideways: spec.sideways_stiffness,
    };
    let mut rear = AxleFriction {
        forward: spec.forward_stiffness,
        sideways: spec.sideways_stiffness,
    };

    match spec.drivetrain {
        DrivetrainLayout::Front => {
            front.forward *= 1.2;
            front.sideways *= 1.1;
            rear.sideways *= 0.85;
        }
        DrivetrainLayout::Rear => {
            rear.forward *= 1.8;
            rear.sideways *= 0.9;
            front.sideways *= 1.3;
        }
        DrivetrainLayout::All => {
            front.forward *= 1.1;
            rear.forward *= 1.1;
        }
    }

    WheelFriction { front, rear }
}

/// Surface multiplier: higher traversal cost means less grip.
pub fn surface_grip_multiplier(cost: f64) -> f64 {
    if !cost.is_finite() || cost <= 0.0 {
        return GRIP_MAX;
    }
    (1.0 / cost).clamp(GRIP_MIN, GRIP_MAX)
}

/// Drift-mode friction while the handbrake is held: the rear sideways
/// stiffness collapses (more so at speed), the front stiffens for turn-in.
pub fn handbrake_friction(spec: &CarSpec, base: WheelFriction, speed: f64) -> WheelFriction {
    let speed_effect = (speed / 80.0).clamp(0.0, 1.0);
    WheelFriction {
        front: AxleFriction {
            forward: base.front.forward,
            sideways: 1.2,
        },
        rear: AxleFriction {
            forward: base.rear.forward,
            sideways: 0.4 * spec.grip_reduction_factor * (1.0 - speed_effect * 0.5),
        },
    }
}
