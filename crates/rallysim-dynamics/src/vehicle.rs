//! Per-vehicle dynamics state and the integration step.
//!
//! A single-track (bicycle) model: velocity is split into forward and
//! lateral components in the body frame, drive and brake forces act on
//! the forward component, tire sideways stiffness bleeds the lateral
//! component, and yaw follows the kinematic rate for the current wheel
//! angle.

use serde::{Deserialize, Serialize};

use rallysim_core::commands::ControlIntent;
use rallysim_core::math::{move_toward, smooth_lerp};
use rallysim_core::query::SurfaceQuery;
use rallysim_core::types::VehicleBody;

use crate::braking;
use crate::gearbox::{Gearbox, FIRST_GEAR, NEUTRAL_GEAR, REVERSE_GEAR};
use crate::grip::{self, WheelFriction};
use crate::powertrain;
use crate::spec::CarSpec;
use crate::steering;

/// Yaw response rate toward the kinematic rate, scaled by sideways grip.
const YAW_RESPONSE_RATE: f64 = 4.0;

/// Lateral velocity decay rate per unit of sideways stiffness.
const LATERAL_DECAY_RATE: f64 = 3.0;

/// Below this forward speed full braking pins the car.
const STOP_SPEED: f64 = 0.5;

/// Mutable dynamics state carried between ticks for one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDynamics {
    pub gearbox: Gearbox,
    pub rpm: f64,
    friction: WheelFriction,
    last_grip: f64,
}

impl VehicleDynamics {
    pub fn new(spec: &CarSpec) -> Self {
        Self {
            gearbox: Gearbox::new(FIRST_GEAR),
            rpm: spec.idle_rpm,
            friction: grip::layout_friction(spec),
            last_grip: 1.0,
        }
    }

    pub fn gear_label(&self) -> String {
        match self.gearbox.current_gear {
            REVERSE_GEAR => "R".to_string(),
            NEUTRAL_GEAR => "N".to_string(),
            g => (g - NEUTRAL_GEAR).to_string(),
        }
    }

    /// Advance the vehicle by `dt` seconds under the given control intent.
    pub fn step(
        &mut self,
        spec: &CarSpec,
        body: &mut VehicleBody,
        intent: &ControlIntent,
        surface: &dyn SurfaceQuery,
        now: f64,
        dt: f64,
    ) {
        let intent = intent.clamped();
        let speed = body.speed();

        // Surface grip, holding the last known value off the ribbon.
        if let Some(area) = surface.area_and_cost(body.position) {
            self.last_grip = grip::surface_grip_multiplier(area.cost);
        }
        let base = if intent.handbrake {
            grip::handbrake_friction(spec, self.friction, speed)
        } else {
            self.friction
        };
        let friction = base.scaled(self.last_grip);

        // Transmission and engine.
        let mut gas = intent.gas;
        if spec.automatic {
            self.gearbox
                .update_automatic(spec, &mut self.rpm, &mut gas, intent.shift, now);
        } else {
            self.gearbox
                .update_manual(spec, &mut self.rpm, &mut body.velocity, intent.shift, now);
        }
        let torque = powertrain::calculate_torque(
            spec,
            self.gearbox.current_gear,
            &mut self.rpm,
            gas,
            speed,
            dt,
        );

        // Body-frame decomposition.
        let forward = body.forward();
        let right = body.right();
        let mut v_fwd = body.velocity.dot(forward);
        let mut v_lat = body.velocity.dot(right);

        // Drive force through the driven axle's forward stiffness.
        let drive_grip = self.driven_forward_grip(spec, &friction);
        let direction = if self.gearbox.in_reverse() { -1.0 } else { 1.0 };
        let drive_force = torque / spec.wheel_radius * direction * drive_grip;
        v_fwd += drive_force / spec.mass * dt;

        // Brakes, hand and foot.
        if intent.brake {
            let decel = braking::brake_deceleration(spec, friction.front.forward, friction.rear.forward);
            v_fwd = move_toward(v_fwd, 0.0, decel * dt);
            if v_fwd.abs() < STOP_SPEED && gas <= 0.0 {
                v_fwd = 0.0;
            }
        }
        if intent.handbrake {
            let decel = braking::handbrake_deceleration(spec, friction.rear.forward);
            v_fwd = move_toward(v_fwd, 0.0, decel * dt);
        }

        // Coasting losses.
        if gas <= 0.0 && !intent.brake {
            let engine_drag = if self.gearbox.in_neutral() {
                0.0
            } else {
                spec.engine_braking / spec.mass
            };
            let rolling = spec.rolling_resistance * v_fwd.abs();
            v_fwd = move_toward(v_fwd, 0.0, (engine_drag + rolling) * dt);
        }

        // Yaw follows the kinematic rate for the commanded wheel angle.
        let angle = steering::steer_angle(spec, intent.steer, speed, body.yaw_rate, intent.handbrake);
        let target_yaw_rate = if speed > 0.1 {
            v_fwd / spec.wheelbase * angle.tan()
        } else {
            0.0
        };
        let yaw_response = YAW_RESPONSE_RATE * friction.avg_sideways().clamp(0.2, 2.0);
        body.yaw_rate = smooth_lerp(body.yaw_rate, target_yaw_rate, yaw_response, dt);
        body.yaw += body.yaw_rate * dt;

        // Sideways stiffness bleeds lateral slip.
        let lateral_decay = LATERAL_DECAY_RATE * friction.avg_sideways();
        v_lat = move_toward(v_lat, 0.0, lateral_decay * v_lat.abs().max(0.5) * dt);

        // Recompose in the rotated frame and integrate position.
        let forward = body.forward();
        let right = body.right();
        body.velocity = forward * v_fwd + right * v_lat;
        body.position += body.velocity * dt;
    }

    /// Reset motion state after a teleport.
    pub fn reset(&mut self, spec: &CarSpec) {
        self.rpm = spec.idle_rpm;
        self.gearbox = Gearbox::new(FIRST_GEAR);
    }

    fn driven_forward_grip(&self, spec: &CarSpec, friction: &WheelFriction) -> f64 {
        use rallysim_core::enums::DrivetrainLayout;
        match spec.drivetrain {
            DrivetrainLayout::Front => friction.front.forward,
            DrivetrainLayout::Rear => friction.rear.forward,
            DrivetrainLayout::All => {
                (friction.front.forward + friction.rear.forward) * 0.5
            }
        }
    }
}
