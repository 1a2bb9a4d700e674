//! The per-vehicle driving state machine.
//!
//! One `Driver` owns the AI state for one vehicle and is evaluated once
//! per tick: queries in, `ControlIntent` out. Cross-vehicle interaction
//! is read-only through the probe scene; a teleport is requested back to
//! the engine rather than applied here.

use glam::DVec3;
use rand::Rng;

use rallysim_core::commands::ControlIntent;
use rallysim_core::constants::*;
use rallysim_core::enums::{AiDrivingState, AiProfile, AlertLevel};
use rallysim_core::events::{Alert, RaceEvent};
use rallysim_core::math::{rotate_y, smooth_lerp};
use rallysim_core::path::WaypointPath;
use rallysim_core::query::{SpatialProbe, SurfaceQuery, VehicleLookup};
use rallysim_core::types::{VehicleBody, VehicleId};
use rallysim_dynamics::braking::braking_distance;
use rallysim_dynamics::CarSpec;

use crate::nav::NavState;
use crate::overtake::{self, OvertakeSide};
use crate::path_follow;
use crate::profiles::{self, ProfileTunables};
use crate::recovery::{self, RecoveryContext};
use crate::sensors;

/// Per-vehicle route parameters fixed at spawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteConfig {
    /// Main-path index at which a pending joker decision triggers.
    pub joker_entry_index: usize,
    /// Preferred main-path index to rejoin after the joker section.
    pub joker_rejoin_index: Option<usize>,
    /// Treat proximity to the surface edge as off-surface, not just
    /// leaving the surface entirely.
    pub strict_edge_recovery: bool,
}

/// Pose reset requested by the recovery backstop. The engine applies it
/// and zeroes the vehicle's linear and angular velocity.
#[derive(Debug, Clone, Copy)]
pub struct TeleportRequest {
    pub position: DVec3,
    pub yaw: f64,
}

/// Everything a driver reads during one tick.
pub struct DriverInput<'a> {
    pub body: &'a VehicleBody,
    pub spec: &'a CarSpec,
    pub surface: &'a dyn SurfaceQuery,
    pub probe: &'a dyn SpatialProbe,
    pub vehicles: &'a dyn VehicleLookup,
    pub main_path: &'a WaypointPath,
    pub joker_path: &'a WaypointPath,
    pub dt: f64,
    pub tick: u64,
}

/// Everything a driver produces during one tick.
#[derive(Debug, Clone, Default)]
pub struct DriverOutput {
    pub intent: ControlIntent,
    pub teleport: Option<TeleportRequest>,
    pub events: Vec<RaceEvent>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone)]
pub struct Driver {
    pub id: VehicleId,
    pub profile: AiProfile,
    pub state: AiDrivingState,
    pub nav: NavState,
    pub route: RouteConfig,
    tunables: ProfileTunables,
    smooth_steering: f64,
    gas_input: f64,
    brake_input: f64,
    target_speed: f64,
    overtake_target: Option<VehicleId>,
    recovery: Option<RecoveryContext>,
}

impl Driver {
    pub fn new(id: VehicleId, profile: AiProfile, route: RouteConfig) -> Self {
        Self {
            id,
            profile,
            state: AiDrivingState::Idle,
            nav: NavState::default(),
            route,
            tunables: profiles::get_profile(profile),
            smooth_steering: 0.0,
            gas_input: 0.0,
            brake_input: 0.0,
            target_speed: 0.0,
            overtake_target: None,
            recovery: None,
        }
    }

    pub fn overtake_target(&self) -> Option<VehicleId> {
        self.overtake_target
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    /// Evaluate one AI tick.
    pub fn tick(&mut self, input: &DriverInput, rng: &mut impl Rng) -> DriverOutput {
        let mut out = DriverOutput::default();

        let active = self.nav.active_path(input.main_path, input.joker_path);
        if active.first_present_from(0).is_none() {
            if !self.nav.warned_empty_path {
                self.nav.warned_empty_path = true;
                out.alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: format!("vehicle {} has no waypoints, driver idle", self.id.0),
                    tick: input.tick,
                });
            }
            self.state = AiDrivingState::Idle;
            self.hold_neutral();
            out.intent = self.build_intent();
            return out;
        }
        self.nav.warned_empty_path = false;

        let on_surface = self.on_surface(input);

        match self.state {
            AiDrivingState::Idle => {
                self.hold_neutral();
                if on_surface {
                    self.state = AiDrivingState::Driving;
                    self.drive(input, true, rng, &mut out);
                }
            }
            AiDrivingState::Driving => self.drive(input, on_surface, rng, &mut out),
            AiDrivingState::Overtaking => self.overtake(input, on_surface, rng, &mut out),
            AiDrivingState::Recovery => self.recover(input, on_surface, &mut out),
        }

        out.intent = self.build_intent();
        out
    }

    fn build_intent(&self) -> ControlIntent {
        ControlIntent {
            gas: self.gas_input.clamp(0.0, 1.0),
            steer: self.smooth_steering.clamp(-1.0, 1.0),
            brake: self.brake_input > BRAKE_ACTIVE_THRESHOLD,
            handbrake: false,
            shift: Default::default(),
        }
    }

    fn hold_neutral(&mut self) {
        self.gas_input = 0.0;
        self.brake_input = 0.0;
        self.smooth_steering = 0.0;
    }

    /// Both sides blocked or the candidate path unsafe: full brake, no
    /// gas, wheel centered, this exact tick.
    fn hold_and_brake(&mut self) {
        self.gas_input = 0.0;
        self.brake_input = 1.0;
        self.smooth_steering = 0.0;
    }

    fn on_surface(&self, input: &DriverInput) -> bool {
        let Some(on_surface) = input
            .surface
            .sample_position(input.body.position, ON_SURFACE_TOLERANCE)
        else {
            return false;
        };
        if !self.route.strict_edge_recovery {
            return true;
        }
        match input.surface.closest_edge(on_surface) {
            Some(edge) => edge.distance >= input.body.half_width() + EDGE_SAFETY_MARGIN,
            None => false,
        }
    }

    fn enter_recovery(&mut self, input: &DriverInput, out: &mut DriverOutput) {
        self.state = AiDrivingState::Recovery;
        self.overtake_target = None;
        self.recovery = Some(RecoveryContext::begin(
            input.surface,
            input.body,
            input.main_path,
            self.nav.last_valid_index,
        ));
        self.gas_input = 0.0;
        self.brake_input = 0.0;
        out.alerts.push(Alert {
            level: AlertLevel::Info,
            message: format!("vehicle {} left the surface, recovering", self.id.0),
            tick: input.tick,
        });
    }

    fn drive(
        &mut self,
        input: &DriverInput,
        on_surface: bool,
        rng: &mut impl Rng,
        out: &mut DriverOutput,
    ) {
        if !on_surface {
            self.enter_recovery(input, out);
            return;
        }

        let body = input.body;
        let range = sensors::dynamic_range(body.speed());
        let report = sensors::scan(input.probe, body, range);
        if report.any() {
            self.state = AiDrivingState::Overtaking;
            self.overtake_target = report.vehicle_hit.and_then(|hit| hit.vehicle);
            self.overtake(input, true, rng, out);
            return;
        }

        let active = self.nav.active_path(input.main_path, input.joker_path);
        let target = if self.nav.resolve_target(active).is_some() {
            path_follow::steering_target(
                input.surface,
                body,
                active,
                self.nav.current_index,
                &self.tunables,
            )
        } else {
            path_follow::fail_safe_target(input.surface, body, &self.tunables)
        };
        let raw_steer = path_follow::steer_command(body, target, &self.tunables);
        self.smooth_steering =
            smooth_lerp(self.smooth_steering, raw_steer, STEER_SMOOTH_RATE, input.dt);

        let bend = path_follow::upcoming_bend(active, self.nav.current_index);
        let severity = bend.map_or(0.0, |b| b.severity_deg);
        self.target_speed = profiles::curve_target_speed(&self.tunables, severity);

        let strength = self.braking_strength(input, severity, bend.map(|b| b.vertex));
        self.apply_brake(strength, input.dt);

        let desired_gas = if strength > BRAKE_ACTIVE_THRESHOLD {
            0.0
        } else {
            // Guard the near-zero-speed ratio so NaN never reaches the
            // control output.
            (self.target_speed / body.speed().max(1.0)).clamp(0.0, 1.0)
        };
        self.gas_input = smooth_lerp(self.gas_input, desired_gas, GAS_SMOOTH_RATE, input.dt);

        self.nav.advance_if_reached(
            self.id,
            body,
            input.main_path,
            input.joker_path,
            &self.route,
            on_surface,
            rng,
            &mut out.events,
        );
    }

    fn braking_strength(
        &self,
        input: &DriverInput,
        severity_deg: f64,
        bend_vertex: Option<DVec3>,
    ) -> f64 {
        let speed = input.body.speed();
        let angle_factor = (severity_deg / 90.0).clamp(0.0, 1.0);
        let speed_factor = (speed / self.tunables.max_straight_speed).clamp(0.0, 1.0);

        let mut strength = if severity_deg > 60.0 {
            (angle_factor * speed_factor * 1.5).clamp(0.0, 1.0)
        } else if severity_deg > 35.0 {
            (angle_factor * speed_factor).clamp(0.0, 0.6)
        } else {
            0.0
        };

        if path_follow::predict_trajectory_unsafe(
            input.surface,
            input.body,
            self.smooth_steering,
            &self.tunables,
        ) {
            strength = strength.max(0.7);
        }

        // If the car cannot shed enough speed before the bend, brake fully
        // now.
        if let Some(vertex) = bend_vertex {
            if speed > self.target_speed {
                let distance_to_bend = (vertex - input.body.position).length();
                if braking_distance(input.spec, speed - self.target_speed) > distance_to_bend {
                    strength = 1.0;
                }
            }
        }

        strength.clamp(0.0, 1.0)
    }

    fn apply_brake(&mut self, strength: f64, dt: f64) {
        if strength >= BRAKE_HARD_THRESHOLD {
            self.brake_input = strength;
        } else {
            self.brake_input = smooth_lerp(self.brake_input, strength, BRAKE_SMOOTH_RATE, dt);
        }
    }

    fn overtake(
        &mut self,
        input: &DriverInput,
        on_surface: bool,
        rng: &mut impl Rng,
        out: &mut DriverOutput,
    ) {
        if !on_surface {
            self.enter_recovery(input, out);
            return;
        }

        let body = input.body;
        let range = sensors::dynamic_range(body.speed());

        // Re-validate the held target; a despawned vehicle's lookup
        // returns none and the handle is dropped.
        if let Some(target_id) = self.overtake_target {
            let keep = input
                .vehicles
                .position(target_id)
                .map_or(false, |pos| overtake::target_still_valid(body, pos, range));
            if !keep {
                self.overtake_target = None;
            }
        }
        if self.overtake_target.is_none() {
            let report = sensors::scan(input.probe, body, range);
            self.overtake_target = report.vehicle_hit.and_then(|hit| hit.vehicle);
            if self.overtake_target.is_none() && report.static_hit.is_none() {
                self.state = AiDrivingState::Driving;
                self.drive(input, true, rng, out);
                return;
            }
        }

        match overtake::evaluate_side(input.probe, body, rng) {
            OvertakeSide::Blocked => {
                self.hold_and_brake();
                return;
            }
            side => {
                // The fast profile projects the candidate through its
                // current swerve heading instead of straight ahead.
                let heading = if self.tunables.swerve_through_heading {
                    rotate_y(
                        body.forward(),
                        self.smooth_steering * self.tunables.max_steer_angle_rad(),
                    )
                } else {
                    body.forward()
                };
                let sign = if side == OvertakeSide::Right { 1.0 } else { -1.0 };
                let lateral = rotate_y(heading, std::f64::consts::FRAC_PI_2);
                let candidate = body.position
                    + heading * OVERTAKE_AHEAD_DIST
                    + lateral * sign * overtake::side_clearance(body);
                let candidate =
                    path_follow::edge_clamp(input.surface, candidate, OVERTAKE_EDGE_CLAMP);

                let raw_steer = path_follow::steer_command(body, candidate, &self.tunables);
                if path_follow::predict_trajectory_unsafe(
                    input.surface,
                    body,
                    raw_steer,
                    &self.tunables,
                ) {
                    self.hold_and_brake();
                    return;
                }

                self.smooth_steering =
                    smooth_lerp(self.smooth_steering, raw_steer, OVERTAKE_STEER_RATE, input.dt);
                self.target_speed = self.tunables.overtake_speed();
                let desired_gas = (self.target_speed / body.speed().max(1.0)).clamp(0.0, 1.0);
                self.gas_input =
                    smooth_lerp(self.gas_input, desired_gas, OVERTAKE_GAS_RATE, input.dt);
                self.apply_brake(0.0, input.dt);
            }
        }

        self.nav.advance_if_reached(
            self.id,
            body,
            input.main_path,
            input.joker_path,
            &self.route,
            on_surface,
            rng,
            &mut out.events,
        );
    }

    fn recover(&mut self, input: &DriverInput, on_surface: bool, out: &mut DriverOutput) {
        if on_surface {
            self.recovery = None;
            self.state = AiDrivingState::Driving;
            self.hold_neutral();
            return;
        }

        let mut ctx = match self.recovery {
            Some(ctx) => ctx,
            // Recovery entered without context (e.g. restored state);
            // rebuild it.
            None => RecoveryContext::begin(
                input.surface,
                input.body,
                input.main_path,
                self.nav.last_valid_index,
            ),
        };
        ctx.timer += input.dt;

        if ctx.timer > MAX_RECOVERY_TIME {
            if let Some((position, yaw)) =
                recovery::teleport_pose(input.main_path, ctx.last_valid_index)
            {
                out.teleport = Some(TeleportRequest { position, yaw });
                out.alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: format!(
                        "vehicle {} recovery timed out, repositioned to waypoint {}",
                        self.id.0, ctx.last_valid_index
                    ),
                    tick: input.tick,
                });
                self.nav.current_index = input.main_path.wrap(ctx.last_valid_index + 1);
                self.nav.joker.is_taking = false;
                self.recovery = None;
                self.state = AiDrivingState::Driving;
                self.hold_neutral();
                return;
            }
            // No usable waypoint to land on; keep driving at the sampled
            // target instead of looping the timer.
            ctx.timer = 0.0;
        }

        self.smooth_steering = smooth_lerp(
            self.smooth_steering,
            ctx.steer_toward_target(input.body, self.tunables.max_steer_angle_rad()),
            STEER_SMOOTH_RATE,
            input.dt,
        );
        self.gas_input = RECOVERY_GAS;
        self.brake_input = 0.0;
        self.recovery = Some(ctx);
    }
}
