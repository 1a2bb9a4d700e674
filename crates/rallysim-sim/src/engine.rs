//! Race engine.
//!
//! `RaceEngine` owns the hecs world and all race state, processes queued
//! commands at tick boundaries, runs the AI pass then the physics pass,
//! and produces `RaceSnapshot`s. Completely headless, enabling
//! deterministic testing: the same seed and command sequence replays the
//! same race.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rallysim_core::commands::RaceCommand;
use rallysim_core::constants::DT;
use rallysim_core::enums::{AiProfile, RacePhase};
use rallysim_core::events::{Alert, RaceEvent};
use rallysim_core::state::RaceSnapshot;
use rallysim_core::types::{SimTime, VehicleId};
use rallysim_driver_ai::Driver;
use rallysim_dynamics::CarSpec;

use crate::components::{Controls, HumanControlled};
use crate::systems;
use crate::track::RaceTrack;
use crate::world_setup;

/// Configuration for a new race.
pub struct RaceConfig {
    /// RNG seed for determinism. Same seed = same race.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Laps required to finish.
    pub total_laps: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            total_laps: 3,
        }
    }
}

/// The race engine. Owns the ECS world and all race state.
pub struct RaceEngine {
    world: World,
    time: SimTime,
    phase: RacePhase,
    time_scale: f64,
    total_laps: u32,
    rng: ChaCha8Rng,
    command_queue: VecDeque<RaceCommand>,
    events: Vec<RaceEvent>,
    alerts: Vec<Alert>,
    finished: Vec<VehicleId>,
    next_vehicle: u32,
    track: RaceTrack,
}

impl RaceEngine {
    pub fn new(config: RaceConfig, track: RaceTrack) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: RacePhase::default(),
            time_scale: config.time_scale,
            total_laps: config.total_laps,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            finished: Vec::new(),
            next_vehicle: 0,
            track,
        }
    }

    /// Add an AI vehicle on the next grid slot. Valid during Setup.
    pub fn spawn_ai(&mut self, profile: AiProfile) -> VehicleId {
        let id = self.allocate_id();
        let slot = (id.0) as usize;
        let (position, yaw) = self.track.grid_pose(slot);
        world_setup::spawn_ai_vehicle(
            &mut self.world,
            id,
            profile,
            self.track.route(),
            CarSpec::default(),
            position,
            yaw,
        );
        id
    }

    /// Add a human-controlled vehicle on the next grid slot.
    pub fn spawn_human(&mut self) -> VehicleId {
        let id = self.allocate_id();
        let slot = (id.0) as usize;
        let (position, yaw) = self.track.grid_pose(slot);
        world_setup::spawn_human_vehicle(
            &mut self.world,
            id,
            CarSpec::default(),
            position,
            yaw,
        );
        id
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: RaceCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the race by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> RaceSnapshot {
        self.process_commands();

        if self.phase == RacePhase::Running {
            self.run_systems();
            self.time.advance(DT * self.time_scale);
        }

        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build(&self.world, &self.time, self.phase, events, alerts)
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn track(&self) -> &RaceTrack {
        &self.track
    }

    /// Move a vehicle to an arbitrary pose and force its driver into the
    /// race (for recovery testing).
    #[cfg(test)]
    pub fn displace_vehicle(&mut self, id: VehicleId, position: glam::DVec3) {
        use rallysim_core::enums::AiDrivingState;
        use rallysim_core::types::VehicleBody;

        for (_entity, (vid, body)) in self.world.query_mut::<(&VehicleId, &mut VehicleBody)>() {
            if *vid == id {
                body.position = position;
                body.velocity = glam::DVec3::ZERO;
            }
        }
        for (_entity, (vid, driver)) in self.world.query_mut::<(&VehicleId, &mut Driver)>() {
            if *vid == id {
                driver.state = AiDrivingState::Driving;
            }
        }
    }

    fn allocate_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_vehicle);
        self.next_vehicle += 1;
        id
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: RaceCommand) {
        match command {
            RaceCommand::Start => {
                if self.phase == RacePhase::Setup {
                    self.phase = RacePhase::Running;
                    self.time = SimTime::default();
                }
            }
            RaceCommand::Pause => {
                if self.phase == RacePhase::Running {
                    self.phase = RacePhase::Paused;
                }
            }
            RaceCommand::Resume => {
                if self.phase == RacePhase::Paused {
                    self.phase = RacePhase::Running;
                }
            }
            RaceCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            RaceCommand::SetIntent { vehicle, intent } => {
                for (_entity, (id, _human, controls)) in self
                    .world
                    .query_mut::<(&VehicleId, &HumanControlled, &mut Controls)>()
                {
                    if *id == vehicle {
                        controls.intent = intent.clamped();
                    }
                }
            }
        }
    }

    fn run_systems(&mut self) {
        let dt = DT * self.time_scale;

        // 1. AI decisions, consumed by the physics pass this same tick.
        let scene = systems::driver::build_scene(&self.world, &self.track);
        systems::driver::run(
            &mut self.world,
            &self.track,
            &scene,
            &mut self.rng,
            self.time.tick,
            dt,
            &mut self.events,
            &mut self.alerts,
        );
        // 2. Dynamics integration.
        systems::dynamics::run(
            &mut self.world,
            self.track.surface(),
            self.time.elapsed_secs,
            dt,
        );
        // 3. Race completion.
        self.check_completion();
    }

    fn check_completion(&mut self) {
        let mut finishers = Vec::new();
        {
            let mut query = self.world.query::<(&VehicleId, &Driver)>();
            for (_entity, (id, driver)) in query.iter() {
                if driver.nav.lap_count >= self.total_laps && !self.finished.contains(id) {
                    finishers.push((*id, driver.nav.lap_count));
                }
            }
        }
        for (id, laps) in finishers {
            self.finished.push(id);
            self.events.push(RaceEvent::RaceFinished { vehicle: id, laps });
            self.phase = RacePhase::Finished;
        }
    }
}
