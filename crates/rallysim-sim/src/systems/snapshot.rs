//! Snapshot assembly: the complete externally visible race state.

use hecs::World;

use rallysim_core::enums::RacePhase;
use rallysim_core::events::{Alert, RaceEvent};
use rallysim_core::state::{RaceSnapshot, VehicleView};
use rallysim_core::types::{SimTime, VehicleBody, VehicleId};
use rallysim_driver_ai::Driver;
use rallysim_dynamics::VehicleDynamics;

pub fn build(
    world: &World,
    time: &SimTime,
    phase: RacePhase,
    events: Vec<RaceEvent>,
    alerts: Vec<Alert>,
) -> RaceSnapshot {
    let mut vehicles = Vec::new();

    let mut query =
        world.query::<(&VehicleId, &VehicleBody, &VehicleDynamics, Option<&Driver>)>();
    for (_entity, (id, body, dynamics, driver)) in query.iter() {
        vehicles.push(VehicleView {
            id: *id,
            position: body.position,
            yaw: body.yaw,
            speed: body.speed(),
            gear: dynamics.gear_label(),
            rpm: dynamics.rpm,
            profile: driver.map(|d| d.profile),
            ai_state: driver.map(|d| d.state),
            lap: driver.map(|d| d.nav.lap_count).unwrap_or(0),
            waypoint_index: driver.map(|d| d.nav.current_index).unwrap_or(0),
        });
    }
    // Stable display order regardless of archetype storage order.
    vehicles.sort_by_key(|v| v.id.0);

    RaceSnapshot {
        time: *time,
        phase,
        vehicles,
        events,
        alerts,
    }
}
