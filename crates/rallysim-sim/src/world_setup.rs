//! World construction: vehicle spawning.

use glam::DVec3;
use hecs::World;

use rallysim_core::enums::AiProfile;
use rallysim_core::types::{VehicleBody, VehicleId};
use rallysim_driver_ai::{Driver, RouteConfig};
use rallysim_dynamics::{CarSpec, VehicleDynamics};

use crate::components::{Controls, HumanControlled};

/// Spawn an AI-controlled vehicle.
pub fn spawn_ai_vehicle(
    world: &mut World,
    id: VehicleId,
    profile: AiProfile,
    route: RouteConfig,
    spec: CarSpec,
    position: DVec3,
    yaw: f64,
) -> hecs::Entity {
    let body = VehicleBody::new(position, yaw, spec.mass, spec.width, spec.wheelbase);
    let dynamics = VehicleDynamics::new(&spec);
    let driver = Driver::new(id, profile, route);
    world.spawn((id, body, spec, dynamics, driver, Controls::default()))
}

/// Spawn a vehicle steered by external `SetIntent` commands.
pub fn spawn_human_vehicle(
    world: &mut World,
    id: VehicleId,
    spec: CarSpec,
    position: DVec3,
    yaw: f64,
) -> hecs::Entity {
    let body = VehicleBody::new(position, yaw, spec.mass, spec.width, spec.wheelbase);
    let dynamics = VehicleDynamics::new(&spec);
    world.spawn((id, body, spec, dynamics, HumanControlled, Controls::default()))
}
