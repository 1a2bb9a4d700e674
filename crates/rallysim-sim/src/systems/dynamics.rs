//! Physics pass: apply each vehicle's control intent through its
//! dynamics state.

use hecs::World;

use rallysim_core::types::VehicleBody;
use rallysim_dynamics::{CarSpec, VehicleDynamics};
use rallysim_track::TrackSurface;

use crate::components::Controls;

pub fn run(world: &mut World, surface: &TrackSurface, now: f64, dt: f64) {
    for (_entity, (body, spec, dynamics, controls)) in
        world.query_mut::<(&mut VehicleBody, &CarSpec, &mut VehicleDynamics, &Controls)>()
    {
        dynamics.step(spec, body, &controls.intent, surface, now, dt);
    }
}
