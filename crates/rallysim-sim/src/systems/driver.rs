//! AI pass: evaluate every `Driver` and write its control intent.
//!
//! Runs before the dynamics pass so intents computed this tick are
//! applied this tick. Teleports requested by recovery backstops are
//! buffered and applied after the query ends to avoid aliasing the
//! world borrow.

use glam::DVec3;
use hecs::World;
use rand_chacha::ChaCha8Rng;

use rallysim_core::events::{Alert, RaceEvent};
use rallysim_core::types::{VehicleBody, VehicleId};
use rallysim_driver_ai::{Driver, DriverInput, TeleportRequest};
use rallysim_dynamics::{CarSpec, VehicleDynamics};
use rallysim_track::{ProbeScene, VehicleDisc};

use crate::components::Controls;
use crate::track::RaceTrack;

/// Build this tick's read-only spatial scene: every vehicle as a disc
/// plus the track's static obstacles.
pub fn build_scene(world: &World, track: &RaceTrack) -> ProbeScene {
    let mut scene = ProbeScene::new();
    for obstacle in track.obstacles() {
        scene.push_obstacle(*obstacle);
    }
    let mut query = world.query::<(&VehicleId, &VehicleBody)>();
    for (_entity, (id, body)) in query.iter() {
        scene.push_vehicle(VehicleDisc {
            id: *id,
            center: body.position,
            radius: body.width * 0.75,
        });
    }
    scene
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    track: &RaceTrack,
    scene: &ProbeScene,
    rng: &mut ChaCha8Rng,
    tick: u64,
    dt: f64,
    events: &mut Vec<RaceEvent>,
    alerts: &mut Vec<Alert>,
) {
    let mut teleports: Vec<(hecs::Entity, TeleportRequest)> = Vec::new();

    for (entity, (id, driver, body, spec, controls)) in world.query_mut::<(
        &VehicleId,
        &mut Driver,
        &VehicleBody,
        &CarSpec,
        &mut Controls,
    )>() {
        // Each driver probes a scene without its own disc in it.
        let probe = scene.excluding(*id);
        let input = DriverInput {
            body,
            spec,
            surface: track.surface(),
            probe: &probe,
            vehicles: scene,
            main_path: track.main_path(),
            joker_path: track.joker_path(),
            dt,
            tick,
        };
        let out = driver.tick(&input, rng);
        controls.intent = out.intent;
        events.extend(out.events);
        alerts.extend(out.alerts);
        if let Some(teleport) = out.teleport {
            teleports.push((entity, teleport));
        }
    }

    for (entity, teleport) in teleports {
        apply_teleport(world, entity, teleport);
    }
}

fn apply_teleport(world: &mut World, entity: hecs::Entity, teleport: TeleportRequest) {
    if let Ok(mut body) = world.get::<&mut VehicleBody>(entity) {
        body.position = teleport.position;
        body.yaw = teleport.yaw;
        body.velocity = DVec3::ZERO;
        body.yaw_rate = 0.0;
    }
    let spec = world.get::<&CarSpec>(entity).map(|s| s.clone()).ok();
    if let (Some(spec), Ok(mut dynamics)) = (spec, world.get::<&mut VehicleDynamics>(entity)) {
        dynamics.reset(&spec);
    }
}
