//! Forward obstacle sensing.
//!
//! Two independent probes, both range-scaled by speed: a narrow ray cone
//! against static obstacles and a wider cone against vehicles with a
//! swept-sphere fallback for cars the discrete rays slip past on curves.

use rallysim_core::constants::*;
use rallysim_core::math::rotate_y;
use rallysim_core::query::{LayerMask, ProbeHit, ProbeLayer, SpatialProbe};
use rallysim_core::types::VehicleBody;

/// What the forward probes saw this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorReport {
    pub static_hit: Option<ProbeHit>,
    pub vehicle_hit: Option<ProbeHit>,
}

impl SensorReport {
    pub fn any(&self) -> bool {
        self.static_hit.is_some() || self.vehicle_hit.is_some()
    }
}

/// Detection range at the given speed.
pub fn dynamic_range(speed: f64) -> f64 {
    BASE_OBSTACLE_RANGE + speed * RANGE_SPEED_FACTOR
}

/// Sweep both cones ahead of the vehicle.
pub fn scan(probe: &dyn SpatialProbe, body: &VehicleBody, range: f64) -> SensorReport {
    SensorReport {
        static_hit: cone(
            probe,
            body,
            range,
            STATIC_CONE_RAYS,
            STATIC_CONE_ANGLE,
            LayerMask::OBSTACLE,
        ),
        vehicle_hit: vehicle_probe(probe, body, range),
    }
}

fn cone(
    probe: &dyn SpatialProbe,
    body: &VehicleBody,
    range: f64,
    rays: usize,
    spread: f64,
    layers: LayerMask,
) -> Option<ProbeHit> {
    let mut nearest: Option<ProbeHit> = None;
    for i in 0..rays {
        // Rays fan evenly from -spread/2 to +spread/2.
        let t = if rays > 1 {
            i as f64 / (rays - 1) as f64
        } else {
            0.5
        };
        let angle = (t - 0.5) * spread;
        let dir = rotate_y(body.forward(), angle);
        if let Some(hit) = probe.raycast(body.position, dir, range, layers) {
            if nearest.map_or(true, |n| hit.distance < n.distance) {
                nearest = Some(hit);
            }
        }
    }
    nearest
}

fn vehicle_probe(probe: &dyn SpatialProbe, body: &VehicleBody, range: f64) -> Option<ProbeHit> {
    let cone_hit = cone(
        probe,
        body,
        range,
        VEHICLE_CONE_RAYS,
        VEHICLE_CONE_ANGLE,
        LayerMask::VEHICLE,
    );
    if cone_hit.is_some() {
        return cone_hit;
    }
    probe
        .sphere_cast(
            body.position,
            VEHICLE_SPHERE_RADIUS,
            body.forward(),
            range,
            LayerMask::VEHICLE,
        )
        .filter(|hit| hit.layer == ProbeLayer::Vehicle)
}
