//! Spatial probe scene.
//!
//! Obstacles and vehicles are modeled as discs in the ground plane; the
//! probe tests are exact ray-vs-disc and oriented-box-vs-disc
//! intersections. The scene is rebuilt from the world each tick, so it
//! never holds stale vehicle positions. `excluding` yields a view that
//! ignores one vehicle, so a sensor never detects its own chassis.

use glam::DVec3;

use rallysim_core::query::{LayerMask, ProbeHit, ProbeLayer, SpatialProbe, VehicleLookup};
use rallysim_core::types::VehicleId;

/// Static collision disc on the obstacle layer.
#[derive(Debug, Clone, Copy)]
pub struct StaticObstacle {
    pub center: DVec3,
    pub radius: f64,
}

/// Per-tick collision disc for one vehicle.
#[derive(Debug, Clone, Copy)]
pub struct VehicleDisc {
    pub id: VehicleId,
    pub center: DVec3,
    pub radius: f64,
}

/// The queryable scene for one tick.
#[derive(Debug, Clone, Default)]
pub struct ProbeScene {
    obstacles: Vec<StaticObstacle>,
    vehicles: Vec<VehicleDisc>,
}

impl ProbeScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_obstacle(&mut self, obstacle: StaticObstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn push_vehicle(&mut self, disc: VehicleDisc) {
        self.vehicles.push(disc);
    }

    /// A probe view that ignores the given vehicle.
    pub fn excluding(&self, id: VehicleId) -> ScopedProbe<'_> {
        ScopedProbe {
            scene: self,
            exclude: id,
        }
    }

    fn cast(
        &self,
        origin: DVec3,
        dir: DVec3,
        probe_radius: f64,
        max_dist: f64,
        layers: LayerMask,
        exclude: Option<VehicleId>,
    ) -> Option<ProbeHit> {
        let dir = flatten_dir(dir)?;
        let mut best: Option<ProbeHit> = None;

        if layers.obstacle {
            for obstacle in &self.obstacles {
                if let Some(hit) = ray_disc(
                    origin,
                    dir,
                    obstacle.center,
                    obstacle.radius + probe_radius,
                    max_dist,
                ) {
                    take_closer(
                        &mut best,
                        ProbeHit {
                            point: hit.0,
                            distance: hit.1,
                            layer: ProbeLayer::Obstacle,
                            vehicle: None,
                        },
                    );
                }
            }
        }

        if layers.vehicle {
            for disc in &self.vehicles {
                if Some(disc.id) == exclude {
                    continue;
                }
                if let Some(hit) = ray_disc(
                    origin,
                    dir,
                    disc.center,
                    disc.radius + probe_radius,
                    max_dist,
                ) {
                    take_closer(
                        &mut best,
                        ProbeHit {
                            point: hit.0,
                            distance: hit.1,
                            layer: ProbeLayer::Vehicle,
                            vehicle: Some(disc.id),
                        },
                    );
                }
            }
        }

        best
    }

    fn box_overlap(
        &self,
        center: DVec3,
        half_extents: DVec3,
        yaw: f64,
        layers: LayerMask,
        exclude: Option<VehicleId>,
    ) -> bool {
        if layers.obstacle {
            for obstacle in &self.obstacles {
                if disc_box_overlap(obstacle.center, obstacle.radius, center, half_extents, yaw) {
                    return true;
                }
            }
        }
        if layers.vehicle {
            for disc in &self.vehicles {
                if Some(disc.id) == exclude {
                    continue;
                }
                if disc_box_overlap(disc.center, disc.radius, center, half_extents, yaw) {
                    return true;
                }
            }
        }
        false
    }
}

impl SpatialProbe for ProbeScene {
    fn raycast(
        &self,
        origin: DVec3,
        dir: DVec3,
        max_dist: f64,
        layers: LayerMask,
    ) -> Option<ProbeHit> {
        self.cast(origin, dir, 0.0, max_dist, layers, None)
    }

    fn sphere_cast(
        &self,
        origin: DVec3,
        radius: f64,
        dir: DVec3,
        max_dist: f64,
        layers: LayerMask,
    ) -> Option<ProbeHit> {
        self.cast(origin, dir, radius, max_dist, layers, None)
    }

    fn check_box(&self, center: DVec3, half_extents: DVec3, yaw: f64, layers: LayerMask) -> bool {
        self.box_overlap(center, half_extents, yaw, layers, None)
    }
}

impl VehicleLookup for ProbeScene {
    fn position(&self, id: VehicleId) -> Option<DVec3> {
        self.vehicles
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.center)
    }
}

/// Probe view of a scene that excludes one vehicle.
pub struct ScopedProbe<'a> {
    scene: &'a ProbeScene,
    exclude: VehicleId,
}

impl SpatialProbe for ScopedProbe<'_> {
    fn raycast(
        &self,
        origin: DVec3,
        dir: DVec3,
        max_dist: f64,
        layers: LayerMask,
    ) -> Option<ProbeHit> {
        self.scene
            .cast(origin, dir, 0.0, max_dist, layers, Some(self.exclude))
    }

    fn sphere_cast(
        &self,
        origin: DVec3,
        radius: f64,
        dir: DVec3,
        max_dist: f64,
        layers: LayerMask,
    ) -> Option<ProbeHit> {
        self.scene
            .cast(origin, dir, radius, max_dist, layers, Some(self.exclude))
    }

    fn check_box(&self, center: DVec3, half_extents: DVec3, yaw: f64, layers: LayerMask) -> bool {
        self.scene
            .box_overlap(center, half_extents, yaw, layers, Some(self.exclude))
    }
}

fn flatten_dir(dir: DVec3) -> Option<DVec3> {
    let flat = DVec3::new(dir.x, 0.0, dir.z);
    let len = flat.length();
    if len < 1e-9 {
        None
    } else {
        Some(flat / len)
    }
}

fn take_closer(best: &mut Option<ProbeHit>, candidate: ProbeHit) {
    match best {
        Some(current) if current.distance <= candidate.distance => {}
        _ => *best = Some(candidate),
    }
}

/// Ray vs disc in the XZ plane. Returns (hit point, distance along ray).
/// An origin inside the disc reports a hit at distance zero.
fn ray_disc(
    origin: DVec3,
    dir: DVec3,
    center: DVec3,
    radius: f64,
    max_dist: f64,
) -> Option<(DVec3, f64)> {
    let to_center = DVec3::new(center.x - origin.x, 0.0, center.z - origin.z);
    let along = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;

    if to_center.length_squared() <= radius_sq {
        return Some((origin, 0.0));
    }
    if along < 0.0 || closest_sq > radius_sq {
        return None;
    }
    let t = along - (radius_sq - closest_sq).sqrt();
    if t > max_dist {
        return None;
    }
    Some((origin + dir * t, t))
}

/// Disc vs oriented box in the XZ plane: transform the disc center into
/// the box frame, clamp to the half extents, compare the residual.
fn disc_box_overlap(
    disc_center: DVec3,
    disc_radius: f64,
    box_center: DVec3,
    half_extents: DVec3,
    yaw: f64,
) -> bool {
    let rel = disc_center - box_center;
    let local = rallysim_core::math::rotate_y(rel, -yaw);
    let dx = local.x.clamp(-half_extents.x, half_extents.x) - local.x;
    let dz = local.z.clamp(-half_extents.z, half_extents.z) - local.z;
    dx * dx + dz * dz <= disc_radius * disc_radius
}
