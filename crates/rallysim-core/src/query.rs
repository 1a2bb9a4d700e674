//! External query interfaces consumed by the core.
//!
//! The drivable-surface structure and the spatial scene are external
//! collaborators; these traits specify exactly the queries the AI and
//! dynamics need from them. All queries are read-only and fallible —
//! callers degrade to last-known-safe values when a query returns `None`.

use glam::DVec3;

use crate::enums::SurfaceKind;
use crate::types::VehicleId;

/// Result of a closest-edge query.
#[derive(Debug, Clone, Copy)]
pub struct EdgeHit {
    /// Nearest point on the surface boundary.
    pub edge_position: DVec3,
    /// In-plane distance from the queried point to that boundary point.
    pub distance: f64,
}

/// Result of an area/cost query.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceArea {
    pub kind: SurfaceKind,
    /// Traversal cost of the region (>= 1.0 in practice).
    pub cost: f64,
}

/// Queries against the drivable surface.
pub trait SurfaceQuery {
    /// Nearest on-surface point within `max_dist` of `pos`, if any.
    fn sample_position(&self, pos: DVec3, max_dist: f64) -> Option<DVec3>;

    /// Closest surface-boundary point to `pos`, if the surface is in reach.
    fn closest_edge(&self, pos: DVec3) -> Option<EdgeHit>;

    /// Surface region classification and traversal cost at `pos`.
    fn area_and_cost(&self, pos: DVec3) -> Option<SurfaceArea>;
}

/// Named collision layers for spatial probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask {
    pub obstacle: bool,
    pub vehicle: bool,
}

impl LayerMask {
    pub const OBSTACLE: LayerMask = LayerMask { obstacle: true, vehicle: false };
    pub const VEHICLE: LayerMask = LayerMask { obstacle: false, vehicle: true };
    pub const ALL: LayerMask = LayerMask { obstacle: true, vehicle: true };
}

/// Which layer a probe hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeLayer {
    Obstacle,
    Vehicle,
}

/// A single probe intersection.
#[derive(Debug, Clone, Copy)]
pub struct ProbeHit {
    pub point: DVec3,
    pub distance: f64,
    pub layer: ProbeLayer,
    /// Set when the hit collider is a vehicle.
    pub vehicle: Option<VehicleId>,
}

/// Ray/sphere/box intersection tests against the scene.
pub trait SpatialProbe {
    /// First hit along a ray, within `max_dist`.
    fn raycast(&self, origin: DVec3, dir: DVec3, max_dist: f64, layers: LayerMask)
        -> Option<ProbeHit>;

    /// Swept-sphere cast: like `raycast` but with a probe radius, catching
    /// colliders the discrete rays slip past.
    fn sphere_cast(
        &self,
        origin: DVec3,
        radius: f64,
        dir: DVec3,
        max_dist: f64,
        layers: LayerMask,
    ) -> Option<ProbeHit>;

    /// Whether an oriented box overlaps anything on the given layers.
    fn check_box(&self, center: DVec3, half_extents: DVec3, yaw: f64, layers: LayerMask) -> bool;
}

/// Read-only position lookup for vehicles, keyed by handle.
///
/// Returns `None` for a despawned vehicle; holders of a stale handle
/// clear it on lookup failure.
pub trait VehicleLookup {
    fn position(&self, id: VehicleId) -> Option<DVec3>;
}
