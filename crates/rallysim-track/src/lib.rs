//! Track geometry for RALLYSIM.
//!
//! Provides the concrete collaborators behind the core's query traits:
//! a ribbon-shaped drivable surface built from a closed centerline, and
//! a probe scene of obstacle and vehicle discs for the AI's sensors.

pub mod probe;
pub mod surface;

pub use probe::{ProbeScene, StaticObstacle, VehicleDisc};
pub use surface::{oval_centerline, TrackSurface};

#[cfg(test)]
mod tests;
