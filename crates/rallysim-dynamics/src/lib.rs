//! Vehicle dynamics for RALLYSIM.
//!
//! Owns the drivetrain (gearbox, torque, RPM), the surface-dependent
//! grip model, steering shaping, and the arcade rigid-body integration
//! that turns control intents into motion. Consumed by the driver AI
//! (braking distances, vehicle state) and driven by it (control intents).

pub mod braking;
pub mod gearbox;
pub mod grip;
pub mod powertrain;
pub mod spec;
pub mod steering;
pub mod vehicle;

pub use spec::CarSpec;
pub use vehicle::VehicleDynamics;

#[cfg(test)]
mod tests;
