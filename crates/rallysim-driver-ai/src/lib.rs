//! AI driver for RALLYSIM.
//!
//! A per-vehicle state machine (Idle / Driving / Overtaking / Recovery)
//! that turns track and scene queries into a `ControlIntent` each tick.
//! Operates on plain data through the query traits in `rallysim-core`;
//! no simulation-engine dependency.

pub mod driver;
pub mod nav;
pub mod overtake;
pub mod path_follow;
pub mod profiles;
pub mod recovery;
pub mod sensors;

pub use driver::{Driver, DriverInput, DriverOutput, RouteConfig, TeleportRequest};
pub use profiles::{get_profile, ProfileTunables};
