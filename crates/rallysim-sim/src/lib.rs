//! Race simulation engine for RALLYSIM.
//!
//! Owns the hecs ECS world, runs the AI and dynamics passes at a fixed
//! tick rate, and produces `RaceSnapshot`s for the external UI and
//! leaderboard collaborators.

pub mod components;
pub mod engine;
pub mod systems;
pub mod track;
pub mod world_setup;

pub use rallysim_core as core;
pub use engine::{RaceConfig, RaceEngine};
pub use track::RaceTrack;

#[cfg(test)]
mod tests;
