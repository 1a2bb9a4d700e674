//! Core types and definitions for the RALLYSIM racing simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometric types, enums, constants, waypoint paths, events, control
//! intents, snapshot views, and the traits through which the core talks
//! to the track surface and spatial probes. It has no dependency on the
//! ECS or any runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod math;
pub mod path;
pub mod query;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
