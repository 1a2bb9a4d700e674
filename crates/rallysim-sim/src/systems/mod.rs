//! Per-tick passes over the race world.
//!
//! Each system is a function taking `&mut World` (or `&World` for
//! read-only passes); state lives in components and in the engine.

pub mod driver;
pub mod dynamics;
pub mod snapshot;
