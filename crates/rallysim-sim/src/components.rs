//! ECS components specific to the race world.
//!
//! Vehicle identity, body, spec, dynamics state, and the AI driver are
//! existing types used as components directly; only the control plumbing
//! lives here.

use rallysim_core::commands::ControlIntent;

/// The control intent a vehicle will apply at the next dynamics pass.
/// AI drivers overwrite it every tick; for human vehicles it holds the
/// last `SetIntent` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub intent: ControlIntent,
}

/// Marker for vehicles steered by external input rather than a `Driver`.
pub struct HumanControlled;
