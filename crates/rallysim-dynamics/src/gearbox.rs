//! Gearbox state machine: Reverse(0) / Neutral(1) / Forward(2..N).
//!
//! Shifts are cooldown-gated to prevent gear hunting. Every shift drops
//! the engine RPM by a fixed ratio, simulating the rev change when the
//! clutch re-engages.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use rallysim_core::enums::ShiftIntent;

use crate::spec::CarSpec;

pub const REVERSE_GEAR: usize = 0;
pub const NEUTRAL_GEAR: usize = 1;
pub const FIRST_GEAR: usize = 2;

/// RPM retained after a shift (reference tunable).
pub const SHIFT_RPM_DROP: f64 = 0.7;

/// Throttle starts tapering this many RPM below the upshift threshold.
pub const UPSHIFT_TAPER_BAND: f64 = 100.0;

/// Velocity damp applied when first gear engages from neutral, avoiding
/// a torque jerk.
pub const FIRST_GEAR_VELOCITY_DAMP: f64 = 0.9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gearbox {
    pub current_gear: usize,
    last_shift_time: f64,
}

impl Gearbox {
    pub fn new(initial_gear: usize) -> Self {
        Self {
            current_gear: initial_gear,
            last_shift_time: f64::NEG_INFINITY,
        }
    }

    pub fn in_neutral(&self) -> bool {
        self.current_gear == NEUTRAL_GEAR
    }

    pub fn in_reverse(&self) -> bool {
        self.current_gear == REVERSE_GEAR
    }

    fn can_shift(&self, spec: &CarSpec, now: f64) -> bool {
        now - self.last_shift_time >= spec.shift_cooldown_secs
    }

    /// Manual upshift. Returns true if the gear changed.
    pub fn shift_up(
        &mut self,
        spec: &CarSpec,
        rpm: &mut f64,
        velocity: &mut DVec3,
        now: f64,
    ) -> bool {
        if !self.can_shift(spec, now) || self.current_gear >= spec.top_gear() {
            return false;
        }
        self.current_gear += 1;
        *rpm *= SHIFT_RPM_DROP;
        self.last_shift_time = now;
        if self.current_gear == FIRST_GEAR {
            *velocity *= FIRST_GEAR_VELOCITY_DAMP;
        }
        true
    }

    /// Manual downshift. Returns true if the gear changed.
    pub fn shift_down(&mut self, spec: &CarSpec, rpm: &mut f64, now: f64) -> bool {
        if !self.can_shift(spec, now) || self.current_gear == REVERSE_GEAR {
            return false;
        }
        self.current_gear -= 1;
        *rpm *= SHIFT_RPM_DROP;
        self.last_shift_time = now;
        true
    }

    /// Manual policy: each shift intent maps onto a single up or down
    /// shift through the whole gear range, cooldown permitting. RPM never
    /// triggers a shift on its own.
    pub fn update_manual(
        &mut self,
        spec: &CarSpec,
        rpm: &mut f64,
        velocity: &mut DVec3,
        intent: ShiftIntent,
        now: f64,
    ) {
        match intent {
            ShiftIntent::Up => {
                self.shift_up(spec, rpm, velocity, now);
            }
            ShiftIntent::Down => {
                self.shift_down(spec, rpm, now);
            }
            ShiftIntent::None => {}
        }
    }

    /// Automatic policy: shift intents cycle Reverse <-> Neutral <-> Drive,
    /// while RPM thresholds up/downshift within the forward gears. Gas is
    /// tapered just below the upshift threshold to smooth the shift.
    pub fn update_automatic(
        &mut self,
        spec: &CarSpec,
        rpm: &mut f64,
        gas: &mut f64,
        intent: ShiftIntent,
        now: f64,
    ) {
        if !self.can_shift(spec, now) {
            return;
        }

        match intent {
            ShiftIntent::Up => {
                if self.current_gear == REVERSE_GEAR {
                    self.current_gear = NEUTRAL_GEAR;
                    self.last_shift_time = now;
                } else if self.current_gear == NEUTRAL_GEAR {
                    self.current_gear = FIRST_GEAR;
                    self.last_shift_time = now;
                }
            }
            ShiftIntent::Down => {
                if self.current_gear > NEUTRAL_GEAR {
                    self.current_gear = NEUTRAL_GEAR;
                    self.last_shift_time = now;
                } else if self.current_gear == NEUTRAL_GEAR {
                    self.current_gear = REVERSE_GEAR;
                    self.last_shift_time = now;
                }
            }
            ShiftIntent::None => {}
        }

        // Taper throttle approaching the upshift point
        if self.current_gear > NEUTRAL_GEAR && *rpm >= spec.upshift_rpm - UPSHIFT_TAPER_BAND {
            let excess = (*rpm - (spec.upshift_rpm - UPSHIFT_TAPER_BAND)) / UPSHIFT_TAPER_BAND;
            *gas = gas.min((1.0 - excess * 0.7).clamp(0.0, 1.0));
        }

        if *rpm >= spec.upshift_rpm
            && self.current_gear >= FIRST_GEAR
            && self.current_gear < spec.top_gear()
        {
            self.current_gear += 1;
            *rpm *= SHIFT_RPM_DROP;
            self.last_shift_time = now;
        } else if *rpm <= spec.downshift_rpm && self.current_gear > FIRST_GEAR {
            self.current_gear -= 1;
            *rpm *= SHIFT_RPM_DROP;
            self.last_shift_time = now;
        }
    }
}
