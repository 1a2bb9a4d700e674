//! Driver-personality profiles.
//!
//! Consolidates per-profile tunables for the driving state machine.

use rallysim_core::enums::AiProfile;

/// Tunables resolved from a driver profile at spawn.
#[derive(Debug, Clone, Copy)]
pub struct ProfileTunables {
    /// Target speed on a straight (m/s).
    pub max_straight_speed: f64,
    /// Target speed through the sharpest corners (m/s).
    pub min_turn_speed: f64,
    /// Target-speed multiplier while overtaking.
    pub overtake_boost: f64,
    /// Steering authority the driver is willing to use (degrees).
    pub max_steer_angle_deg: f64,
    /// Lookahead distance per m/s of speed.
    pub lookahead_speed_factor: f64,
    /// Control-point bias of the two-point Bezier fallback; lower values
    /// cut corners tighter.
    pub bezier_inner_t: f64,
    /// Whether overtake candidates are projected through the current
    /// swerve heading instead of straight ahead.
    pub swerve_through_heading: bool,
}

impl ProfileTunables {
    pub fn max_steer_angle_rad(&self) -> f64 {
        self.max_steer_angle_deg.to_radians()
    }

    /// Overtake target speed, capped so a boost never runs away.
    pub fn overtake_speed(&self) -> f64 {
        (self.max_straight_speed * self.overtake_boost).min(self.max_straight_speed + 15.0)
    }
}

/// Get the tunables for a given profile.
pub fn get_profile(profile: AiProfile) -> ProfileTunables {
    match profile {
        AiProfile::Careful => ProfileTunables {
            max_straight_speed: 25.0,
            min_turn_speed: 10.0,
            overtake_boost: 1.2,
            max_steer_angle_deg: 40.0,
            lookahead_speed_factor: 0.7,
            bezier_inner_t: 0.4,
            swerve_through_heading: false,
        },
        AiProfile::Aggressive => ProfileTunables {
            max_straight_speed: 30.0,
            min_turn_speed: 12.0,
            overtake_boost: 1.3,
            max_steer_angle_deg: 50.0,
            lookahead_speed_factor: 0.8,
            bezier_inner_t: 0.2,
            swerve_through_heading: false,
        },
        AiProfile::Fast => ProfileTunables {
            max_straight_speed: 38.0,
            min_turn_speed: 15.0,
            overtake_boost: 1.5,
            max_steer_angle_deg: 55.0,
            lookahead_speed_factor: 0.9,
            bezier_inner_t: 0.15,
            swerve_through_heading: true,
        },
    }
}

/// Target speed for an upcoming bend of the given severity (degrees).
pub fn curve_target_speed(tunables: &ProfileTunables, severity_deg: f64) -> f64 {
    let severity = severity_deg.abs();
    if severity > 60.0 {
        tunables.min_turn_speed
    } else if severity > 40.0 {
        (tunables.min_turn_speed + tunables.max_straight_speed) * 0.5
    } else if severity > 20.0 {
        tunables.max_straight_speed * 0.85
    } else {
        tunables.max_straight_speed
    }
}
