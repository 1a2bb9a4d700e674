//! Per-model vehicle tuning record.
//!
//! Loaded from external configuration in a full game; the defaults here
//! are the reference tunables every test builds on.

use serde::{Deserialize, Serialize};

use rallysim_core::enums::DrivetrainLayout;

/// Static specification of one car model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarSpec {
    /// Vehicle mass (kg).
    pub mass: f64,
    /// Chassis width (m).
    pub width: f64,
    /// Axle distance (m).
    pub wheelbase: f64,
    /// Wheel radius (m).
    pub wheel_radius: f64,

    /// Peak motor torque reference (N·m).
    pub motor_power: f64,
    /// Maximum front-wheel steering angle (degrees).
    pub max_steer_angle_deg: f64,
    /// Total service-brake force (N).
    pub brake_force: f64,
    /// Handbrake force on the rear axle (N).
    pub handbrake_force: f64,
    /// Rolling-resistance coefficient (force per m/s of speed).
    pub rolling_resistance: f64,
    /// Engine-braking force reference (N).
    pub engine_braking: f64,

    /// Idle RPM.
    pub idle_rpm: f64,
    /// Automatic gearbox upshift threshold (RPM).
    pub upshift_rpm: f64,
    /// Automatic gearbox downshift threshold (RPM).
    pub downshift_rpm: f64,
    /// Redline (RPM).
    pub redline: f64,
    /// Final drive ratio.
    pub differential_ratio: f64,
    /// Gear ratio table: index 0 = reverse, 1 = neutral, 2.. = forward.
    pub gear_ratios: Vec<f64>,
    /// Minimum time between gear shifts (s).
    pub shift_cooldown_secs: f64,
    /// Whether the gearbox shifts automatically.
    pub automatic: bool,

    /// Baseline forward friction stiffness.
    pub forward_stiffness: f64,
    /// Baseline sideways friction stiffness.
    pub sideways_stiffness: f64,
    /// Which axles are driven.
    pub drivetrain: DrivetrainLayout,
    /// Counter-steer assist gain while drifting.
    pub drift_steer_assist: f64,
    /// Rear grip reduction factor under handbrake.
    pub grip_reduction_factor: f64,

    /// Torque multiplier at standstill (traction-limited launch).
    pub low_speed_accel_multiplier: f64,
    /// Torque multiplier at the speed cap (aero/gearing limited).
    pub high_speed_accel_multiplier: f64,
}

impl Default for CarSpec {
    fn default() -> Self {
        Self {
            mass: 1200.0,
            width: 1.8,
            wheelbase: 2.6,
            wheel_radius: 0.34,
            motor_power: 500.0,
            max_steer_angle_deg: 30.0,
            brake_force: 12_000.0,
            handbrake_force: 9_000.0,
            rolling_resistance: 0.1,
            engine_braking: 50.0,
            idle_rpm: 900.0,
            upshift_rpm: 6000.0,
            downshift_rpm: 2500.0,
            redline: 7000.0,
            differential_ratio: 3.5,
            gear_ratios: vec![-3.5, 0.0, 3.5, 2.1, 1.4, 1.0, 0.8, 0.7],
            shift_cooldown_secs: 0.5,
            automatic: true,
            forward_stiffness: 1.2,
            sideways_stiffness: 0.8,
            drivetrain: DrivetrainLayout::Rear,
            drift_steer_assist: 0.5,
            grip_reduction_factor: 0.6,
            low_speed_accel_multiplier: 1.5,
            high_speed_accel_multiplier: 0.7,
        }
    }
}

impl CarSpec {
    /// Gear ratio at `gear`, clamped into the table.
    pub fn gear_ratio(&self, gear: usize) -> f64 {
        let index = gear.min(self.gear_ratios.len() - 1);
        self.gear_ratios[index]
    }

    /// Highest valid gear index.
    pub fn top_gear(&self) -> usize {
        self.gear_ratios.len() - 1
    }

    pub fn max_steer_angle_rad(&self) -> f64 {
        self.max_steer_angle_deg.to_radians()
    }
}
