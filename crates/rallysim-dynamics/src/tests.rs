use glam::DVec3;

use rallysim_core::commands::ControlIntent;
use rallysim_core::constants::DT;
use rallysim_core::enums::{DrivetrainLayout, ShiftIntent};
use rallysim_core::types::VehicleBody;

use rallysim_track::TrackSurface;

use crate::braking;
use crate::gearbox::{Gearbox, FIRST_GEAR, NEUTRAL_GEAR, REVERSE_GEAR, SHIFT_RPM_DROP};
use crate::grip;
use crate::powertrain;
use crate::spec::CarSpec;
use crate::steering;
use crate::vehicle::VehicleDynamics;

fn spec() -> CarSpec {
    CarSpec::default()
}

fn body_at(position: DVec3, yaw: f64) -> VehicleBody {
    let s = spec();
    VehicleBody::new(position, yaw, s.mass, s.width, s.wheelbase)
}

fn oval() -> TrackSurface {
    TrackSurface::oval(60.0, 40.0, 32, 8.0)
}

#[test]
fn gear_ratio_is_clamped_to_table() {
    let s = spec();
    assert_eq!(s.gear_ratio(0), -3.5);
    assert_eq!(s.gear_ratio(1), 0.0);
    assert_eq!(s.gear_ratio(2), 3.5);
    // Out-of-range indices clamp to the top gear rather than panic.
    assert_eq!(s.gear_ratio(99), *s.gear_ratios.last().unwrap());
}

#[test]
fn shift_drops_rpm_and_respects_cooldown() {
    let s = spec();
    let mut gb = Gearbox::new(FIRST_GEAR);
    let mut rpm = 5000.0;
    let mut vel = DVec3::new(0.0, 0.0, 10.0);

    assert!(gb.shift_up(&s, &mut rpm, &mut vel, 1.0));
    assert_eq!(gb.current_gear, FIRST_GEAR + 1);
    assert!((rpm - 5000.0 * SHIFT_RPM_DROP).abs() < 1e-9);

    // Second shift inside the cooldown window is rejected.
    assert!(!gb.shift_up(&s, &mut rpm, &mut vel, 1.2));
    assert_eq!(gb.current_gear, FIRST_GEAR + 1);

    // After the cooldown it goes through.
    assert!(gb.shift_up(&s, &mut rpm, &mut vel, 1.2 + s.shift_cooldown_secs));
    assert_eq!(gb.current_gear, FIRST_GEAR + 2);
}

#[test]
fn first_gear_engagement_damps_velocity() {
    let s = spec();
    let mut gb = Gearbox::new(NEUTRAL_GEAR);
    let mut rpm = 2000.0;
    let mut vel = DVec3::new(0.0, 0.0, 10.0);
    assert!(gb.shift_up(&s, &mut rpm, &mut vel, 0.0));
    assert_eq!(gb.current_gear, FIRST_GEAR);
    assert!((vel.z - 9.0).abs() < 1e-9);
}

#[test]
fn automatic_upshifts_at_threshold_and_downshifts_low() {
    let s = spec();
    let mut gb = Gearbox::new(FIRST_GEAR);
    let mut rpm = s.upshift_rpm;
    let mut gas = 1.0;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::None, 10.0);
    assert_eq!(gb.current_gear, FIRST_GEAR + 1);
    assert!(rpm < s.upshift_rpm);

    let mut gb = Gearbox::new(FIRST_GEAR + 2);
    let mut rpm = s.downshift_rpm;
    let mut gas = 0.2;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::None, 10.0);
    assert_eq!(gb.current_gear, FIRST_GEAR + 1);
}

#[test]
fn automatic_never_downshifts_out_of_first() {
    let s = spec();
    let mut gb = Gearbox::new(FIRST_GEAR);
    let mut rpm = 500.0;
    let mut gas = 0.0;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::None, 10.0);
    assert_eq!(gb.current_gear, FIRST_GEAR);
}

#[test]
fn shift_intents_cycle_reverse_neutral_drive() {
    let s = spec();
    let mut gb = Gearbox::new(FIRST_GEAR);
    let mut rpm = s.idle_rpm;
    let mut gas = 0.0;
    let mut now = 0.0;

    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::Down, now);
    assert_eq!(gb.current_gear, NEUTRAL_GEAR);
    now += s.shift_cooldown_secs;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::Down, now);
    assert_eq!(gb.current_gear, REVERSE_GEAR);
    now += s.shift_cooldown_secs;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::Up, now);
    assert_eq!(gb.current_gear, NEUTRAL_GEAR);
    now += s.shift_cooldown_secs;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::Up, now);
    assert_eq!(gb.current_gear, FIRST_GEAR);
}

#[test]
fn throttle_tapers_approaching_upshift_rpm() {
    let s = spec();
    let mut gb = Gearbox::new(FIRST_GEAR);
    let mut rpm = s.upshift_rpm - 50.0;
    let mut gas = 1.0;
    gb.update_automatic(&s, &mut rpm, &mut gas, ShiftIntent::None, 10.0);
    assert!(gas < 1.0);
    assert!(gas > 0.0);
}

#[test]
fn torque_goes_negative_near_redline() {
    let s = spec();
    let mut rpm = s.redline - 50.0;
    let torque = powertrain::calculate_torque(&s, FIRST_GEAR + 1, &mut rpm, 1.0, 20.0, DT);
    assert!(torque < 0.0, "expected engine braking, got {torque}");

    // Harder braking at or past the redline itself.
    let mut rpm = s.redline;
    let at_redline = powertrain::calculate_torque(&s, FIRST_GEAR + 1, &mut rpm, 1.0, 20.0, DT);
    assert!(at_redline < torque);
}

#[test]
fn neutral_free_revs_without_driving_torque() {
    let s = spec();
    let mut rpm = s.idle_rpm;
    for _ in 0..200 {
        let torque = powertrain::calculate_torque(&s, NEUTRAL_GEAR, &mut rpm, 1.0, 0.0, DT);
        assert_eq!(torque, 0.0);
    }
    assert!(rpm > s.idle_rpm + 1000.0);
    assert!(rpm <= s.redline);
}

#[test]
fn torque_is_bounded() {
    let s = spec();
    let mut rpm = 3000.0;
    let torque = powertrain::calculate_torque(&s, FIRST_GEAR, &mut rpm, 1.0, 0.0, DT);
    let base = s.motor_power * s.gear_ratio(FIRST_GEAR).abs() * s.differential_ratio;
    assert!(torque > 0.0);
    assert!(torque <= base * 2.0);
}

#[test]
fn braking_distance_guards_degenerate_specs() {
    let s = spec();
    let d = braking::braking_distance(&s, 20.0);
    assert!(d.is_finite() && d > 0.0);
    // Quadratic in speed.
    assert!(braking::braking_distance(&s, 40.0) > 3.9 * d);

    let mut broken = spec();
    broken.brake_force = 0.0;
    assert!(braking::braking_distance(&broken, 20.0).is_infinite());
    broken.brake_force = -100.0;
    assert!(braking::braking_distance(&broken, 20.0).is_infinite());
}

#[test]
fn surface_grip_follows_traversal_cost() {
    assert_eq!(grip::surface_grip_multiplier(1.0), 1.0);
    assert!((grip::surface_grip_multiplier(2.0) - 0.5).abs() < 1e-9);
    // Very costly surfaces bottom out instead of going to zero.
    assert_eq!(grip::surface_grip_multiplier(100.0), 0.2);
    assert_eq!(grip::surface_grip_multiplier(0.0), 1.0);
}

#[test]
fn layout_bias_shapes_balance() {
    let mut s = spec();
    s.drivetrain = DrivetrainLayout::Rear;
    let rwd = grip::layout_friction(&s);
    assert!(rwd.rear.forward > rwd.front.forward);
    assert!(rwd.front.sideways > rwd.rear.sideways);

    s.drivetrain = DrivetrainLayout::Front;
    let fwd = grip::layout_friction(&s);
    assert!(fwd.front.forward > fwd.rear.forward);
    assert!(fwd.front.sideways > fwd.rear.sideways);
}

#[test]
fn handbrake_collapses_rear_sideways_grip() {
    let s = spec();
    let base = grip::layout_friction(&s);
    let drifting = grip::handbrake_friction(&s, base, 20.0);
    assert!(drifting.rear.sideways < base.rear.sideways);
    assert!(drifting.front.sideways > base.front.sideways);
}

#[test]
fn steering_authority_falls_with_speed() {
    let s = spec();
    assert!(steering::sensitivity(0.0) > steering::sensitivity(30.0));
    assert!(steering::dynamic_max_angle(&s, 0.0) > steering::dynamic_max_angle(&s, 40.0));
    // Full lock only at standstill.
    assert!((steering::dynamic_max_angle(&s, 0.0) - s.max_steer_angle_rad()).abs() < 1e-9);
}

#[test]
fn counter_steer_opposes_excess_yaw() {
    let s = spec();
    let straight = steering::steer_angle(&s, 0.0, 20.0, 0.0, false);
    let sliding = steering::steer_angle(&s, 0.0, 20.0, 0.8, false);
    assert_eq!(straight, 0.0);
    assert!(sliding < 0.0);
}

#[test]
fn vehicle_accelerates_under_throttle() {
    let s = spec();
    let track = oval();
    let mut body = body_at(DVec3::new(0.0, 0.0, -40.0), 90f64.to_radians());
    let mut dyn_state = VehicleDynamics::new(&s);
    let intent = ControlIntent {
        gas: 1.0,
        ..Default::default()
    };

    let mut now = 0.0;
    for _ in 0..150 {
        dyn_state.step(&s, &mut body, &intent, &track, now, DT);
        now += DT;
    }
    assert!(body.speed() > 3.0, "speed {}", body.speed());
    // Still pointing roughly where it started with zero steer.
    assert!((body.yaw - 90f64.to_radians()).abs() < 0.1);
}

#[test]
fn braking_brings_vehicle_to_rest() {
    let s = spec();
    let track = oval();
    let mut body = body_at(DVec3::new(0.0, 0.0, -40.0), 90f64.to_radians());
    body.velocity = body.forward() * 15.0;
    let mut dyn_state = VehicleDynamics::new(&s);
    let intent = ControlIntent {
        gas: 0.0,
        brake: true,
        ..Default::default()
    };

    let mut now = 0.0;
    for _ in 0..500 {
        dyn_state.step(&s, &mut body, &intent, &track, now, DT);
        now += DT;
    }
    assert!(body.speed() < 0.01, "speed {}", body.speed());
}

#[test]
fn manual_gearbox_shifts_only_on_intent() {
    let mut s = spec();
    s.automatic = false;
    let track = oval();
    let mut body = body_at(DVec3::new(0.0, 0.0, -40.0), 90f64.to_radians());
    let mut dyn_state = VehicleDynamics::new(&s);

    let up = ControlIntent {
        gas: 1.0,
        shift: ShiftIntent::Up,
        ..Default::default()
    };
    dyn_state.step(&s, &mut body, &up, &track, 0.0, DT);
    assert_eq!(dyn_state.gearbox.current_gear, FIRST_GEAR + 1);

    // Cooldown swallows an immediately repeated intent.
    dyn_state.step(&s, &mut body, &up, &track, DT, DT);
    assert_eq!(dyn_state.gearbox.current_gear, FIRST_GEAR + 1);

    // High RPM alone never shifts under the manual policy.
    dyn_state.rpm = s.upshift_rpm + 500.0;
    let hold = ControlIntent {
        gas: 1.0,
        ..Default::default()
    };
    dyn_state.step(&s, &mut body, &hold, &track, 10.0, DT);
    assert_eq!(dyn_state.gearbox.current_gear, FIRST_GEAR + 1);

    let down = ControlIntent {
        gas: 0.0,
        shift: ShiftIntent::Down,
        ..Default::default()
    };
    dyn_state.step(&s, &mut body, &down, &track, 20.0, DT);
    assert_eq!(dyn_state.gearbox.current_gear, FIRST_GEAR);
}

#[test]
fn guard_band_rpm_rev_matches_back_down() {
    let s = spec();
    let top = s.top_gear();
    let mut rpm = s.redline - 50.0;
    let mut torque = powertrain::calculate_torque(&s, top, &mut rpm, 1.0, 5.0, DT);
    assert!(torque < 0.0);

    // A slow wheel keeps pulling the rev-matched RPM down, so the engine
    // leaves the guard band instead of latching into permanent braking.
    for _ in 0..500 {
        torque = powertrain::calculate_torque(&s, top, &mut rpm, 1.0, 5.0, DT);
    }
    assert!(
        rpm < s.redline - powertrain::REDLINE_GUARD_BAND,
        "rpm latched at {rpm}"
    );
    assert!(torque > 0.0);
}

#[test]
fn gear_label_maps_reverse_and_neutral() {
    let s = spec();
    let mut d = VehicleDynamics::new(&s);
    assert_eq!(d.gear_label(), "1");
    d.gearbox = Gearbox::new(REVERSE_GEAR);
    assert_eq!(d.gear_label(), "R");
    d.gearbox = Gearbox::new(NEUTRAL_GEAR);
    assert_eq!(d.gear_label(), "N");
}
