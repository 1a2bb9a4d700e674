//! Tests for core math, paths, and intent clamping.

use glam::DVec3;

use crate::commands::ControlIntent;
use crate::math::*;
use crate::path::WaypointPath;
use crate::types::VehicleBody;

#[test]
fn test_rotate_y_matches_yaw_convention() {
    let body = VehicleBody::new(DVec3::ZERO, 0.4, 1200.0, 1.8, 2.6);
    let rotated = rotate_y(body.forward(), 0.3);
    let expected = VehicleBody::new(DVec3::ZERO, 0.7, 1200.0, 1.8, 2.6).forward();
    assert!((rotated - expected).length() < 1e-9);
}

#[test]
fn test_signed_angle_sign_and_magnitude() {
    let forward = DVec3::Z;
    let left = rotate_y(forward, -0.5);
    let right = rotate_y(forward, 0.5);
    assert!((signed_angle_y(forward, right) - 0.5).abs() < 1e-9);
    assert!((signed_angle_y(forward, left) + 0.5).abs() < 1e-9);
    // Y components are ignored
    let tilted = DVec3::new(right.x, 3.0, right.z);
    assert!((signed_angle_y(forward, tilted) - 0.5).abs() < 1e-9);
}

#[test]
fn test_signed_angle_degenerate_input() {
    // Zero vector projects to +Z, so the angle is finite, not NaN
    let angle = signed_angle_y(DVec3::ZERO, DVec3::X);
    assert!(angle.is_finite());
}

#[test]
fn test_sample_curve_interpolates_and_clamps() {
    let curve = [(0.0, 1.5), (20.0, 1.3), (60.0, 1.1)];
    assert!((sample_curve(&curve, -5.0) - 1.5).abs() < 1e-9);
    assert!((sample_curve(&curve, 10.0) - 1.4).abs() < 1e-9);
    assert!((sample_curve(&curve, 100.0) - 1.1).abs() < 1e-9);
}

#[test]
fn test_smooth_lerp_never_overshoots() {
    // A huge rate*dt product must land exactly on the target
    let v = smooth_lerp(0.0, 1.0, 50.0, 1.0);
    assert!((v - 1.0).abs() < 1e-12);
}

#[test]
fn test_intent_clamping() {
    let intent = ControlIntent {
        gas: 7.0,
        steer: -3.0,
        ..Default::default()
    }
    .clamped();
    assert_eq!(intent.gas, 1.0);
    assert_eq!(intent.steer, -1.0);
}

#[test]
fn test_path_holes_and_wrap() {
    let path = WaypointPath::new(vec![
        Some(crate::path::Waypoint { position: DVec3::ZERO, yaw: 0.0 }),
        None,
        Some(crate::path::Waypoint {
            position: DVec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
        }),
    ]);

    assert_eq!(path.len(), 3);
    assert!(path.get(1).is_none());
    assert!(path.get(99).is_none());
    assert_eq!(path.wrap(4), 1);
    // Skipping the hole finds the next present entry
    let (idx, _) = path.first_present_from(1).unwrap();
    assert_eq!(idx, 2);
}

#[test]
fn test_from_positions_derives_headings() {
    let path = WaypointPath::from_positions(&[
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(10.0, 0.0, 10.0),
    ]);
    // First waypoint faces +Z toward the second
    assert!((path.get(0).unwrap().yaw - 0.0).abs() < 1e-9);
    // Second faces +X toward the third
    assert!((path.get(1).unwrap().yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn test_snapshot_serde_round_trip() {
    use crate::enums::{AiDrivingState, AiProfile, AlertLevel, RacePhase};
    use crate::events::{Alert, RaceEvent};
    use crate::state::{RaceSnapshot, VehicleView};
    use crate::types::{SimTime, VehicleId};

    let snapshot = RaceSnapshot {
        time: SimTime {
            tick: 120,
            elapsed_secs: 2.4,
        },
        phase: RacePhase::Running,
        vehicles: vec![VehicleView {
            id: VehicleId(3),
            position: DVec3::new(1.0, 0.0, -2.5),
            yaw: 0.7,
            speed: 18.0,
            gear: "3".to_string(),
            rpm: 4200.0,
            profile: Some(AiProfile::Fast),
            ai_state: Some(AiDrivingState::Driving),
            lap: 1,
            waypoint_index: 5,
        }],
        events: vec![RaceEvent::WaypointReached {
            vehicle: VehicleId(3),
            index: 5,
        }],
        alerts: vec![Alert {
            level: AlertLevel::Info,
            message: "on surface".to_string(),
            tick: 120,
        }],
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: RaceSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(serde_json::to_string(&back).unwrap(), json);
}
