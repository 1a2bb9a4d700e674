//! Tests for the ribbon surface and the probe scene.

use glam::DVec3;

use rallysim_core::enums::SurfaceKind;
use rallysim_core::query::{LayerMask, ProbeLayer, SpatialProbe, SurfaceQuery, VehicleLookup};
use rallysim_core::types::VehicleId;

use crate::probe::{ProbeScene, StaticObstacle, VehicleDisc};
use crate::surface::TrackSurface;

/// Straight-ish rectangular loop: +Z leg at x=0 is the first segment.
fn rectangle_track(half_width: f64) -> TrackSurface {
    TrackSurface::closed_loop(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 100.0),
            DVec3::new(50.0, 0.0, 100.0),
            DVec3::new(50.0, 0.0, 0.0),
        ],
        half_width,
    )
}

#[test]
fn test_sample_on_ribbon_returns_point() {
    let track = rectangle_track(6.0);
    let pos = DVec3::new(3.0, 0.0, 50.0); // 3 m off the first leg's centerline
    let sampled = track.sample_position(pos, 2.0).unwrap();
    assert!((sampled - pos).length() < 1e-9);
}

#[test]
fn test_sample_off_ribbon_projects_to_boundary() {
    let track = rectangle_track(6.0);
    let pos = DVec3::new(-7.5, 0.0, 50.0); // 1.5 m outside the left boundary
    let sampled = track.sample_position(pos, 2.0).unwrap();
    assert!((sampled.x - -6.0).abs() < 1e-9);
    assert!((sampled.z - 50.0).abs() < 1e-9);
}

#[test]
fn test_sample_far_off_ribbon_fails() {
    let track = rectangle_track(6.0);
    let pos = DVec3::new(-20.0, 0.0, 50.0);
    assert!(track.sample_position(pos, 2.0).is_none());
}

#[test]
fn test_closest_edge_distance_inside() {
    let track = rectangle_track(6.0);
    let edge = track.closest_edge(DVec3::new(-2.0, 0.0, 50.0)).unwrap();
    // 2 m toward the left boundary, boundary at x = -6
    assert!((edge.distance - 4.0).abs() < 1e-9);
    assert!((edge.edge_position.x - -6.0).abs() < 1e-9);
}

#[test]
fn test_area_cost_table() {
    let track = rectangle_track(6.0).with_surface(0..1, SurfaceKind::Mud);
    let mud = track.area_and_cost(DVec3::new(0.0, 0.0, 50.0)).unwrap();
    assert_eq!(mud.kind, SurfaceKind::Mud);
    assert!((mud.cost - 3.0).abs() < 1e-9);

    let asphalt = track.area_and_cost(DVec3::new(25.0, 0.0, 100.0)).unwrap();
    assert_eq!(asphalt.kind, SurfaceKind::Asphalt);
    assert!((asphalt.cost - 1.0).abs() < 1e-9);

    assert!(track.area_and_cost(DVec3::new(-30.0, 0.0, 50.0)).is_none());
}

#[test]
fn test_raycast_hits_nearest_on_requested_layer() {
    let mut scene = ProbeScene::new();
    scene.push_obstacle(StaticObstacle {
        center: DVec3::new(0.0, 0.0, 20.0),
        radius: 1.0,
    });
    scene.push_vehicle(VehicleDisc {
        id: VehicleId(7),
        center: DVec3::new(0.0, 0.0, 10.0),
        radius: 1.0,
    });

    let hit = scene
        .raycast(DVec3::ZERO, DVec3::Z, 50.0, LayerMask::ALL)
        .unwrap();
    assert_eq!(hit.layer, ProbeLayer::Vehicle);
    assert_eq!(hit.vehicle, Some(VehicleId(7)));
    assert!((hit.distance - 9.0).abs() < 1e-9);

    // Restricting to the obstacle layer skips the vehicle
    let hit = scene
        .raycast(DVec3::ZERO, DVec3::Z, 50.0, LayerMask::OBSTACLE)
        .unwrap();
    assert_eq!(hit.layer, ProbeLayer::Obstacle);
    assert!((hit.distance - 19.0).abs() < 1e-9);
}

#[test]
fn test_raycast_misses_out_of_range() {
    let mut scene = ProbeScene::new();
    scene.push_obstacle(StaticObstacle {
        center: DVec3::new(0.0, 0.0, 20.0),
        radius: 1.0,
    });
    assert!(scene
        .raycast(DVec3::ZERO, DVec3::Z, 10.0, LayerMask::ALL)
        .is_none());
    // Behind the origin
    assert!(scene
        .raycast(DVec3::ZERO, -DVec3::Z, 50.0, LayerMask::ALL)
        .is_none());
}

#[test]
fn test_sphere_cast_catches_offset_target() {
    let mut scene = ProbeScene::new();
    // 2 m to the side of the ray: a thin ray misses, a 1.5-radius sphere
    // plus the 1-radius disc connects.
    scene.push_vehicle(VehicleDisc {
        id: VehicleId(1),
        center: DVec3::new(2.0, 0.0, 10.0),
        radius: 1.0,
    });
    assert!(scene
        .raycast(DVec3::ZERO, DVec3::Z, 50.0, LayerMask::VEHICLE)
        .is_none());
    assert!(scene
        .sphere_cast(DVec3::ZERO, 1.5, DVec3::Z, 50.0, LayerMask::VEHICLE)
        .is_some());
}

#[test]
fn test_excluding_hides_own_disc() {
    let mut scene = ProbeScene::new();
    scene.push_vehicle(VehicleDisc {
        id: VehicleId(1),
        center: DVec3::new(0.0, 0.0, 0.5),
        radius: 1.0,
    });
    scene.push_vehicle(VehicleDisc {
        id: VehicleId(2),
        center: DVec3::new(0.0, 0.0, 12.0),
        radius: 1.0,
    });

    let probe = scene.excluding(VehicleId(1));
    let hit = probe
        .raycast(DVec3::ZERO, DVec3::Z, 50.0, LayerMask::VEHICLE)
        .unwrap();
    assert_eq!(hit.vehicle, Some(VehicleId(2)));
}

#[test]
fn test_check_box_oriented() {
    let mut scene = ProbeScene::new();
    scene.push_obstacle(StaticObstacle {
        center: DVec3::new(0.0, 0.0, 4.0),
        radius: 0.5,
    });

    // Long axis pointing +Z reaches the disc
    assert!(scene.check_box(
        DVec3::ZERO,
        DVec3::new(1.0, 1.0, 4.0),
        0.0,
        LayerMask::OBSTACLE
    ));
    // Rotated 90 degrees the long axis points +X and misses
    assert!(!scene.check_box(
        DVec3::ZERO,
        DVec3::new(1.0, 1.0, 4.0),
        std::f64::consts::FRAC_PI_2,
        LayerMask::OBSTACLE
    ));
}

#[test]
fn test_vehicle_lookup() {
    let mut scene = ProbeScene::new();
    scene.push_vehicle(VehicleDisc {
        id: VehicleId(3),
        center: DVec3::new(1.0, 0.0, 2.0),
        radius: 1.0,
    });
    assert_eq!(
        scene.position(VehicleId(3)),
        Some(DVec3::new(1.0, 0.0, 2.0))
    );
    assert_eq!(scene.position(VehicleId(9)), None);
}
