//! The track a race runs on: surface, obstacles, and routes.

use glam::DVec3;

use rallysim_core::path::WaypointPath;
use rallysim_driver_ai::RouteConfig;
use rallysim_track::{oval_centerline, StaticObstacle, TrackSurface};

/// Everything static about the venue. Owned by the engine; the systems
/// read it through shared references.
pub struct RaceTrack {
    surface: TrackSurface,
    obstacles: Vec<StaticObstacle>,
    main_path: WaypointPath,
    joker_path: WaypointPath,
    route: RouteConfig,
}

impl RaceTrack {
    pub fn new(
        surface: TrackSurface,
        main_path: WaypointPath,
        joker_path: WaypointPath,
        route: RouteConfig,
    ) -> Self {
        Self {
            surface,
            obstacles: Vec::new(),
            main_path,
            joker_path,
            route,
        }
    }

    pub fn push_obstacle(&mut self, obstacle: StaticObstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn surface(&self) -> &TrackSurface {
        &self.surface
    }

    pub fn obstacles(&self) -> &[StaticObstacle] {
        &self.obstacles
    }

    pub fn main_path(&self) -> &WaypointPath {
        &self.main_path
    }

    pub fn joker_path(&self) -> &WaypointPath {
        &self.joker_path
    }

    pub fn route(&self) -> RouteConfig {
        self.route
    }

    /// Pose of the grid slot `slot`: on the main path just behind the
    /// start line, staggered backwards.
    pub fn grid_pose(&self, slot: usize) -> (DVec3, f64) {
        match self.main_path.first_present_from(0) {
            Some((_, waypoint)) => {
                let heading = DVec3::new(waypoint.yaw.sin(), 0.0, waypoint.yaw.cos());
                (waypoint.position - heading * (6.0 * slot as f64), waypoint.yaw)
            }
            None => (DVec3::ZERO, 0.0),
        }
    }

    /// An elliptical demo venue: asphalt ribbon, a main lap route on the
    /// centerline, and a tighter inside arc as the joker section.
    pub fn demo_oval() -> Self {
        let surface = TrackSurface::oval(60.0, 40.0, 32, 8.0);
        let main_path = WaypointPath::from_positions(&oval_centerline(60.0, 40.0, 16));

        // Inside line across the far end of the oval, on the same angular
        // parameterization as the centerline so it spans main indices 4..=8.
        let joker_points: Vec<DVec3> = (4..=8)
            .map(|i| {
                let theta = i as f64 / 16.0 * std::f64::consts::TAU;
                DVec3::new(55.0 * theta.sin(), 0.0, 35.0 * theta.cos())
            })
            .collect();
        let joker_path = WaypointPath::from_positions(&joker_points);

        let route = RouteConfig {
            joker_entry_index: 4,
            joker_rejoin_index: Some(9),
            strict_edge_recovery: false,
        };

        Self::new(surface, main_path, joker_path, route)
    }
}
