//! Waypoint progression, lap counting, and joker-lap bookkeeping.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use rallysim_core::constants::{JOKER_LAP_CHANCE, WAYPOINT_RANGE};
use rallysim_core::events::RaceEvent;
use rallysim_core::path::{JokerLapProgress, Waypoint, WaypointPath};
use rallysim_core::types::{VehicleBody, VehicleId};

use crate::driver::RouteConfig;

/// Per-vehicle navigation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavState {
    /// Index of the waypoint currently being chased on the active path.
    pub current_index: usize,
    pub lap_count: u32,
    pub joker: JokerLapProgress,
    /// Last waypoint index confirmed reached while on the surface; the
    /// recovery teleport backstop lands here.
    pub last_valid_index: usize,
    /// Indices already credited this lap, guarding against double advance
    /// when the proximity radius and the behind-heuristic both fire.
    visited: HashSet<usize>,
    pub warned_empty_path: bool,
}

impl NavState {
    /// The path the vehicle is currently following.
    pub fn active_path<'a>(
        &self,
        main: &'a WaypointPath,
        joker: &'a WaypointPath,
    ) -> &'a WaypointPath {
        if self.joker.is_taking {
            joker
        } else {
            main
        }
    }

    /// Current target waypoint, skipping absent entries. Updates
    /// `current_index` past any holes. None when the path has no
    /// usable entries at all.
    pub fn resolve_target<'a>(&mut self, path: &'a WaypointPath) -> Option<&'a Waypoint> {
        let (index, waypoint) = path.first_present_from(self.current_index)?;
        self.current_index = index;
        Some(waypoint)
    }

    /// Advance past the current waypoint if the vehicle has reached or
    /// passed it. Emits progression events.
    pub fn advance_if_reached(
        &mut self,
        id: VehicleId,
        body: &VehicleBody,
        main: &WaypointPath,
        joker: &WaypointPath,
        route: &RouteConfig,
        on_surface: bool,
        rng: &mut impl Rng,
        events: &mut Vec<RaceEvent>,
    ) {
        let path = self.active_path(main, joker);
        let Some((index, waypoint)) = path.first_present_from(self.current_index) else {
            return;
        };
        self.current_index = index;

        let offset = waypoint.position - body.position;
        let reached = offset.length() <= WAYPOINT_RANGE;
        // Tolerance against orbiting a missed waypoint forever: one the
        // vehicle is already past counts as reached.
        let behind = body.forward().dot(offset) < 0.0;
        if !reached && !behind {
            return;
        }

        if self.visited.insert(index) {
            events.push(RaceEvent::WaypointReached { vehicle: id, index });
        }
        if on_surface {
            self.last_valid_index = index;
        }

        if self.joker.is_taking {
            self.advance_on_joker(id, index, main, joker, route, events);
        } else {
            self.advance_on_main(id, index, main, joker, route, rng, events);
        }
    }

    fn advance_on_main(
        &mut self,
        id: VehicleId,
        index: usize,
        main: &WaypointPath,
        joker: &WaypointPath,
        route: &RouteConfig,
        rng: &mut impl Rng,
        events: &mut Vec<RaceEvent>,
    ) {
        let next = main.wrap(index + 1);
        if next == 0 && main.len() > 1 {
            // Lap rollover skips index 0; the start line is index 0 and
            // chasing it again would double back.
            self.lap_count += 1;
            self.current_index = main.wrap(1);
            self.visited.clear();
            events.push(RaceEvent::LapCompleted {
                vehicle: id,
                lap: self.lap_count,
            });
            if !self.joker.has_taken && !self.joker.should_take {
                self.joker.should_take = rng.gen_bool(JOKER_LAP_CHANCE);
            }
        } else {
            self.current_index = next;
        }

        if self.joker.should_take && self.current_index == route.joker_entry_index {
            if joker.is_empty() {
                // Consume the decision anyway so it is not retried every tick.
                self.joker.should_take = false;
            } else {
                self.joker.should_take = false;
                self.joker.is_taking = true;
                self.current_index = 0;
                self.visited.clear();
            }
        }
    }

    fn advance_on_joker(
        &mut self,
        id: VehicleId,
        index: usize,
        main: &WaypointPath,
        joker: &WaypointPath,
        route: &RouteConfig,
        events: &mut Vec<RaceEvent>,
    ) {
        let next = joker.wrap(index + 1);
        if next == 0 && !joker.is_empty() {
            // Joker section complete; rejoin the main path.
            self.joker.is_taking = false;
            self.joker.has_taken = true;
            let rejoin = rejoin_index(main, route.joker_rejoin_index);
            self.current_index = rejoin;
            self.visited.clear();
            events.push(RaceEvent::JokerLapCompleted {
                vehicle: id,
                rejoin_index: rejoin,
            });
        } else {
            self.current_index = next;
        }
    }
}

/// Main-path index where a finished joker section rejoins: the configured
/// rejoin point when it is inside the path, otherwise the second-to-last
/// entry.
pub fn rejoin_index(main: &WaypointPath, configured: Option<usize>) -> usize {
    match configured {
        Some(index) if index < main.len() => index,
        _ => main.len().saturating_sub(2),
    }
}
