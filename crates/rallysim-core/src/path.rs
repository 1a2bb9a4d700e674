//! Waypoint paths and joker-lap progress tracking.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A single authored path point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: DVec3,
    /// Authored heading at this point (radians around +Y).
    pub yaw: f64,
}

/// Ordered sequence of waypoints. Insertion order is significant and the
/// index wraps modulo length. Entries may be absent (authoring holes);
/// a missing entry at the current index is skipped, never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointPath {
    entries: Vec<Option<Waypoint>>,
}

impl WaypointPath {
    pub fn new(entries: Vec<Option<Waypoint>>) -> Self {
        Self { entries }
    }

    /// Build a gap-free path from positions, deriving each yaw from the
    /// direction to the next position (wrap-around).
    pub fn from_positions(positions: &[DVec3]) -> Self {
        let n = positions.len();
        let entries = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let next = positions[(i + 1) % n.max(1)];
                let dir = next - p;
                let yaw = if dir.length_squared() > 1e-12 {
                    dir.x.atan2(dir.z)
                } else {
                    0.0
                };
                Some(Waypoint { position: p, yaw })
            })
            .collect();
        Self { entries }
    }

    /// Number of slots, including holes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The waypoint at `index`, or `None` for a hole or out-of-range index.
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.entries.get(index).and_then(|e| e.as_ref())
    }

    /// Wrap an index into range (panics only on an empty path; callers
    /// check `is_empty` first).
    pub fn wrap(&self, index: usize) -> usize {
        index % self.entries.len()
    }

    /// Position of the first present waypoint at or after `index`
    /// (wrapping), if the path has any present entry at all.
    pub fn first_present_from(&self, index: usize) -> Option<(usize, &Waypoint)> {
        if self.entries.is_empty() {
            return None;
        }
        for step in 0..self.entries.len() {
            let i = (index + step) % self.entries.len();
            if let Some(wp) = self.get(i) {
                return Some((i, wp));
            }
        }
        None
    }
}

/// Per-vehicle joker-lap flags.
///
/// `has_taken` goes false -> true at most once per race. `should_take` is
/// decided at most once per completed lap and consumed exactly once when
/// the joker route is entered. `is_taking` is mutually exclusive with
/// following the main path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct JokerLapProgress {
    pub has_taken: bool,
    pub is_taking: bool,
    pub should_take: bool,
}
