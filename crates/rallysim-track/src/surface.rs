//! Ribbon track surface.
//!
//! The drivable surface is the set of points within `half_width` of a
//! closed centerline polyline, measured in the ground plane. Each
//! centerline segment carries a surface kind whose traversal cost the
//! grip model inverts downstream.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use rallysim_core::enums::SurfaceKind;
use rallysim_core::query::{EdgeHit, SurfaceArea, SurfaceQuery};

/// Closed-loop track surface with per-segment surface kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSurface {
    centerline: Vec<DVec3>,
    half_width: f64,
    kinds: Vec<SurfaceKind>,
}

/// Projection of a query point onto the centerline.
struct Projection {
    segment: usize,
    /// Closest point on the centerline.
    center: DVec3,
    /// In-plane distance from the query point to the centerline.
    lateral: f64,
    /// Unit vector from the centerline toward the query point
    /// (+X fallback when the point sits exactly on the line).
    outward: DVec3,
}

impl TrackSurface {
    /// Build a closed loop. All segments default to asphalt.
    ///
    /// The centerline must have at least 3 points; fewer cannot enclose
    /// a loop.
    pub fn closed_loop(centerline: Vec<DVec3>, half_width: f64) -> Self {
        assert!(centerline.len() >= 3, "closed loop needs at least 3 points");
        let kinds = vec![SurfaceKind::Asphalt; centerline.len()];
        Self {
            centerline,
            half_width,
            kinds,
        }
    }

    /// Assign a surface kind to the segments in `range` (segment i runs
    /// from centerline point i to i+1).
    pub fn with_surface(mut self, range: std::ops::Range<usize>, kind: SurfaceKind) -> Self {
        for i in range {
            if let Some(slot) = self.kinds.get_mut(i) {
                *slot = kind;
            }
        }
        self
    }

    /// An elliptical test loop in the XZ plane.
    pub fn oval(radius_x: f64, radius_z: f64, points: usize, half_width: f64) -> Self {
        let centerline = oval_centerline(radius_x, radius_z, points);
        Self::closed_loop(centerline, half_width)
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn centerline(&self) -> &[DVec3] {
        &self.centerline
    }

    fn project(&self, pos: DVec3) -> Projection {
        let n = self.centerline.len();
        let mut best = Projection {
            segment: 0,
            center: self.centerline[0],
            lateral: f64::INFINITY,
            outward: DVec3::X,
        };

        for i in 0..n {
            let a = self.centerline[i];
            let b = self.centerline[(i + 1) % n];
            let ab = DVec3::new(b.x - a.x, 0.0, b.z - a.z);
            let ap = DVec3::new(pos.x - a.x, 0.0, pos.z - a.z);
            let len_sq = ab.length_squared();
            let t = if len_sq < 1e-12 {
                0.0
            } else {
                (ap.dot(ab) / len_sq).clamp(0.0, 1.0)
            };
            let center = a + ab * t;
            let offset = DVec3::new(pos.x - center.x, 0.0, pos.z - center.z);
            let lateral = offset.length();
            if lateral < best.lateral {
                let outward = if lateral < 1e-9 {
                    DVec3::X
                } else {
                    offset / lateral
                };
                best = Projection {
                    segment: i,
                    center,
                    lateral,
                    outward,
                };
            }
        }
        best
    }
}

impl SurfaceQuery for TrackSurface {
    fn sample_position(&self, pos: DVec3, max_dist: f64) -> Option<DVec3> {
        let proj = self.project(pos);
        if proj.lateral <= self.half_width {
            // Already on the ribbon; flatten to the track plane.
            return Some(DVec3::new(pos.x, proj.center.y, pos.z));
        }
        let nearest = proj.center + proj.outward * self.half_width;
        let overshoot = proj.lateral - self.half_width;
        if overshoot <= max_dist {
            Some(nearest)
        } else {
            None
        }
    }

    fn closest_edge(&self, pos: DVec3) -> Option<EdgeHit> {
        let proj = self.project(pos);
        let edge_position = proj.center + proj.outward * self.half_width;
        let distance = (proj.lateral - self.half_width).abs();
        Some(EdgeHit {
            edge_position,
            distance,
        })
    }

    fn area_and_cost(&self, pos: DVec3) -> Option<SurfaceArea> {
        let proj = self.project(pos);
        if proj.lateral > self.half_width {
            return None;
        }
        let kind = self.kinds[proj.segment];
        Some(SurfaceArea {
            kind,
            cost: kind.traversal_cost(),
        })
    }
}

/// Evenly sampled ellipse, counter-clockwise when viewed from +Y.
pub fn oval_centerline(radius_x: f64, radius_z: f64, points: usize) -> Vec<DVec3> {
    (0..points)
        .map(|i| {
            let theta = i as f64 / points as f64 * std::f64::consts::TAU;
            DVec3::new(radius_x * theta.sin(), 0.0, radius_z * theta.cos())
        })
        .collect()
}
