//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz). One tick runs the AI pass then physics.
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Waypoint progression ---

/// Proximity radius at which a waypoint counts as reached (m).
pub const WAYPOINT_RANGE: f64 = 0.5;

/// Probability that an AI takes the joker lap after completing a lap,
/// until it has taken it once.
pub const JOKER_LAP_CHANCE: f64 = 0.4;

// --- Path following ---

/// Lookahead bounds along the spline (m).
pub const LOOKAHEAD_MIN: f64 = 3.0;
pub const LOOKAHEAD_MAX: f64 = 20.0;

/// Fixed sample count when walking a spline segment.
pub const SPLINE_SAMPLES: usize = 20;

/// Margin added to the vehicle half-width for edge-safety checks (m).
pub const EDGE_SAFETY_MARGIN: f64 = 0.3;

/// Clamp distance used when pulling steering targets off the surface
/// edge (m).
pub const STEER_EDGE_CLAMP: f64 = 1.2;

/// Max distance the surface query searches when sampling a point onto
/// the surface (m).
pub const SURFACE_SAMPLE_DIST: f64 = 2.0;

/// Max distance for the on-surface check of the vehicle itself (m).
pub const ON_SURFACE_TOLERANCE: f64 = 1.0;

// --- Obstacle sensing ---

/// Detection range at standstill (m); scales with speed.
pub const BASE_OBSTACLE_RANGE: f64 = 10.0;

/// Added detection range per m/s of speed.
pub const RANGE_SPEED_FACTOR: f64 = 0.8;

/// Static-obstacle cone: ray count and full spread angle (radians).
pub const STATIC_CONE_RAYS: usize = 5;
pub const STATIC_CONE_ANGLE: f64 = 45.0 * std::f64::consts::PI / 180.0;

/// Vehicle cone: wider to catch cars drifting across the line.
pub const VEHICLE_CONE_RAYS: usize = 7;
pub const VEHICLE_CONE_ANGLE: f64 = 60.0 * std::f64::consts::PI / 180.0;

/// Radius of the forward sphere probe that backstops the vehicle cone (m).
pub const VEHICLE_SPHERE_RADIUS: f64 = 1.5;

// --- Overtaking ---

/// An overtake target further than this multiple of the detection range
/// is released.
pub const OVERTAKE_RELEASE_FACTOR: f64 = 1.2;

/// Forward distance of the overtake candidate target point (m).
pub const OVERTAKE_AHEAD_DIST: f64 = 10.0;

/// Forward clearance ray length from each side position (m).
pub const OVERTAKE_FORWARD_CHECK: f64 = 8.0;

/// Edge clamp distance for overtake target points (m).
pub const OVERTAKE_EDGE_CLAMP: f64 = 1.0;

// --- Recovery ---

/// Seconds off-surface before the teleport backstop fires.
pub const MAX_RECOVERY_TIME: f64 = 5.0;

/// Search radius when sampling a recovery target (m).
pub const RECOVERY_SAMPLE_RADIUS: f64 = 10.0;

/// Gas applied while driving toward the recovery target.
pub const RECOVERY_GAS: f64 = 0.3;

// --- Trajectory prediction ---

/// Base horizon of the short-term trajectory prediction (s); extended
/// by speed / 20.
pub const PREDICTION_BASE_SECS: f64 = 1.5;

/// Integration steps of the trajectory prediction.
pub const PREDICTION_STEPS: usize = 10;

/// Edge-safety threshold used by the prediction (m).
pub const PREDICTION_SAFE_DIST: f64 = 1.0;

// --- Control smoothing (per-second lerp rates) ---

pub const STEER_SMOOTH_RATE: f64 = 5.0;
pub const OVERTAKE_STEER_RATE: f64 = 3.0;
pub const GAS_SMOOTH_RATE: f64 = 2.5;
pub const OVERTAKE_GAS_RATE: f64 = 2.0;
pub const BRAKE_SMOOTH_RATE: f64 = 8.0;

/// Brake strength above which smoothing is bypassed (urgent stop).
pub const BRAKE_HARD_THRESHOLD: f64 = 0.8;

/// Smoothed brake strength above which the brake output is asserted.
pub const BRAKE_ACTIVE_THRESHOLD: f64 = 0.05;

// --- Grip ---

/// Bounds of the surface grip multiplier clamp(1/cost, ..).
pub const GRIP_MIN: f64 = 0.2;
pub const GRIP_MAX: f64 = 1.0;
