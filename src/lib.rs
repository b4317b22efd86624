//! Ballworks - A falling-ball physics puzzle toy
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (bodies, forces, collisions, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Units follow the arena: positions in pixels (y grows downward), time in
/// milliseconds, velocities in pixels per tick.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    pub const WALL_THICKNESS: f32 = 50.0;

    /// Downward acceleration (px/ms²)
    pub const GRAVITY: f32 = 0.001;
    /// Mass per unit area for non-static bodies
    pub const BODY_DENSITY: f32 = 0.001;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.001;
    pub const BALL_FRICTION_AIR: f32 = 0.0005;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_LIFETIME_MS: f64 = 15_000.0;

    /// Spawn cadence bounds (uniform in [min, max))
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 500.0;
    pub const SPAWN_INTERVAL_MAX_MS: f64 = 1250.0;

    /// Fan thrust cone and strength
    pub const FAN_FORCE: f32 = 0.00075;
    pub const FAN_REACH: f32 = 100.0;
    pub const FAN_HALF_WIDTH: f32 = 50.0;

    /// Vortex pull
    pub const VORTEX_RANGE: f32 = 200.0;
    pub const VORTEX_CORE: f32 = 25.0;
    pub const VORTEX_FALLOFF_BASE: f32 = 10.0;
    pub const VORTEX_STRENGTH: f32 = 0.0005;

    /// Material footprints (from the sprite sizes)
    pub const PLANK_WIDTH: f32 = 112.5;
    pub const PLANK_HEIGHT: f32 = 12.21;
    pub const PLANK_TILT_DEG: f32 = 20.0;
    pub const FAN_WIDTH: f32 = 45.0;
    pub const FAN_HEIGHT: f32 = 72.14;
    pub const BOUNCER_WIDTH: f32 = 74.31;
    pub const BOUNCER_HEIGHT: f32 = 35.57;
    pub const BOUNCER_STRIP: f32 = 10.0;
    pub const BUMPER_WIDTH: f32 = 41.19;
    pub const BUMPER_HEIGHT: f32 = 69.62;
    pub const BUMPER_RESTITUTION: f32 = 3.0;
    pub const VORTEX_DIAMETER: f32 = 70.31;

    /// Scoring window and formula
    pub const SCORE_WINDOW_MS: f64 = 5000.0;
    pub const SCORE_BASE_POINTS: f64 = 500.0;
    pub const FREE_MATERIALS: usize = 6;
    pub const MATERIAL_PENALTY: f64 = 50.0;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * (std::f32::consts::PI / 180.0)
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
