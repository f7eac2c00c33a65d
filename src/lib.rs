//! Island Navigator - steer a vessel through drifting water to a target island
//!
//! Core modules:
//! - `sim`: Simulation core (vessel dynamics, drift, collisions, world generation, session)
//! - `settings`: Immutable configuration passed into every component
//! - `controls`: Pointer region mapping for touch/click steering

pub mod controls;
pub mod settings;
pub mod sim;

pub use settings::{CheckpointPolicy, DriftMode, RotationMode, Settings, SettingsError};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Linear speed scale applied to normalized force
    pub const BOAT_SPEED: f32 = 2.0;
    /// Upper bound for each directional force accumulator
    pub const MAX_FORCE: f32 = 100.0;
    /// Force added (or drained from the opposing side) per intent
    pub const FORCE_INCREMENT: f32 = 1.0;
    /// Collision radius of the vessel (half its hull width)
    pub const VESSEL_RADIUS: f32 = 30.0;

    /// Momentum damping below the warning speed
    pub const MOMENTUM_DAMPING: f32 = 0.98;
    /// Momentum damping at or above the emergency speed
    pub const EMERGENCY_DAMPING: f32 = 0.90;
    pub const VELOCITY_WARNING_THRESHOLD: f32 = 4.0;
    pub const EMERGENCY_BRAKE_THRESHOLD: f32 = 5.0;

    pub const ANGULAR_DAMPING: f32 = 0.99;
    pub const FORCE_TO_ROTATION: f32 = 0.02;
    /// Degrees per tick
    pub const MAX_ANGULAR_VELOCITY: f32 = 1.0;
    /// Degrees per rotate intent (keyed rotation)
    pub const ROTATION_STEP: f32 = 2.0;

    /// Any speed above this is a crash, wherever the vessel is
    pub const MAX_SAFE_SPEED: f32 = 20.0;
    /// Touching a feature above this speed is a crash
    pub const MAX_DOCKING_SPEED: f32 = 3.0;

    pub const MIN_DRIFT_MAGNITUDE: f32 = 0.5;
    pub const MAX_DRIFT_MAGNITUDE: f32 = 2.5;
    pub const DRIFT_CHANGE_INTERVAL_MS: u64 = 3000;

    /// Half-extent of the playable square around the origin
    pub const WORLD_BOUNDARY: f32 = 5000.0;
    pub const MIN_FEATURE_DISTANCE: f32 = 300.0;
    pub const TARGET_ISLAND_RADIUS: f32 = 80.0;
    /// Nominal distance from spawn to the target island
    pub const TARGET_ISLAND_DISTANCE: f32 = 2000.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees (0 = up, i.e. -Y; 90 = +X)
#[inline]
pub fn heading_to_vector(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
