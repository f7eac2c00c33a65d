//! Simulation settings
//!
//! Built once (defaults, or JSON from disk) and handed by reference to every
//! component. Nothing in the simulation reads configuration from anywhere else.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the vessel's heading changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationMode {
    /// Heading is fixed; rotate intents are ignored
    Disabled,
    /// Each rotate intent turns the vessel by a fixed step
    #[default]
    Keyed,
    /// Left/right force difference produces torque
    ForceDriven,
}

/// Whether the current stays put for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DriftMode {
    /// Direction is drawn once per session, magnitude is `fixed_magnitude`
    #[default]
    Fixed,
    /// Magnitude and direction are redrawn every `change_interval_ms`
    Periodic,
}

/// When new checkpoints are recorded during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CheckpointPolicy {
    /// Only the spawn point is ever a checkpoint
    #[default]
    SpawnOnly,
    /// Record the vessel position every `interval_ms` while it is safe
    Periodic { interval_ms: u64 },
}

/// Vessel physics tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselSettings {
    pub speed: f32,
    pub max_force: f32,
    pub force_increment: f32,
    pub radius: f32,
    pub momentum_damping: f32,
    pub emergency_damping: f32,
    pub warning_speed: f32,
    pub emergency_speed: f32,
    pub rotation: RotationMode,
    pub rotation_step: f32,
    pub angular_damping: f32,
    pub force_to_rotation: f32,
    pub max_angular_velocity: f32,
    /// Whether the vessel spawns docked and must be undocked first
    pub docking_enabled: bool,
}

impl Default for VesselSettings {
    fn default() -> Self {
        Self {
            speed: BOAT_SPEED,
            max_force: MAX_FORCE,
            force_increment: FORCE_INCREMENT,
            radius: VESSEL_RADIUS,
            momentum_damping: MOMENTUM_DAMPING,
            emergency_damping: EMERGENCY_DAMPING,
            warning_speed: VELOCITY_WARNING_THRESHOLD,
            emergency_speed: EMERGENCY_BRAKE_THRESHOLD,
            rotation: RotationMode::Keyed,
            rotation_step: ROTATION_STEP,
            angular_damping: ANGULAR_DAMPING,
            force_to_rotation: FORCE_TO_ROTATION,
            max_angular_velocity: MAX_ANGULAR_VELOCITY,
            docking_enabled: true,
        }
    }
}

/// Current (drift) tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftSettings {
    pub mode: DriftMode,
    /// Magnitude used in `Fixed` mode
    pub fixed_magnitude: f32,
    pub min_magnitude: f32,
    pub max_magnitude: f32,
    pub change_interval_ms: u64,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            mode: DriftMode::Fixed,
            fixed_magnitude: 1.0,
            min_magnitude: MIN_DRIFT_MAGNITUDE,
            max_magnitude: MAX_DRIFT_MAGNITUDE,
            change_interval_ms: DRIFT_CHANGE_INTERVAL_MS,
        }
    }
}

/// Feature placement and collision limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub boundary: f32,
    pub min_feature_distance: f32,
    pub max_safe_speed: f32,
    pub max_docking_speed: f32,

    pub rock_count: usize,
    pub rock_distance: (f32, f32),
    pub rock_size: (f32, f32),

    pub island_count: usize,
    pub island_distance: (f32, f32),
    pub island_size: (f32, f32),
    /// Trees sit on a ring of `island size * tree_ring_ratio`
    pub tree_ring_ratio: f32,
    pub tree_size: f32,

    pub vessel_count: usize,
    pub vessel_distance: (f32, f32),
    pub vessel_size: f32,

    pub target_distance: (f32, f32),
    pub target_radius: f32,

    /// Place a starting island directly behind the spawn point
    pub starting_island: bool,
    pub starting_island_size: f32,

    /// Samples per feature before giving up (or widening, for the target)
    pub max_placement_attempts: u32,
    /// How many times the target's distance range is widened before the fallback
    pub target_widen_rounds: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            boundary: WORLD_BOUNDARY,
            min_feature_distance: MIN_FEATURE_DISTANCE,
            max_safe_speed: MAX_SAFE_SPEED,
            max_docking_speed: MAX_DOCKING_SPEED,

            rock_count: 15,
            rock_distance: (400.0, 3000.0),
            rock_size: (15.0, 40.0),

            island_count: 8,
            island_distance: (600.0, 4000.0),
            island_size: (40.0, 100.0),
            tree_ring_ratio: 0.6,
            tree_size: 12.0,

            vessel_count: 5,
            vessel_distance: (500.0, 3500.0),
            vessel_size: 20.0,

            target_distance: (TARGET_ISLAND_DISTANCE * 0.75, TARGET_ISLAND_DISTANCE * 1.5),
            target_radius: TARGET_ISLAND_RADIUS,

            starting_island: true,
            starting_island_size: 60.0,

            max_placement_attempts: 200,
            target_widen_rounds: 4,
        }
    }
}

/// Session timing and flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub tick_rate_hz: u32,
    pub checkpoint: CheckpointPolicy,
    /// Lifetime of transient warnings
    pub notification_ms: u64,
    /// Pause after a checkpoint rollback (0 = keep playing)
    pub rollback_pause_ms: u64,
    /// Show the instructions again after a restart instead of handing control back directly
    pub instructions_on_restart: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            checkpoint: CheckpointPolicy::SpawnOnly,
            notification_ms: 2000,
            rollback_pause_ms: 0,
            instructions_on_restart: true,
        }
    }
}

impl SessionSettings {
    /// Simulated milliseconds after `ticks` ticks. Derived from the tick
    /// count so rates that don't divide 1000 don't accumulate rounding.
    pub fn elapsed_ms(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(1000) / u64::from(self.tick_rate_hz.max(1))
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vessel: VesselSettings,
    pub drift: DriftSettings,
    pub world: WorldSettings,
    pub session: SessionSettings,
}

/// Configuration could not be loaded or is inconsistent
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed settings: {e}"),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

fn check(cond: bool, msg: &str) -> Result<(), SettingsError> {
    if cond {
        Ok(())
    } else {
        Err(SettingsError::Invalid(msg.to_string()))
    }
}

fn check_range(range: (f32, f32), name: &str) -> Result<(), SettingsError> {
    check(
        range.0 >= 0.0 && range.0 <= range.1,
        &format!("{name} must satisfy 0 <= min <= max"),
    )
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject combinations the simulation can't run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let v = &self.vessel;
        check(v.max_force > 0.0, "vessel.max_force must be positive")?;
        check(
            v.force_increment > 0.0 && v.force_increment <= v.max_force,
            "vessel.force_increment must be in (0, max_force]",
        )?;
        check(v.radius >= 0.0, "vessel.radius must not be negative")?;
        check(
            v.momentum_damping > 0.0 && v.momentum_damping <= 1.0,
            "vessel.momentum_damping must be in (0, 1]",
        )?;
        check(
            v.emergency_damping > 0.0 && v.emergency_damping <= v.momentum_damping,
            "vessel.emergency_damping must be in (0, momentum_damping]",
        )?;
        check(
            v.warning_speed >= 0.0 && v.warning_speed < v.emergency_speed,
            "vessel.warning_speed must be below emergency_speed",
        )?;
        check(
            v.angular_damping > 0.0 && v.angular_damping <= 1.0,
            "vessel.angular_damping must be in (0, 1]",
        )?;
        check(v.max_angular_velocity >= 0.0, "vessel.max_angular_velocity must not be negative")?;

        let d = &self.drift;
        check(d.fixed_magnitude >= 0.0, "drift.fixed_magnitude must not be negative")?;
        check_range((d.min_magnitude, d.max_magnitude), "drift magnitude")?;
        check(
            d.mode == DriftMode::Fixed || d.change_interval_ms > 0,
            "drift.change_interval_ms must be positive in Periodic mode",
        )?;

        let w = &self.world;
        check(w.boundary > 0.0, "world.boundary must be positive")?;
        check(w.min_feature_distance > 0.0, "world.min_feature_distance must be positive")?;
        check(
            w.max_docking_speed >= 0.0 && w.max_docking_speed <= w.max_safe_speed,
            "world.max_docking_speed must be in [0, max_safe_speed]",
        )?;
        check_range(w.rock_distance, "world.rock_distance")?;
        check_range(w.rock_size, "world.rock_size")?;
        check_range(w.island_distance, "world.island_distance")?;
        check_range(w.island_size, "world.island_size")?;
        check_range(w.vessel_distance, "world.vessel_distance")?;
        check_range(w.target_distance, "world.target_distance")?;
        check(w.target_radius > 0.0, "world.target_radius must be positive")?;
        check(
            w.target_distance.1 + w.target_radius <= w.boundary,
            "world.target_distance max plus target_radius must fit inside boundary",
        )?;
        check(w.max_placement_attempts > 0, "world.max_placement_attempts must be positive")?;

        if let CheckpointPolicy::Periodic { interval_ms } = self.session.checkpoint {
            check(interval_ms > 0, "session.checkpoint interval must be positive")?;
        }
        check(self.session.tick_rate_hz > 0, "session.tick_rate_hz must be positive")?;
        Ok(())
    }

    /// Settings with no current, for tests and calm-water practice
    pub fn calm() -> Self {
        let mut settings = Self::default();
        settings.drift.mode = DriftMode::Fixed;
        settings.drift.fixed_magnitude = 0.0;
        settings
    }
}
