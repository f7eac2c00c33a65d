//! Water current acting on the vessel
//!
//! Direction is in degrees using the same convention as the vector formula
//! `(sin(dir) * mag, cos(dir) * mag)`, so 0° pushes toward +Y.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::{DriftMode, DriftSettings};

/// The current: fixed for a session or periodically redrawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftField {
    pub mode: DriftMode,
    /// Always >= 0
    pub magnitude: f32,
    /// Degrees in [0, 360)
    pub direction: f32,
    /// Simulation time (ms) of the next redraw in `Periodic` mode
    pub next_change_ms: u64,
    vector: Vec2,
}

impl DriftField {
    /// Fresh field for a new session, starting at `now_ms`
    pub fn new<R: Rng>(settings: &DriftSettings, rng: &mut R, now_ms: u64) -> Self {
        let mut field = Self {
            mode: settings.mode,
            magnitude: 0.0,
            direction: 0.0,
            next_change_ms: now_ms.saturating_add(settings.change_interval_ms),
            vector: Vec2::ZERO,
        };
        match settings.mode {
            DriftMode::Fixed => {
                let direction = rng.random_range(0..360) as f32;
                field.set(settings.fixed_magnitude, direction);
            }
            DriftMode::Periodic => field.resample(settings, rng),
        }
        field
    }

    /// Field with an explicit magnitude and direction that never changes
    pub fn fixed(magnitude: f32, direction: f32) -> Self {
        let mut field = Self {
            mode: DriftMode::Fixed,
            magnitude: 0.0,
            direction: 0.0,
            next_change_ms: u64::MAX,
            vector: Vec2::ZERO,
        };
        field.set(magnitude, direction);
        field
    }

    /// Set magnitude/direction and recompute the vector
    pub fn set(&mut self, magnitude: f32, direction: f32) {
        self.magnitude = magnitude.max(0.0);
        self.direction = crate::normalize_degrees(direction);
        let rad = self.direction.to_radians();
        self.vector = Vec2::new(rad.sin() * self.magnitude, rad.cos() * self.magnitude);
    }

    fn resample<R: Rng>(&mut self, settings: &DriftSettings, rng: &mut R) {
        let magnitude = if settings.max_magnitude > settings.min_magnitude {
            rng.random_range(settings.min_magnitude..=settings.max_magnitude)
        } else {
            settings.min_magnitude
        };
        let direction = rng.random_range(0.0..360.0);
        self.set(magnitude, direction);
    }

    /// Advance to `now_ms`. Returns true if the current changed.
    pub fn update<R: Rng>(&mut self, settings: &DriftSettings, rng: &mut R, now_ms: u64) -> bool {
        if self.mode != DriftMode::Periodic || now_ms < self.next_change_ms {
            return false;
        }
        self.resample(settings, rng);
        self.next_change_ms = now_ms.saturating_add(settings.change_interval_ms);
        log::debug!(
            "Current changed: {:.2} @ {:.0} deg",
            self.magnitude,
            self.direction
        );
        true
    }

    /// Velocity added to the vessel every tick
    #[inline]
    pub fn vector(&self) -> Vec2 {
        self.vector
    }
}
