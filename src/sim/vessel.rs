//! The player's vessel and its dynamics
//!
//! Four directional force accumulators drive a momentum integrator. Opposing
//! accumulators cancel each other before building up, so in steady state at
//! most one side of each axis carries force.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;
use crate::settings::{RotationMode, VesselSettings};

/// Thrust direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Forward,
    Backward,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Forward, Side::Backward];

    /// The side on the same axis that cancels this one
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Forward => Side::Backward,
            Side::Backward => Side::Forward,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::Forward => 2,
            Side::Backward => 3,
        }
    }
}

/// Turn direction for rotate intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

/// One force accumulator plus its "held" flag for the force indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceChannel {
    /// In [0, max_force]
    pub magnitude: f32,
    pub active: bool,
}

/// The player's vessel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub pos: Vec2,
    /// Momentum plus drift, recomputed every tick
    vel: Vec2,
    pub momentum: Vec2,
    /// Degrees in [0, 360), 0 = up
    pub heading: f32,
    /// Degrees per tick
    pub angular_vel: f32,
    forces: [ForceChannel; 4],
    pub docked: bool,
}

impl Vessel {
    /// New vessel at `spawn`, docked if docking is enabled
    pub fn new(settings: &VesselSettings, spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            momentum: Vec2::ZERO,
            heading: 0.0,
            angular_vel: 0.0,
            forces: [ForceChannel::default(); 4],
            docked: settings.docking_enabled,
        }
    }

    /// Back to spawn defaults: position, motion, heading and all accumulators
    pub fn reset(&mut self, settings: &VesselSettings, spawn: Vec2) {
        *self = Self::new(settings, spawn);
    }

    /// Return to a checkpoint with motion, heading and force cleared
    pub fn rollback(&mut self, checkpoint: Vec2) {
        self.pos = checkpoint;
        self.vel = Vec2::ZERO;
        self.momentum = Vec2::ZERO;
        self.heading = 0.0;
        self.angular_vel = 0.0;
        self.forces = [ForceChannel::default(); 4];
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn force(&self, side: Side) -> ForceChannel {
        self.forces[side.index()]
    }

    /// One discrete "increase force" step on `side`.
    ///
    /// Drains the opposing accumulator by one increment first; `side` only
    /// grows once its opposite is empty.
    pub fn increase_force(&mut self, side: Side, settings: &VesselSettings) {
        let step = settings.force_increment;
        let (own, opposite) = (side.index(), side.opposite().index());
        if self.forces[opposite].magnitude > 0.0 {
            self.forces[opposite].magnitude = (self.forces[opposite].magnitude - step).max(0.0);
        } else {
            self.forces[own].magnitude = (self.forces[own].magnitude + step).min(settings.max_force);
        }
        self.forces[opposite].active = false;
        self.forces[own].active = true;
    }

    /// Key/pointer release. Accumulated force stays.
    pub fn release_force(&mut self, side: Side) {
        self.forces[side.index()].active = false;
    }

    /// Set an accumulator directly, clamped into [0, max_force]
    pub fn set_force(&mut self, side: Side, value: f32, settings: &VesselSettings) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.forces[side.index()].magnitude = value.clamp(0.0, settings.max_force);
    }

    /// Fixed-step heading change for keyed rotation
    pub fn rotate(&mut self, turn: Turn, settings: &VesselSettings) {
        if settings.rotation != RotationMode::Keyed {
            return;
        }
        let step = match turn {
            Turn::Clockwise => settings.rotation_step,
            Turn::CounterClockwise => -settings.rotation_step,
        };
        self.heading = normalize_degrees(self.heading + step);
    }

    /// Leave the dock with no residual motion
    pub fn undock(&mut self) {
        self.docked = false;
        self.vel = Vec2::ZERO;
        self.momentum = Vec2::ZERO;
    }

    /// Tie up: motion stops until the next undock
    pub fn dock(&mut self) {
        self.docked = true;
        self.vel = Vec2::ZERO;
        self.momentum = Vec2::ZERO;
    }

    /// Advance one tick under the given current
    pub fn integrate(&mut self, drift: Vec2, settings: &VesselSettings) {
        if settings.rotation == RotationMode::ForceDriven {
            self.integrate_rotation(settings);
        }

        if self.docked {
            self.vel = Vec2::ZERO;
            self.momentum = Vec2::ZERO;
            return;
        }

        let max = settings.max_force;
        let horizontal = (self.force(Side::Left).magnitude - self.force(Side::Right).magnitude) / max;
        let vertical =
            (self.force(Side::Backward).magnitude - self.force(Side::Forward).magnitude) / max;
        let movement = Vec2::new(horizontal, vertical) * settings.speed;

        let damping = damping_for_speed(self.vel.length(), settings);
        self.momentum = (self.momentum + movement) * damping;
        self.vel = self.momentum + drift;
        self.pos += self.vel;
    }

    fn integrate_rotation(&mut self, settings: &VesselSettings) {
        let torque = (self.force(Side::Left).magnitude - self.force(Side::Right).magnitude)
            * settings.force_to_rotation;
        let limit = settings.max_angular_velocity;
        self.angular_vel = ((self.angular_vel + torque) * settings.angular_damping).clamp(-limit, limit);
        self.heading = normalize_degrees(self.heading + self.angular_vel);
    }
}

/// Momentum damping for the speed reached on the previous tick.
///
/// Base damping up to the warning speed, emergency damping from the
/// emergency speed on, linear blend in between.
pub fn damping_for_speed(speed: f32, settings: &VesselSettings) -> f32 {
    let warning = settings.warning_speed;
    let emergency = settings.emergency_speed;
    if speed > emergency {
        settings.emergency_damping
    } else if speed > warning {
        let t = (speed - warning) / (emergency - warning);
        settings.momentum_damping * (1.0 - t) + settings.emergency_damping * t
    } else {
        settings.momentum_damping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> VesselSettings {
        VesselSettings::default()
    }

    #[test]
    fn test_increase_force_builds_up() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        for _ in 0..5 {
            v.increase_force(Side::Left, &s);
        }
        assert_eq!(v.force(Side::Left).magnitude, 5.0);
        assert!(v.force(Side::Left).active);
        assert_eq!(v.force(Side::Right).magnitude, 0.0);
    }

    #[test]
    fn test_opposing_force_drains_first() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        for _ in 0..3 {
            v.increase_force(Side::Forward, &s);
        }
        v.increase_force(Side::Backward, &s);
        assert_eq!(v.force(Side::Forward).magnitude, 2.0);
        assert_eq!(v.force(Side::Backward).magnitude, 0.0);
        assert!(!v.force(Side::Forward).active);

        v.increase_force(Side::Backward, &s);
        v.increase_force(Side::Backward, &s);
        assert_eq!(v.force(Side::Forward).magnitude, 0.0);
        assert_eq!(v.force(Side::Backward).magnitude, 0.0);

        v.increase_force(Side::Backward, &s);
        assert_eq!(v.force(Side::Backward).magnitude, 1.0);
    }

    #[test]
    fn test_force_capped_at_max() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        for _ in 0..250 {
            v.increase_force(Side::Right, &s);
        }
        assert_eq!(v.force(Side::Right).magnitude, s.max_force);
    }

    #[test]
    fn test_release_keeps_magnitude() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.increase_force(Side::Left, &s);
        v.release_force(Side::Left);
        assert!(!v.force(Side::Left).active);
        assert_eq!(v.force(Side::Left).magnitude, 1.0);
    }

    #[test]
    fn test_set_force_clamps() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.set_force(Side::Left, -5.0, &s);
        assert_eq!(v.force(Side::Left).magnitude, 0.0);
        v.set_force(Side::Left, 1e6, &s);
        assert_eq!(v.force(Side::Left).magnitude, s.max_force);
        v.set_force(Side::Left, f32::NAN, &s);
        assert_eq!(v.force(Side::Left).magnitude, 0.0);
    }

    #[test]
    fn test_damping_bands() {
        let s = settings();
        assert_eq!(damping_for_speed(0.0, &s), s.momentum_damping);
        assert_eq!(damping_for_speed(s.warning_speed, &s), s.momentum_damping);
        assert_eq!(damping_for_speed(s.emergency_speed + 1.0, &s), s.emergency_damping);
        let mid = damping_for_speed((s.warning_speed + s.emergency_speed) / 2.0, &s);
        let expected = (s.momentum_damping + s.emergency_damping) / 2.0;
        assert!((mid - expected).abs() < 1e-5);
    }

    #[test]
    fn test_docked_vessel_does_not_move() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        assert!(v.docked);
        v.set_force(Side::Forward, 50.0, &s);
        v.integrate(Vec2::new(2.0, 1.0), &s);
        assert_eq!(v.pos, Vec2::ZERO);
        assert_eq!(v.velocity(), Vec2::ZERO);
        assert_eq!(v.momentum, Vec2::ZERO);
    }

    #[test]
    fn test_docked_vessel_can_still_rotate() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.rotate(Turn::CounterClockwise, &s);
        assert!((v.heading - (360.0 - s.rotation_step)).abs() < 1e-4);

        let s = VesselSettings {
            rotation: RotationMode::ForceDriven,
            ..Default::default()
        };
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.set_force(Side::Left, 100.0, &s);
        v.integrate(Vec2::ZERO, &s);
        assert!(v.heading > 0.0);
        assert_eq!(v.pos, Vec2::ZERO);
    }

    #[test]
    fn test_forward_force_moves_up() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.undock();
        v.set_force(Side::Forward, s.max_force, &s);
        v.integrate(Vec2::ZERO, &s);
        // momentum = (0 + (0, -speed)) * damping
        assert!((v.momentum.y + s.speed * s.momentum_damping).abs() < 1e-5);
        assert_eq!(v.pos, v.velocity());
    }

    #[test]
    fn test_drift_adds_to_velocity_not_momentum() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.undock();
        let drift = Vec2::new(0.5, -0.25);
        v.integrate(drift, &s);
        assert_eq!(v.momentum, Vec2::ZERO);
        assert_eq!(v.velocity(), drift);
        assert_eq!(v.pos, drift);
    }

    #[test]
    fn test_angular_velocity_clamped() {
        let s = VesselSettings {
            rotation: RotationMode::ForceDriven,
            force_to_rotation: 10.0,
            ..Default::default()
        };
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.undock();
        v.set_force(Side::Right, s.max_force, &s);
        for _ in 0..100 {
            v.integrate(Vec2::ZERO, &s);
            assert!(v.angular_vel.abs() <= s.max_angular_velocity);
            assert!((0.0..360.0).contains(&v.heading));
        }
    }

    #[test]
    fn test_keyed_rotation_ignored_in_other_modes() {
        let s = VesselSettings {
            rotation: RotationMode::Disabled,
            ..Default::default()
        };
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.rotate(Turn::Clockwise, &s);
        assert_eq!(v.heading, 0.0);
    }

    #[test]
    fn test_rollback_clears_motion_heading_and_forces() {
        let s = settings();
        let mut v = Vessel::new(&s, Vec2::ZERO);
        v.undock();
        v.set_force(Side::Left, 40.0, &s);
        for _ in 0..10 {
            v.integrate(Vec2::new(1.0, 0.0), &s);
        }
        for _ in 0..5 {
            v.rotate(Turn::Clockwise, &s);
        }
        v.rollback(Vec2::new(5.0, 5.0));
        assert_eq!(v.pos, Vec2::new(5.0, 5.0));
        assert_eq!(v.heading, 0.0);
        assert_eq!(v.angular_vel, 0.0);
        assert_eq!(v.velocity(), Vec2::ZERO);
        assert_eq!(v.momentum, Vec2::ZERO);
        for side in Side::ALL {
            assert_eq!(v.force(side), ForceChannel::default());
        }
    }
}
