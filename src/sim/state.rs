//! Session state
//!
//! Everything one run owns: vessel, feature map, current, phase, checkpoint
//! and the transient notifications shown on top of the game.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionOutcome;
use super::drift::DriftField;
use super::vessel::Vessel;
use super::world::{Feature, WorldGenerator, target_island};
use crate::{heading_to_vector, normalize_degrees};
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Instructions on screen, waiting for the first intent
    Instructions,
    /// Active simulation
    Playing,
    /// Simulation frozen; `resume_at_ms` set when paused for a notification
    Paused { resume_at_ms: Option<u64> },
    /// Docked at the target island
    Win,
    /// Run ended by a crash or a wrong landing
    Fail { outcome: CollisionOutcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Instructions,
    BoundaryWarning,
    SpeedWarning,
    Outcome,
}

/// A message for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Simulation time (ms) it disappears; `None` stays until the phase changes
    pub expires_at_ms: Option<u64>,
}

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Undocked,
    DriftChanged { magnitude: f32, direction: f32 },
    CheckpointSaved { pos: Vec2 },
    CheckpointRollback { from: Vec2, to: Vec2 },
    Won,
    Failed { outcome: CollisionOutcome },
    Restarted { run: u32 },
}

/// Distance and compass bearing from the vessel to the target island
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub distance: f32,
    /// Degrees, 0 = up, clockwise
    pub bearing: f32,
    /// Bearing relative to the vessel's heading
    pub relative_bearing: f32,
}

pub const INSTRUCTIONS_TEXT: &str =
    "Arrow keys build thrust on each side. Push forward to leave the dock. \
     Reach the target island slowly to dock. Avoid rocks, other islands and boats.";

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG started from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Number of restarts so far
    pub run: u32,
    pub time_ticks: u64,
    pub time_ms: u64,
    pub phase: GamePhase,
    pub spawn: Vec2,
    pub vessel: Vessel,
    pub features: Vec<Feature>,
    pub drift: DriftField,
    /// Last known safe position
    pub checkpoint: Vec2,
    pub last_checkpoint_ms: u64,
    /// Outcome of the most recent simulated tick
    pub last_outcome: CollisionOutcome,
    pub notifications: Vec<Notification>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed, showing the instructions
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let spawn = Vec2::ZERO;
        let mut rng = Pcg32::seed_from_u64(seed);
        let features = WorldGenerator::new(&settings.world, spawn, settings.vessel.radius)
            .generate(&mut rng);
        let drift = DriftField::new(&settings.drift, &mut rng, 0);
        log::info!("Session created with seed {seed}");

        let mut state = Self {
            seed,
            rng,
            run: 0,
            time_ticks: 0,
            time_ms: 0,
            phase: GamePhase::Instructions,
            spawn,
            vessel: Vessel::new(&settings.vessel, spawn),
            features,
            drift,
            checkpoint: spawn,
            last_checkpoint_ms: 0,
            last_outcome: CollisionOutcome::NoCollision,
            notifications: Vec::new(),
            events: Vec::new(),
        };
        state.show_instructions();
        state
    }

    /// Whether vessel dynamics and collisions run this tick
    pub fn is_simulating(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// New world, vessel and current in one step, back to the start
    pub fn restart(&mut self, settings: &Settings) {
        let features = WorldGenerator::new(&settings.world, self.spawn, settings.vessel.radius)
            .generate(&mut self.rng);
        let drift = DriftField::new(&settings.drift, &mut self.rng, self.time_ms);

        self.features = features;
        self.drift = drift;
        self.vessel.reset(&settings.vessel, self.spawn);
        self.checkpoint = self.spawn;
        self.last_checkpoint_ms = self.time_ms;
        self.last_outcome = CollisionOutcome::NoCollision;
        self.notifications.clear();
        self.run += 1;

        if settings.session.instructions_on_restart {
            self.phase = GamePhase::Instructions;
            self.show_instructions();
        } else {
            self.phase = GamePhase::Playing;
        }
        self.events.push(GameEvent::Restarted { run: self.run });
        log::info!("Restarted (run {})", self.run);
    }

    fn show_instructions(&mut self) {
        self.notifications.push(Notification {
            kind: NotificationKind::Instructions,
            message: INSTRUCTIONS_TEXT.to_string(),
            expires_at_ms: None,
        });
    }

    /// Raise (or refresh) a transient notification of `kind`
    pub fn notify(&mut self, kind: NotificationKind, message: &str, duration_ms: u64) {
        let expires_at_ms = Some(self.time_ms.saturating_add(duration_ms));
        if let Some(existing) = self.notifications.iter_mut().find(|n| n.kind == kind) {
            existing.message = message.to_string();
            existing.expires_at_ms = expires_at_ms;
        } else {
            self.notifications.push(Notification {
                kind,
                message: message.to_string(),
                expires_at_ms,
            });
        }
    }

    /// Notification that stays until the next phase change
    pub fn notify_persistent(&mut self, kind: NotificationKind, message: &str) {
        self.notifications.retain(|n| n.kind != kind);
        self.notifications.push(Notification {
            kind,
            message: message.to_string(),
            expires_at_ms: None,
        });
    }

    pub fn dismiss(&mut self, kind: NotificationKind) {
        self.notifications.retain(|n| n.kind != kind);
    }

    /// Drop notifications whose time is up
    pub fn expire_notifications(&mut self) {
        let now = self.time_ms;
        self.notifications
            .retain(|n| n.expires_at_ms.is_none_or(|t| t > now));
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn target(&self) -> Option<&Feature> {
        target_island(&self.features)
    }

    /// Compass readout toward the target island
    pub fn navigation(&self) -> Option<Navigation> {
        let target = self.target()?;
        let delta = target.pos - self.vessel.pos;
        // Heading convention: 0 = -Y, 90 = +X
        let bearing = normalize_degrees(delta.x.atan2(-delta.y).to_degrees());
        // Clockwise from the bow, since +Y points down
        let off_bow = heading_to_vector(self.vessel.heading).angle_to(delta);
        Some(Navigation {
            distance: delta.length(),
            bearing,
            relative_bearing: normalize_degrees(off_bow.to_degrees()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::world::FeatureKind;

    #[test]
    fn test_new_session_shows_instructions() {
        let settings = Settings::default();
        let state = GameState::new(&settings, 1);
        assert_eq!(state.phase, GamePhase::Instructions);
        assert!(!state.is_simulating());
        assert!(state.vessel.docked);
        assert_eq!(state.vessel.pos, Vec2::ZERO);
        assert_eq!(state.checkpoint, Vec2::ZERO);
        assert!(
            state
                .notifications
                .iter()
                .any(|n| n.kind == NotificationKind::Instructions && n.expires_at_ms.is_none())
        );
    }

    #[test]
    fn test_notifications_expire() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        state.dismiss(NotificationKind::Instructions);
        state.notify(NotificationKind::BoundaryWarning, "out", 100);
        state.time_ms = 99;
        state.expire_notifications();
        assert_eq!(state.notifications.len(), 1);
        state.time_ms = 100;
        state.expire_notifications();
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_notify_refreshes_same_kind() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        state.notify(NotificationKind::SpeedWarning, "slow down", 100);
        state.time_ms = 50;
        state.notify(NotificationKind::SpeedWarning, "slow down!", 100);
        let warnings: Vec<_> = state
            .notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::SpeedWarning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].expires_at_ms, Some(150));
        assert_eq!(warnings[0].message, "slow down!");
    }

    #[test]
    fn test_navigation_bearing() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        state.features = vec![Feature::new(
            FeatureKind::TargetIsland,
            Vec2::new(500.0, 0.0),
            80.0,
        )];
        let nav = state.navigation().unwrap();
        assert!((nav.distance - 500.0).abs() < 1e-3);
        assert!((nav.bearing - 90.0).abs() < 1e-3);

        state.vessel.heading = 30.0;
        let nav = state.navigation().unwrap();
        assert!((nav.relative_bearing - 60.0).abs() < 1e-3);

        // Target off the port side
        state.vessel.heading = 0.0;
        state.features[0].pos = Vec2::new(-500.0, 0.0);
        let nav = state.navigation().unwrap();
        assert!((nav.relative_bearing - 270.0).abs() < 1e-3);
        assert!((nav.bearing - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_notification_expiry_saturates() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        state.time_ms = 10;
        state.notify(NotificationKind::SpeedWarning, "slow down", u64::MAX);
        let warning = state
            .notifications
            .iter()
            .find(|n| n.kind == NotificationKind::SpeedWarning)
            .unwrap();
        assert_eq!(warning.expires_at_ms, Some(u64::MAX));
    }

    #[test]
    fn test_restart_replaces_world() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        let before = state.features.clone();
        state.vessel.undock();
        state.vessel.pos = Vec2::new(100.0, 100.0);
        state.phase = GamePhase::Win;
        state.restart(&settings);
        assert_ne!(state.features, before);
        assert_eq!(state.vessel.pos, Vec2::ZERO);
        assert!(state.vessel.docked);
        assert_eq!(state.phase, GamePhase::Instructions);
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted { run: 1 }]);
        assert!(state.events.is_empty());
    }
}
