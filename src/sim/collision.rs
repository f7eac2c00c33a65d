//! Collision and docking classification
//!
//! Speed is checked before feature type in every branch: a reckless approach
//! to the target island is a crash, never a dock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{Feature, FeatureKind};
use crate::settings::WorldSettings;

/// Outcome of one tick's collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    NoCollision,
    /// Over the general speed ceiling, anywhere
    CrashSpeedGeneral,
    /// Touched a feature above the docking speed
    CrashSpeedDock,
    DockSuccess,
    /// Touched something that is not the target (island, tree, boat)
    DockFail,
    RockCollision,
}

impl CollisionOutcome {
    /// Whether this outcome ends the run in failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CollisionOutcome::CrashSpeedGeneral
                | CollisionOutcome::CrashSpeedDock
                | CollisionOutcome::DockFail
                | CollisionOutcome::RockCollision
        )
    }

    /// Player-facing explanation
    pub fn message(&self) -> &'static str {
        match self {
            CollisionOutcome::NoCollision => "",
            CollisionOutcome::CrashSpeedGeneral => "Mission Failed! You lost control at high speed",
            CollisionOutcome::CrashSpeedDock => "Mission Failed! Came in too fast and crashed",
            CollisionOutcome::DockSuccess => "You reached the target island! Victory!",
            CollisionOutcome::DockFail => "Mission Failed! Hit wrong island!",
            CollisionOutcome::RockCollision => "Mission Failed! Ran aground on a rock",
        }
    }
}

/// Speed ceilings used by the resolver
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    pub max_safe_speed: f32,
    pub max_docking_speed: f32,
    pub boundary: f32,
}

impl CollisionResolver {
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            max_safe_speed: settings.max_safe_speed,
            max_docking_speed: settings.max_docking_speed,
            boundary: settings.boundary,
        }
    }

    /// Classify the vessel against the feature set. Exactly one outcome.
    ///
    /// The first overlapping feature in iteration order is reported; features
    /// are separated at generation so at most one overlaps in practice.
    pub fn resolve(
        &self,
        pos: Vec2,
        radius: f32,
        velocity: Vec2,
        features: &[Feature],
    ) -> CollisionOutcome {
        let speed = velocity.length();
        if speed > self.max_safe_speed {
            return CollisionOutcome::CrashSpeedGeneral;
        }

        let Some(hit) = features.iter().find(|f| overlaps(pos, radius, f)) else {
            return CollisionOutcome::NoCollision;
        };

        if speed > self.max_docking_speed {
            CollisionOutcome::CrashSpeedDock
        } else {
            match hit.kind {
                FeatureKind::TargetIsland => CollisionOutcome::DockSuccess,
                FeatureKind::Rock => CollisionOutcome::RockCollision,
                _ => CollisionOutcome::DockFail,
            }
        }
    }

    /// Outside the square world boundary (recoverable)
    #[inline]
    pub fn out_of_bounds(&self, pos: Vec2) -> bool {
        pos.x.abs() > self.boundary || pos.y.abs() > self.boundary
    }
}

/// Circle-circle overlap between the vessel and a feature
#[inline]
pub fn overlaps(pos: Vec2, radius: f32, feature: &Feature) -> bool {
    pos.distance(feature.pos) < feature.size + radius
}
