//! Procedural feature map
//!
//! Features are scattered by rejection sampling in polar coordinates around
//! the spawn point. The target island goes last and must keep
//! `min_feature_distance` from everything already placed. Every loop here is
//! bounded: a crowded map degrades to skipped decorations and, for the
//! target, a far-field placement that satisfies the separation by
//! construction. The target always lies fully inside the world boundary.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::settings::WorldSettings;

/// Feature types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    Rock,
    Island,
    /// Decoration standing on an island
    Tree,
    /// Another boat; heading is cosmetic
    OtherVessel { heading: f32 },
    TargetIsland,
    StartingIsland,
}

impl FeatureKind {
    pub fn is_target(&self) -> bool {
        matches!(self, FeatureKind::TargetIsland)
    }
}

/// A placed feature. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
}

impl Feature {
    pub fn new(kind: FeatureKind, pos: Vec2, size: f32) -> Self {
        Self { kind, pos, size }
    }
}

/// Generates the feature set for a session
pub struct WorldGenerator<'a> {
    settings: &'a WorldSettings,
    /// Where the vessel spawns; nothing is placed within `min_feature_distance` of it
    spawn: Vec2,
    vessel_radius: f32,
}

impl<'a> WorldGenerator<'a> {
    pub fn new(settings: &'a WorldSettings, spawn: Vec2, vessel_radius: f32) -> Self {
        Self {
            settings,
            spawn,
            vessel_radius,
        }
    }

    /// Build a complete feature set. Exactly one `TargetIsland`, always last.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Feature> {
        let s = self.settings;
        let mut features: Vec<Feature> = Vec::new();

        if s.starting_island {
            // Directly behind the spawn, leaving a small gap to the hull
            let offset = s.starting_island_size + self.vessel_radius + 10.0;
            features.push(Feature::new(
                FeatureKind::StartingIsland,
                self.spawn + Vec2::new(0.0, offset),
                s.starting_island_size,
            ));
        }

        for _ in 0..s.rock_count {
            let size = sample_range(rng, s.rock_size);
            if let Some(pos) = self.place(rng, s.rock_distance, &features) {
                features.push(Feature::new(FeatureKind::Rock, pos, size));
            }
        }

        for _ in 0..s.island_count {
            let size = sample_range(rng, s.island_size);
            if let Some(pos) = self.place(rng, s.island_distance, &features) {
                features.push(Feature::new(FeatureKind::Island, pos, size));
                let trees = rng.random_range(2..=4);
                let ring = size * s.tree_ring_ratio;
                let phase = rng.random_range(0.0..TAU);
                for i in 0..trees {
                    let theta = phase + TAU * i as f32 / trees as f32;
                    features.push(Feature::new(
                        FeatureKind::Tree,
                        pos + polar_to_cartesian(ring, theta),
                        s.tree_size,
                    ));
                }
            }
        }

        for _ in 0..s.vessel_count {
            if let Some(pos) = self.place(rng, s.vessel_distance, &features) {
                let heading = rng.random_range(0.0..360.0);
                features.push(Feature::new(
                    FeatureKind::OtherVessel { heading },
                    pos,
                    s.vessel_size,
                ));
            }
        }

        let target = self.place_target(rng, &features);
        features.push(Feature::new(FeatureKind::TargetIsland, target, s.target_radius));

        log::info!(
            "Generated {} features, target at ({:.0}, {:.0})",
            features.len(),
            target.x,
            target.y
        );
        features
    }

    /// Sample a position `min_feature_distance` away from the spawn and from
    /// every non-tree feature. Trees belong to their island, so they are
    /// skipped here and only the target is checked against them.
    fn place<R: Rng>(&self, rng: &mut R, distance: (f32, f32), placed: &[Feature]) -> Option<Vec2> {
        let min = self.settings.min_feature_distance;
        for _ in 0..self.settings.max_placement_attempts {
            let pos = self.sample_polar(rng, distance);
            let clear = pos.distance(self.spawn) >= min
                && placed
                    .iter()
                    .filter(|f| f.kind != FeatureKind::Tree)
                    .all(|f| f.pos.distance(pos) >= min);
            if clear {
                return Some(pos);
            }
        }
        log::debug!("Could not place feature in range {:?}, skipping", distance);
        None
    }

    fn place_target<R: Rng>(&self, rng: &mut R, placed: &[Feature]) -> Vec2 {
        let s = self.settings;
        // Farthest the target may sit and still be fully inside the boundary
        let limit = (s.boundary - s.target_radius).max(0.0);
        let far_limit = (limit - self.spawn.abs().max_element()).max(0.0);
        let (mut near, mut far) = s.target_distance;
        for round in 0..=s.target_widen_rounds {
            far = far.min(far_limit);
            near = near.min(far);
            for _ in 0..s.max_placement_attempts {
                let pos = self.sample_polar(rng, (near, far));
                if self.target_clear(pos, placed) {
                    if round > 0 {
                        log::info!("Target placed after widening search range {round} time(s)");
                    }
                    return pos;
                }
            }
            near *= 0.5;
            far *= 1.5;
        }

        // Beyond the farthest feature the whole ring is empty
        let reach = placed
            .iter()
            .map(|f| f.pos.distance(self.spawn))
            .fold(0.0_f32, f32::max);
        let distance = reach.max(s.target_distance.0) + s.min_feature_distance + 1.0;
        if distance <= far_limit {
            let pos = self.spawn + polar_to_cartesian(distance, rng.random_range(0.0..TAU));
            log::warn!(
                "Target placement exhausted retries, falling back to far field at {:.0}",
                distance
            );
            return pos;
        }

        let pos = self.most_open_spot(placed, limit);
        let clearance = self.clearance(pos, placed);
        if clearance < s.min_feature_distance {
            log::warn!(
                "Map too crowded for target separation, placing at ({:.0}, {:.0}) with {:.0} clearance",
                pos.x,
                pos.y,
                clearance
            );
        } else {
            log::warn!(
                "Target placement exhausted retries, using open spot at ({:.0}, {:.0})",
                pos.x,
                pos.y
            );
        }
        pos
    }

    /// Grid point inside `[-limit, limit]` farthest from the spawn and every
    /// feature
    fn most_open_spot(&self, placed: &[Feature], limit: f32) -> Vec2 {
        let step = (self.settings.min_feature_distance * 0.5).max(1.0);
        let cells = (2.0 * limit / step).floor() as i32;
        let mut best = (Vec2::new(limit, limit), f32::MIN);
        for i in 0..=cells {
            for j in 0..=cells {
                let pos = Vec2::new(-limit + i as f32 * step, -limit + j as f32 * step);
                let clearance = self.clearance(pos, placed);
                if clearance > best.1 {
                    best = (pos, clearance);
                }
            }
        }
        best.0
    }

    /// Distance to the nearest feature or the spawn
    fn clearance(&self, pos: Vec2, placed: &[Feature]) -> f32 {
        placed
            .iter()
            .map(|f| f.pos.distance(pos))
            .fold(pos.distance(self.spawn), f32::min)
    }

    fn target_clear(&self, pos: Vec2, placed: &[Feature]) -> bool {
        let min = self.settings.min_feature_distance;
        pos.distance(self.spawn) >= min && placed.iter().all(|f| f.pos.distance(pos) >= min)
    }

    fn sample_polar<R: Rng>(&self, rng: &mut R, distance: (f32, f32)) -> Vec2 {
        let r = sample_range(rng, distance);
        let theta = rng.random_range(0.0..TAU);
        self.spawn + polar_to_cartesian(r, theta)
    }
}

fn sample_range<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// The target island, if the set has one
pub fn target_island(features: &[Feature]) -> Option<&Feature> {
    features.iter().find(|f| f.kind.is_target())
}
