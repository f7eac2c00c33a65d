//! Pointer control regions
//!
//! Four tap targets arranged around the vessel on screen. Regions are a pure
//! function of the vessel's screen position and the viewport, recomputed
//! whenever they are needed.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Side;

/// Arrow length along its pointing axis
pub const ARROW_WIDTH: f32 = 30.0;
/// Arrow thickness across its pointing axis
pub const ARROW_HEIGHT: f32 = 15.0;
/// Extra slack around each arrow for easier tapping
pub const HIT_SLACK: f32 = 10.0;
pub const MAX_SPACING: f32 = 60.0;
pub const EDGE_PADDING: f32 = 10.0;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Half-open containment, like most windowing toolkits
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x < max.x && p.y >= self.min.y && p.y < max.y
    }
}

/// A tap that could not be turned into an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// Coordinates were NaN or infinite
    InvalidPoint,
    /// The tap landed outside every control region
    OutsideRegions,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::InvalidPoint => write!(f, "tap position is not a finite point"),
            RegionError::OutsideRegions => write!(f, "tap is outside the control regions"),
        }
    }
}

impl std::error::Error for RegionError {}

/// The four directional tap targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRegions {
    pub left: Rect,
    pub right: Rect,
    pub forward: Rect,
    pub backward: Rect,
}

impl ControlRegions {
    /// Regions around `center` (vessel position in screen space), kept
    /// inside a `viewport`-sized screen.
    pub fn around(center: Vec2, viewport: Vec2) -> Self {
        let spacing = MAX_SPACING.min((viewport.x / 6.0).floor());
        let clamp_x = |x: f32| x.min(viewport.x - ARROW_WIDTH - EDGE_PADDING).max(EDGE_PADDING);
        let clamp_y = |y: f32| y.min(viewport.y - ARROW_WIDTH - EDGE_PADDING).max(EDGE_PADDING);

        let left_x = clamp_x(center.x - spacing);
        let right_x = clamp_x(center.x + spacing);
        let up_y = clamp_y(center.y - spacing);
        let down_y = clamp_y(center.y + spacing);

        let half_h = (ARROW_HEIGHT / 2.0).floor();
        let half_w = (ARROW_WIDTH / 2.0).floor();
        let horizontal = (ARROW_WIDTH + HIT_SLACK, ARROW_HEIGHT + HIT_SLACK);
        let vertical = (ARROW_HEIGHT + HIT_SLACK, ARROW_WIDTH + HIT_SLACK);

        Self {
            left: Rect::new(left_x - ARROW_WIDTH, center.y - half_h, horizontal.0, horizontal.1),
            right: Rect::new(right_x, center.y - half_h, horizontal.0, horizontal.1),
            forward: Rect::new(center.x - half_h, up_y - half_w, vertical.0, vertical.1),
            backward: Rect::new(center.x - half_h, down_y, vertical.0, vertical.1),
        }
    }

    pub fn region(&self, side: Side) -> &Rect {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Forward => &self.forward,
            Side::Backward => &self.backward,
        }
    }

    /// Map a tap to a side. Checked in left, right, forward, backward order.
    pub fn hit(&self, point: Vec2) -> Result<Side, RegionError> {
        if !point.is_finite() {
            return Err(RegionError::InvalidPoint);
        }
        Side::ALL
            .into_iter()
            .find(|&side| self.region(side).contains(point))
            .ok_or(RegionError::OutsideRegions)
    }
}
