//! Simulation core
//!
//! Single-threaded fixed-step simulation. Per tick: drift update, vessel
//! integration, collision classification, session transition. No rendering,
//! audio or platform dependencies.

pub mod collision;
pub mod drift;
pub mod state;
pub mod tick;
pub mod vessel;
pub mod world;

pub use collision::{CollisionOutcome, CollisionResolver};
pub use drift::DriftField;
pub use state::{
    GameEvent, GamePhase, GameState, INSTRUCTIONS_TEXT, Navigation, Notification,
    NotificationKind,
};
pub use tick::{Intent, tick};
pub use vessel::{ForceChannel, Side, Turn, Vessel, damping_for_speed};
pub use world::{Feature, FeatureKind, WorldGenerator, target_island};
