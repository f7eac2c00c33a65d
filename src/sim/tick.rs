//! Fixed-step session tick
//!
//! Applies the frame's intents, then runs drift → vessel → collision →
//! phase transition strictly in that order. Only `Playing` simulates.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionOutcome, CollisionResolver};
use super::state::{GameEvent, GamePhase, GameState, NotificationKind};
use super::vessel::{Side, Turn};
use crate::settings::{CheckpointPolicy, Settings};

/// Control intents from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// One force step on a side (key press/repeat)
    IncreaseForce(Side),
    /// Key released; accumulated force stays
    ReleaseForce(Side),
    /// Tap on a control region, already mapped to its side
    PointerTap(Side),
    Undock,
    Rotate(Turn),
    TogglePause,
    Restart,
}

const BOUNDARY_WARNING: &str = "Out of bounds! Returned to last checkpoint";
const SPEED_WARNING: &str = "Slow down! Speed too high to dock";

/// Advance the session by one tick
pub fn tick(state: &mut GameState, settings: &Settings, intents: &[Intent]) {
    state.time_ticks += 1;
    state.time_ms = settings.session.elapsed_ms(state.time_ticks);
    state.expire_notifications();

    for &intent in intents {
        if apply_intent(state, settings, intent) == Applied::Restarted {
            // Later intents belonged to the run that just ended
            break;
        }
    }

    if let GamePhase::Paused {
        resume_at_ms: Some(resume_at),
    } = state.phase
    {
        if state.time_ms >= resume_at {
            state.phase = GamePhase::Playing;
        }
    }

    if !state.is_simulating() {
        return;
    }

    if state.drift.update(&settings.drift, &mut state.rng, state.time_ms) {
        state.events.push(GameEvent::DriftChanged {
            magnitude: state.drift.magnitude,
            direction: state.drift.direction,
        });
    }

    state.vessel.integrate(state.drift.vector(), &settings.vessel);

    if state.vessel.docked {
        state.last_outcome = CollisionOutcome::NoCollision;
        return;
    }

    let resolver = CollisionResolver::new(&settings.world);
    let outcome = resolver.resolve(
        state.vessel.pos,
        settings.vessel.radius,
        state.vessel.velocity(),
        &state.features,
    );
    state.last_outcome = outcome;

    match outcome {
        CollisionOutcome::DockSuccess => {
            state.vessel.dock();
            state.phase = GamePhase::Win;
            state.notify_persistent(
                NotificationKind::Outcome,
                &format!("{} Press R to play again", outcome.message()),
            );
            state.events.push(GameEvent::Won);
            log::info!("Docked at target after {} ms", state.time_ms);
        }
        o if o.is_failure() => {
            state.phase = GamePhase::Fail { outcome };
            state.notify_persistent(
                NotificationKind::Outcome,
                &format!("{} Press R to restart", outcome.message()),
            );
            state.events.push(GameEvent::Failed { outcome });
            log::info!(
                "Run failed: {:?} at ({:.0}, {:.0}), speed {:.2}",
                outcome,
                state.vessel.pos.x,
                state.vessel.pos.y,
                state.vessel.speed()
            );
        }
        _ if resolver.out_of_bounds(state.vessel.pos) => rollback(state, settings),
        _ => {
            if state.vessel.speed() > settings.vessel.warning_speed {
                state.notify(
                    NotificationKind::SpeedWarning,
                    SPEED_WARNING,
                    settings.session.notification_ms,
                );
            }
            record_checkpoint(state, settings);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Continue,
    Restarted,
}

fn apply_intent(state: &mut GameState, settings: &Settings, intent: Intent) -> Applied {
    match state.phase {
        GamePhase::Instructions => {
            state.dismiss(NotificationKind::Instructions);
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::Started);
        }
        GamePhase::Playing => apply_control(state, settings, intent),
        GamePhase::Paused { .. } => {
            if intent == Intent::TogglePause {
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Win | GamePhase::Fail { .. } => {
            if intent == Intent::Restart {
                state.restart(settings);
                return Applied::Restarted;
            }
        }
    }
    Applied::Continue
}

fn apply_control(state: &mut GameState, settings: &Settings, intent: Intent) {
    let vessel_settings = &settings.vessel;
    match intent {
        Intent::IncreaseForce(side) | Intent::PointerTap(side) => {
            if side == Side::Forward && state.vessel.docked {
                undock(state);
            }
            state.vessel.increase_force(side, vessel_settings);
        }
        Intent::ReleaseForce(side) => state.vessel.release_force(side),
        Intent::Undock => {
            if state.vessel.docked {
                undock(state);
            }
        }
        Intent::Rotate(turn) => state.vessel.rotate(turn, vessel_settings),
        Intent::TogglePause => state.phase = GamePhase::Paused { resume_at_ms: None },
        Intent::Restart => {}
    }
}

fn undock(state: &mut GameState) {
    state.vessel.undock();
    state.events.push(GameEvent::Undocked);
}

fn rollback(state: &mut GameState, settings: &Settings) {
    let from = state.vessel.pos;
    let to = state.checkpoint;
    state.vessel.rollback(to);
    state.notify(
        NotificationKind::BoundaryWarning,
        BOUNDARY_WARNING,
        settings.session.notification_ms,
    );
    state.events.push(GameEvent::CheckpointRollback { from, to });
    log::warn!(
        "Boundary crossed at ({:.0}, {:.0}), rolled back to ({:.0}, {:.0})",
        from.x,
        from.y,
        to.x,
        to.y
    );

    let pause = settings.session.rollback_pause_ms;
    if pause > 0 {
        state.phase = GamePhase::Paused {
            resume_at_ms: Some(state.time_ms.saturating_add(pause)),
        };
    }
}

fn record_checkpoint(state: &mut GameState, settings: &Settings) {
    let CheckpointPolicy::Periodic { interval_ms } = settings.session.checkpoint else {
        return;
    };
    if state.time_ms.saturating_sub(state.last_checkpoint_ms) < interval_ms
        || state.vessel.speed() > settings.vessel.warning_speed
    {
        return;
    }
    state.checkpoint = state.vessel.pos;
    state.last_checkpoint_ms = state.time_ms;
    state.events.push(GameEvent::CheckpointSaved {
        pos: state.checkpoint,
    });
    log::debug!(
        "Checkpoint at ({:.0}, {:.0})",
        state.checkpoint.x,
        state.checkpoint.y
    );
}
