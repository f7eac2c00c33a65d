//! Island Navigator entry point
//!
//! Headless driver: loads settings, runs one session under a simple
//! autopilot until it ends, and prints what happened. Rendering and input
//! translation live outside this crate.
//!
//! Usage: `island-navigator [seed] [settings.json]`

use glam::Vec2;

use island_navigator::Settings;
use island_navigator::sim::{GameEvent, GamePhase, GameState, Intent, Side, tick};

/// Give up after this many ticks (10 minutes at 60 Hz)
const MAX_TICKS: u64 = 60 * 60 * 10;
/// Approach speed the autopilot aims for, below the docking ceiling
const CRUISE_SPEED: f32 = 1.5;
const DEADBAND: f32 = 0.05;

fn main() {
    env_logger::init();
    log::info!("Island Navigator (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("seed must be an unsigned integer: {e}");
            std::process::exit(2);
        }
        None => 12345,
    };
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut state = GameState::new(&settings, seed);
    // Dismiss the instructions, then leave the dock
    tick(&mut state, &settings, &[Intent::Undock]);
    tick(&mut state, &settings, &[Intent::Undock]);

    while state.time_ticks < MAX_TICKS {
        let intents = autopilot(&state);
        tick(&mut state, &settings, &intents);
        for event in state.drain_events() {
            report(&event);
        }
        if matches!(state.phase, GamePhase::Win | GamePhase::Fail { .. }) {
            break;
        }
    }

    let nav = state.navigation();
    println!("Seed:      {seed}");
    println!("Phase:     {:?}", state.phase);
    println!("Time:      {:.1}s", state.time_ms as f32 / 1000.0);
    println!(
        "Position:  ({:.1}, {:.1})  speed {:.2}",
        state.vessel.pos.x,
        state.vessel.pos.y,
        state.vessel.speed()
    );
    println!(
        "Current:   {:.2} @ {:.0} deg",
        state.drift.magnitude, state.drift.direction
    );
    if let Some(nav) = nav {
        println!(
            "Target:    {:.0} m, bearing {:.0} deg",
            nav.distance, nav.bearing
        );
    }
    for n in &state.notifications {
        println!("Message:   {}", n.message);
    }
}

/// Steer straight for the target island at cruise speed, one force step per
/// axis per tick
fn autopilot(state: &GameState) -> Vec<Intent> {
    let Some(target) = state.target() else {
        return Vec::new();
    };
    let to_target = target.pos - state.vessel.pos;
    let desired = to_target.normalize_or_zero() * CRUISE_SPEED;
    let error: Vec2 = desired - state.vessel.velocity();

    let mut intents = Vec::with_capacity(2);
    // Left force pushes +X, backward force pushes +Y
    if error.x > DEADBAND {
        intents.push(Intent::IncreaseForce(Side::Left));
    } else if error.x < -DEADBAND {
        intents.push(Intent::IncreaseForce(Side::Right));
    }
    if error.y > DEADBAND {
        intents.push(Intent::IncreaseForce(Side::Backward));
    } else if error.y < -DEADBAND {
        intents.push(Intent::IncreaseForce(Side::Forward));
    }
    intents
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::Won => println!("Docked at the target island!"),
        GameEvent::Failed { outcome } => println!("Failed: {}", outcome.message()),
        GameEvent::CheckpointRollback { from, to } => println!(
            "Out of bounds at ({:.0}, {:.0}), back to ({:.0}, {:.0})",
            from.x, from.y, to.x, to.y
        ),
        other => log::debug!("{other:?}"),
    }
}
