//! SDF Breakout entry point
//!
//! Native builds run a headless autopilot game and print a JSON summary.
//! Usage: `sdf-breakout [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::Context;
    use sdf_breakout::sim::{EntityKind, GameEvent, TickInput};
    use sdf_breakout::{Game, Settings};

    env_logger::init();
    log::info!("SDF Breakout (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => Settings::default(),
    };

    let mut game = Game::new(settings.clone()).context("failed to build level")?;

    let summary = Rc::new(RefCell::new(Summary::default()));
    {
        let summary = summary.clone();
        game.subscribe(move |event| {
            let mut summary = summary.borrow_mut();
            match event {
                GameEvent::BallHit(_) => summary.hits += 1,
                GameEvent::TargetDestroyed { target } => {
                    summary.targets_destroyed += 1;
                    log::info!("Target {} destroyed", target);
                }
                GameEvent::KillZoneEntered { ball } => log::info!("Ball {} missed", ball),
                GameEvent::LevelCleared => log::info!("Level cleared"),
            }
        });
    }

    let input = TickInput {
        autopilot: settings.autopilot,
        ..Default::default()
    };
    for _ in 0..settings.demo_ticks {
        game.step(&input);
        if game.is_over() {
            break;
        }
    }

    let state = game.state();
    let mut summary = summary.borrow_mut();
    summary.ticks = state.time_ticks;
    summary.phase = format!("{:?}", state.phase);
    summary.targets_remaining = state.targets_remaining;
    summary.balls = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Ball)
        .map(|e| BallSummary {
            position: e.position().to_array(),
            velocity: e.velocity.to_array(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&*summary)?);
    Ok(())
}

/// Outcome of a headless run
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, serde::Serialize)]
struct Summary {
    ticks: u64,
    phase: String,
    hits: u64,
    targets_destroyed: u32,
    targets_remaining: u32,
    balls: Vec<BallSummary>,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize)]
struct BallSummary {
    position: [f64; 2],
    velocity: [f64; 2],
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the library is driven by the host page
}
