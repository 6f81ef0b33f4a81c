//! Headless driver: runs the classic simulation against scripted input and
//! jittered frame times, logging what happens.

use anyhow::Context;
use pacman_core::config::SimConfig;
use pacman_core::events::{CollisionOutcome, SimEvent};
use pacman_core::game::Simulation;
use pacman_core::logging::setup_logging;
use pacman_core::map::direction::Direction;
use pacman_core::systems::components::SimStatus;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace};

const DEFAULT_SECONDS: f64 = 60.0;
/// Frame times wander this far either side of the nominal frame.
const FRAME_JITTER: f64 = 0.35;
const INPUT_INTERVAL: f64 = 1.5;
const POWER_UP_INTERVAL: f64 = 17.0;
const LIVES: u32 = 3;

#[derive(Debug, Default)]
struct Summary {
    frames: u64,
    ticks: u64,
    tiles_entered: u64,
    warps: u64,
    wall_hits: u64,
    mode_changes: u64,
    captures: u32,
    defeated: u32,
    score: u32,
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f64>()
            .with_context(|| format!("invalid duration in seconds: {arg}"))?,
        None => DEFAULT_SECONDS,
    };

    let config = SimConfig::load().context("failed to load simulation config")?;
    let mut sim = Simulation::classic(&config).context("failed to build classic simulation")?;
    let mut rng = SmallRng::seed_from_u64(config.seed ^ 0xF4A3E);

    let nominal = config.tick_seconds();
    let mut summary = Summary::default();
    let mut lives = LIVES;
    let mut clock = 0.0;
    let mut next_input = 0.0;
    let mut next_power_up = POWER_UP_INTERVAL;

    info!(seconds, tick = nominal, seed = config.seed, "Starting headless run");

    while clock < seconds {
        if clock >= next_input {
            let direction = Direction::DIRECTIONS[rng.random_range(0..Direction::DIRECTIONS.len())];
            trace!(direction = direction.as_ref(), "Scripted input");
            sim.queue_direction(direction);
            next_input += INPUT_INTERVAL;
        }
        if clock >= next_power_up {
            sim.power_up();
            next_power_up += POWER_UP_INTERVAL;
        }

        let frame = nominal * (1.0 + rng.random_range(-FRAME_JITTER..=FRAME_JITTER));
        summary.ticks += u64::from(sim.update(frame));
        summary.frames += 1;
        clock += frame;

        for event in sim.drain_events() {
            record(&mut summary, event);
        }

        if sim.status() == SimStatus::AgentCaptured {
            lives = lives.saturating_sub(1);
            if lives == 0 {
                info!("Out of lives, restarting the level");
                lives = LIVES;
                sim.reset_level();
            } else {
                info!(lives, "Respawning");
                sim.respawn();
            }
        }
    }

    let stats = sim.stats();
    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        tiles_entered = summary.tiles_entered,
        warps = summary.warps,
        wall_hits = summary.wall_hits,
        mode_changes = summary.mode_changes,
        captures = summary.captures,
        defeated = summary.defeated,
        score = summary.score,
        residue = stats.accumulator,
        mode = sim.mode().as_ref(),
        "Run complete"
    );
    Ok(())
}

fn record(summary: &mut Summary, event: SimEvent) {
    use pacman_core::events::MovementEvent;

    match event {
        SimEvent::Movement { actor, event } => {
            trace!(?actor, ?event, "Movement");
            match event {
                MovementEvent::TileEnter { .. } => summary.tiles_entered += 1,
                MovementEvent::Warp { .. } => summary.warps += 1,
                MovementEvent::HitWall { .. } => summary.wall_hits += 1,
            }
        }
        SimEvent::Collision(outcome) => {
            info!(?outcome, "Collision");
            match outcome {
                CollisionOutcome::PursuerDefeated { .. } => {
                    summary.defeated += 1;
                    summary.score += outcome.score().unwrap_or(0);
                }
                CollisionOutcome::AgentCaptured { .. } => summary.captures += 1,
            }
        }
        SimEvent::ModeChanged { from, to } => {
            info!(from = from.as_ref(), to = to.as_ref(), "Mode changed");
            summary.mode_changes += 1;
        }
    }
}
