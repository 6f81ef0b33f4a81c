use glam::IVec2;
use pacman_core::config::SimConfig;
use pacman_core::entity::ghost::{GhostMode, GhostType};
use pacman_core::error::{GameError, MapError};
use pacman_core::events::{Actor, CollisionOutcome, MovementEvent, SimEvent};
use pacman_core::game::Simulation;
use pacman_core::map::direction::Direction;
use pacman_core::systems::components::SimStatus;
use pacman_core::systems::ghost::Phase;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::corridor;

fn chase_only() -> SimConfig {
    SimConfig {
        schedule: vec![Phase::new(GhostMode::Chase, -1.0)],
        ..SimConfig::default()
    }
}

/// Runs up to `seconds` of 100ms frames, stopping early once `until` matches an event.
fn run_until(sim: &mut Simulation, seconds: f64, until: impl Fn(&SimEvent) -> bool) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let mut clock = 0.0;
    while clock < seconds {
        sim.update(0.1);
        clock += 0.1;
        let drained = sim.drain_events();
        let done = drained.iter().any(&until);
        events.extend(drained);
        if done {
            break;
        }
    }
    events
}

#[test]
fn test_classic_setup() {
    let sim = Simulation::classic(&SimConfig::default()).unwrap();

    let agent = sim.agent().unwrap();
    assert_eq!(agent.cell, IVec2::new(13, 23));
    assert_eq!(agent.direction.current(), None);
    assert_eq!(sim.mode(), GhostMode::Scatter);
    assert_eq!(sim.status(), SimStatus::Running);

    for kind in GhostType::ALL {
        let (pursuer, _) = sim.pursuer(kind).unwrap();
        assert_eq!(pursuer.kind, kind);
        assert_eq!(pursuer.mode, GhostMode::Scatter);
    }
}

#[test]
fn test_update_runs_whole_ticks() {
    let mut sim = Simulation::classic(&SimConfig::default()).unwrap();
    let tick = SimConfig::default().tick_seconds();

    assert_that(&sim.update(3.0 * tick)).is_equal_to(3);
    assert_that(&sim.update(0.5 * tick)).is_equal_to(0);
    assert_that(&sim.stats().accumulator).is_equal_to(0.5 * tick);
    assert_that(&sim.stats().total_steps).is_equal_to(3);
}

#[test]
fn test_agent_follows_queued_direction() {
    let mut sim = Simulation::classic(&SimConfig::default()).unwrap();
    sim.queue_direction(Direction::Left);

    let events = run_until(&mut sim, 0.5, |_| false);

    let agent = sim.agent().unwrap();
    assert_that(&agent.cell.x).is_less_than(13);
    assert_eq!(agent.cell.y, 23);
    assert_eq!(agent.facing, Direction::Left);
    assert_that(&events.iter().any(|e| {
        matches!(
            e,
            SimEvent::Movement {
                actor: Actor::Agent,
                event: MovementEvent::TileEnter { .. }
            }
        )
    }))
    .is_true();
}

#[test]
fn test_pursuers_leave_their_spawns() {
    let mut sim = Simulation::classic(&SimConfig::default()).unwrap();
    let events = run_until(&mut sim, 1.5, |_| false);

    assert_that(&events.iter().any(|e| {
        matches!(
            e,
            SimEvent::Movement {
                actor: Actor::Pursuer(GhostType::Blinky),
                ..
            }
        )
    }))
    .is_true();
    let (_, blinky) = sim.pursuer(GhostType::Blinky).unwrap();
    assert_that(&blinky.cell).is_not_equal_to(IVec2::new(13, 11));
}

#[test]
fn test_mode_transition_reverses_pursuers() {
    let config = SimConfig {
        schedule: vec![Phase::new(GhostMode::Scatter, 0.04), Phase::new(GhostMode::Chase, -1.0)],
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(corridor(), &config).unwrap();
    sim.spawn_pursuer(GhostType::Blinky, IVec2::new(3, 1), Direction::Left).unwrap();

    sim.step();
    sim.step();
    let (_, mover) = sim.pursuer(GhostType::Blinky).unwrap();
    let before = mover.direction.current().unwrap();
    assert_that(&sim.drain_events().iter().any(|e| matches!(e, SimEvent::ModeChanged { .. }))).is_false();

    sim.step();
    let (pursuer, mover) = sim.pursuer(GhostType::Blinky).unwrap();
    assert_eq!(pursuer.mode, GhostMode::Chase);
    assert_eq!(mover.direction.current(), Some(before.opposite()));
    assert_eq!(sim.mode(), GhostMode::Chase);

    let events = sim.drain_events();
    assert_that(&events.contains(&SimEvent::ModeChanged {
        from: GhostMode::Scatter,
        to: GhostMode::Chase,
    }))
    .is_true();
}

#[test]
fn test_power_up_pauses_schedule_until_recovery() {
    let config = SimConfig {
        frightened_duration: 0.5,
        ..SimConfig::default()
    };
    let mut sim = Simulation::classic(&config).unwrap();
    sim.power_up();

    for kind in GhostType::ALL {
        assert_eq!(sim.pursuer(kind).unwrap().0.mode, GhostMode::Frightened);
    }

    for _ in 0..20 {
        sim.step();
    }
    assert_eq!(sim.mode_schedule().elapsed(), 0.0);

    for _ in 0..20 {
        sim.step();
    }
    for kind in GhostType::ALL {
        assert_eq!(sim.pursuer(kind).unwrap().0.mode, GhostMode::Scatter);
    }
    assert_that(&sim.mode_schedule().elapsed()).is_greater_than(0.0);
}

#[test]
fn test_capture_halts_until_respawn() {
    let mut sim = Simulation::new(corridor(), &chase_only()).unwrap();
    sim.spawn_agent(IVec2::new(2, 1), Direction::Right).unwrap();
    sim.spawn_pursuer(GhostType::Blinky, IVec2::new(5, 1), Direction::Left).unwrap();
    sim.apply_direction(Direction::Right);

    let events = run_until(&mut sim, 3.0, |e| matches!(e, SimEvent::Collision(_)));

    assert_that(&events.contains(&SimEvent::Collision(CollisionOutcome::AgentCaptured {
        pursuer: GhostType::Blinky,
    })))
    .is_true();
    assert_eq!(sim.status(), SimStatus::AgentCaptured);

    let frozen = sim.agent().unwrap().clone();
    sim.update(0.2);
    assert_eq!(sim.agent().unwrap(), &frozen);
    assert_that(&sim.drain_events().is_empty()).is_true();

    sim.respawn();
    assert_eq!(sim.status(), SimStatus::Running);
    assert_eq!(sim.agent().unwrap().cell, IVec2::new(2, 1));
    assert_eq!(sim.agent().unwrap().position, sim.maze().tile_center(IVec2::new(2, 1)));
    assert_eq!(sim.pursuer(GhostType::Blinky).unwrap().1.cell, IVec2::new(5, 1));
}

#[test]
fn test_frightened_pursuer_is_defeated() {
    let config = SimConfig {
        frightened_duration: 30.0,
        ..chase_only()
    };
    let mut sim = Simulation::new(corridor(), &config).unwrap();
    sim.spawn_agent(IVec2::new(2, 1), Direction::Right).unwrap();
    sim.spawn_pursuer(GhostType::Blinky, IVec2::new(5, 1), Direction::Left).unwrap();
    sim.apply_direction(Direction::Right);
    sim.power_up();

    let events = run_until(&mut sim, 20.0, |e| matches!(e, SimEvent::Collision(_)));

    let outcome = events.iter().find_map(|e| match e {
        SimEvent::Collision(outcome) => Some(*outcome),
        _ => None,
    });
    assert_eq!(
        outcome,
        Some(CollisionOutcome::PursuerDefeated {
            pursuer: GhostType::Blinky,
            score_tier: 0
        })
    );
    assert_eq!(sim.pursuer(GhostType::Blinky).unwrap().0.mode, GhostMode::Eaten);
    assert_eq!(sim.defeated_this_cycle(), 1);
    assert_eq!(sim.status(), SimStatus::Running);
}

#[test]
fn test_reset_level_restarts_schedule() {
    let mut sim = Simulation::classic(&SimConfig::default()).unwrap();
    sim.queue_direction(Direction::Right);
    run_until(&mut sim, 1.0, |_| false);

    sim.reset_level();

    assert_eq!(sim.mode_schedule().index(), 0);
    assert_eq!(sim.mode_schedule().elapsed(), 0.0);
    assert_eq!(sim.agent().unwrap().cell, IVec2::new(13, 23));
    assert_eq!(sim.stats().accumulator, 0.0);
    assert_eq!(sim.pursuer(GhostType::Pinky).unwrap().1.cell, IVec2::new(13, 14));
}

#[test]
fn test_same_seed_same_run() {
    let record = || {
        let mut sim = Simulation::classic(&SimConfig::default()).unwrap();
        sim.power_up();
        let mut events = Vec::new();
        for frame in 0..240 {
            if frame % 40 == 0 {
                sim.queue_direction(Direction::DIRECTIONS[(frame / 40) % 4]);
            }
            sim.update(1.0 / 60.0);
            events.extend(sim.drain_events());
        }
        (events, sim.agent().cloned())
    };

    assert_eq!(record(), record());
}

#[test]
fn test_spawn_rejects_walls() {
    let mut sim = Simulation::new(corridor(), &SimConfig::default()).unwrap();

    let result = sim.spawn_agent(IVec2::new(0, 0), Direction::Left);
    assert!(matches!(result, Err(GameError::Map(MapError::BlockedSpawn(cell))) if cell == IVec2::ZERO));

    let result = sim.spawn_pursuer(GhostType::Clyde, IVec2::new(20, 20), Direction::Up);
    assert!(matches!(result, Err(GameError::Map(MapError::BlockedSpawn(_)))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig {
        tick_rate: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(Simulation::classic(&config), Err(GameError::InvalidConfig(_))));
}
