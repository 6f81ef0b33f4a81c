//! Pursuer AI: the global scatter/chase schedule, per-pursuer targeting and
//! the direction choice made at each tile center.

use bevy_ecs::query::{With, Without};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res, ResMut};
use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::Tuning;
use crate::constants::CLASSIC_SCHEDULE;
use crate::entity::ghost::{GhostMode, GhostType, Pursuer};
use crate::entity::mover::Mover;
use crate::error::{GameError, GameResult};
use crate::events::{Outbox, SimEvent};
use crate::map::direction::Direction;
use crate::map::maze::{Maze, TraversalFlags};
use crate::systems::components::AgentControlled;
use crate::systems::movement::TickDelta;

/// One entry of the scatter/chase schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub mode: GhostMode,
    /// Seconds; any negative value means the phase never ends.
    pub duration: f32,
}

impl Phase {
    pub const fn new(mode: GhostMode, duration: f32) -> Self {
        Self { mode, duration }
    }

    pub fn is_permanent(&self) -> bool {
        self.duration < 0.0
    }
}

/// The global scatter/chase timeline shared by every pursuer.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ModeSchedule {
    phases: Vec<Phase>,
    index: usize,
    elapsed: f32,
}

impl ModeSchedule {
    /// Builds a schedule, rejecting empty timelines and phases that could never end or never start.
    pub fn new(phases: Vec<Phase>) -> GameResult<Self> {
        if phases.is_empty() {
            return Err(GameError::InvalidConfig("mode schedule has no phases".into()));
        }
        for (i, phase) in phases.iter().enumerate() {
            if phase.mode.is_override() {
                return Err(GameError::InvalidConfig(format!(
                    "schedule phase {i} uses {}, only scatter and chase are allowed",
                    phase.mode.as_ref()
                )));
            }
            if !phase.duration.is_finite() || phase.duration == 0.0 {
                return Err(GameError::InvalidConfig(format!(
                    "schedule phase {i} has invalid duration {}",
                    phase.duration
                )));
            }
        }

        Ok(Self {
            phases,
            index: 0,
            elapsed: 0.0,
        })
    }

    /// The arcade timeline: 7/20/7/20/5/20/5 seconds, then chase forever.
    pub fn classic() -> Self {
        Self {
            phases: CLASSIC_SCHEDULE.iter().map(|&(mode, duration)| Phase::new(mode, duration)).collect(),
            index: 0,
            elapsed: 0.0,
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.phases[self.index].mode
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Seconds spent in the current phase.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Returns true once the schedule can no longer change mode.
    pub fn is_settled(&self) -> bool {
        self.phases[self.index].is_permanent() || self.index + 1 == self.phases.len()
    }

    /// Adds `dt` to the phase timer and moves past every phase boundary it covers.
    ///
    /// Returns each `(from, to)` transition in order. The last phase holds forever
    /// even if its duration is finite.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[(GhostMode, GhostMode); 2]> {
        let mut transitions = SmallVec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return transitions;
        }

        self.elapsed += dt;
        while !self.is_settled() {
            let duration = self.phases[self.index].duration;
            if self.elapsed < duration {
                break;
            }
            let from = self.mode();
            self.elapsed -= duration;
            self.index += 1;
            transitions.push((from, self.mode()));
        }
        transitions
    }

    /// Back to the first phase, as at the start of a level.
    pub fn reset(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
    }
}

/// Agent state the targeting formulas need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentView {
    pub cell: IVec2,
    pub facing: Direction,
}

/// The chase-mode target tile for a pursuer.
///
/// `own_cell` is the pursuer's own tile; `blinky` is the direct chaser's tile, if it exists.
pub fn chase_target(
    kind: GhostType,
    own_cell: IVec2,
    agent: AgentView,
    blinky: Option<IVec2>,
    maze_size: IVec2,
    tuning: &Tuning,
) -> IVec2 {
    match kind {
        GhostType::Blinky => agent.cell,
        GhostType::Pinky => {
            let ahead = agent.cell + agent.facing.as_ivec2() * tuning.ambush_lookahead;
            // The arcade's overflow bug: looking up also looks the same distance left.
            if agent.facing == Direction::Up {
                ahead + Direction::Left.as_ivec2() * tuning.ambush_lookahead
            } else {
                ahead
            }
        }
        GhostType::Inky => match blinky {
            Some(blinky) => {
                let pivot = agent.cell + agent.facing.as_ivec2() * tuning.flank_lookahead;
                pivot + (pivot - blinky)
            }
            None => agent.cell,
        },
        GhostType::Clyde => {
            if own_cell.as_vec2().distance(agent.cell.as_vec2()) > tuning.shy_distance {
                agent.cell
            } else {
                kind.scatter_target(maze_size)
            }
        }
    }
}

/// The tile a pursuer is heading for, or `None` if it keeps its previous target (frightened).
pub fn pursuer_target(
    pursuer: &Pursuer,
    own_cell: IVec2,
    maze: &Maze,
    agent: AgentView,
    blinky: Option<IVec2>,
    tuning: &Tuning,
) -> Option<IVec2> {
    let landmarks = maze.landmarks();
    match pursuer.mode {
        GhostMode::Eaten => Some(landmarks.house_target.unwrap_or(own_cell)),
        GhostMode::Frightened => None,
        _ if maze.is_house(own_cell) => landmarks.house_exit,
        GhostMode::Scatter => Some(pursuer.kind.scatter_target(maze.size())),
        GhostMode::Chase => Some(chase_target(pursuer.kind, own_cell, agent, blinky, maze.size(), tuning)),
    }
}

/// Picks the legal direction out of `cell` whose neighbour is closest to `target`.
///
/// Reversing `arrived` is only allowed when nothing else is open. Ties go to the
/// earlier entry of [`Direction::PRIORITY`].
pub fn choose_direction(
    maze: &Maze,
    cell: IVec2,
    arrived: Option<Direction>,
    target: IVec2,
    flags: TraversalFlags,
) -> Option<Direction> {
    let reverse = arrived.map(Direction::opposite);

    let mut best: Option<(Direction, i32)> = None;
    for direction in Direction::PRIORITY {
        if Some(direction) == reverse {
            continue;
        }
        let neighbor = cell + direction.as_ivec2();
        if maze.is_blocked(neighbor, flags) {
            continue;
        }
        let distance = neighbor.distance_squared(target);
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((direction, distance));
        }
    }

    best.map(|(direction, _)| direction).or_else(|| forced_reverse(maze, cell, reverse, flags))
}

/// Picks uniformly among the legal, non-reversing directions out of `cell`.
pub fn choose_random_direction<R: Rng + ?Sized>(
    maze: &Maze,
    cell: IVec2,
    arrived: Option<Direction>,
    flags: TraversalFlags,
    rng: &mut R,
) -> Option<Direction> {
    let reverse = arrived.map(Direction::opposite);
    let options: SmallVec<[Direction; 4]> = Direction::PRIORITY
        .into_iter()
        .filter(|&d| Some(d) != reverse && !maze.is_blocked(cell + d.as_ivec2(), flags))
        .collect();

    options.choose(rng).copied().or_else(|| forced_reverse(maze, cell, reverse, flags))
}

fn forced_reverse(maze: &Maze, cell: IVec2, reverse: Option<Direction>, flags: TraversalFlags) -> Option<Direction> {
    let reverse = reverse.filter(|d| !maze.is_blocked(cell + d.as_ivec2(), flags));
    if let Some(direction) = reverse {
        trace!(cell = %cell, direction = direction.as_ref(), "Pursuer forced to reverse");
    }
    reverse
}

/// Traversal permissions for a pursuer: the door opens while eaten or while inside the house.
pub fn pursuer_traversal(mode: GhostMode, maze: &Maze, cell: IVec2) -> TraversalFlags {
    if mode == GhostMode::Eaten || maze.is_house(cell) {
        TraversalFlags::PURSUER | TraversalFlags::DOOR
    } else {
        TraversalFlags::PURSUER
    }
}

/// Speed multiplier for a pursuer given its mode and location.
pub fn pursuer_speed(mode: GhostMode, maze: &Maze, cell: IVec2, tuning: &Tuning) -> f32 {
    match mode {
        GhostMode::Eaten => tuning.pursuer_eaten_speed,
        GhostMode::Frightened => tuning.pursuer_frightened_speed,
        _ if maze.is_tunnel(cell) => tuning.pursuer_tunnel_speed,
        _ => tuning.pursuer_speed,
    }
}

/// Frightens a pursuer for `duration` seconds. Eaten pursuers are unaffected.
pub fn frighten(pursuer: &mut Pursuer, duration: f32) -> bool {
    if pursuer.mode == GhostMode::Eaten {
        return false;
    }
    pursuer.set_mode(GhostMode::Frightened, duration);
    true
}

/// Advances the schedule and every pursuer's mode, then recomputes targets, speeds and permissions.
///
/// The schedule is paused while any pursuer is frightened.
pub fn ghost_ai_system(
    maze: Res<Maze>,
    delta: Res<TickDelta>,
    tuning: Res<Tuning>,
    mut schedule: ResMut<ModeSchedule>,
    mut outbox: ResMut<Outbox>,
    agent: Query<&Mover, With<AgentControlled>>,
    mut pursuers: Query<(&mut Pursuer, &mut Mover), Without<AgentControlled>>,
) {
    let dt = delta.0;

    let any_frightened = pursuers.iter().any(|(p, _)| p.mode == GhostMode::Frightened);
    let transitions = if any_frightened {
        SmallVec::new()
    } else {
        schedule.advance(dt)
    };
    for &(from, to) in &transitions {
        debug!(from = from.as_ref(), to = to.as_ref(), "Global pursuer mode changed");
        outbox.push(SimEvent::ModeChanged { from, to });
    }
    let reverse = transitions.len() % 2 == 1;
    let global = schedule.mode();

    for (mut pursuer, mut mover) in pursuers.iter_mut() {
        match pursuer.mode {
            GhostMode::Frightened => {
                pursuer.mode_timer -= dt;
                if pursuer.mode_timer <= 0.0 {
                    debug!(ghost = pursuer.kind.as_ref(), mode = global.as_ref(), "Pursuer recovered");
                    pursuer.set_mode(global, 0.0);
                }
            }
            GhostMode::Eaten => {
                pursuer.mode_timer += dt;
                if maze.landmarks().house_target == Some(mover.cell) {
                    debug!(ghost = pursuer.kind.as_ref(), mode = global.as_ref(), "Pursuer revived");
                    pursuer.set_mode(global, 0.0);
                    mover.direction.apply(Direction::Up);
                }
            }
            GhostMode::Scatter | GhostMode::Chase => {
                pursuer.mode_timer += dt;
                if reverse {
                    mover.direction.reverse();
                }
                if pursuer.mode != global {
                    pursuer.set_mode(global, 0.0);
                }
            }
        }
    }

    let Ok(agent) = agent.single() else {
        // No agent means nothing to chase; keep steering towards the old targets.
        for (pursuer, mut mover) in pursuers.iter_mut() {
            let cell = mover.cell;
            mover.traversal = pursuer_traversal(pursuer.mode, &maze, cell);
            mover.speed_multiplier = pursuer_speed(pursuer.mode, &maze, cell, &tuning);
        }
        return;
    };
    let view = AgentView {
        cell: agent.cell,
        facing: agent.facing,
    };
    let blinky = pursuers
        .iter()
        .find(|(p, _)| p.kind == GhostType::Blinky)
        .map(|(_, mover)| mover.cell);

    for (mut pursuer, mut mover) in pursuers.iter_mut() {
        let cell = mover.cell;
        if let Some(target) = pursuer_target(&pursuer, cell, &maze, view, blinky, &tuning) {
            pursuer.target = target;
        }
        mover.traversal = pursuer_traversal(pursuer.mode, &maze, cell);
        mover.speed_multiplier = pursuer_speed(pursuer.mode, &maze, cell, &tuning);
    }
}
