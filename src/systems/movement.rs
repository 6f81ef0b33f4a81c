//! Grid movement: continuous pixel movement constrained to the tile grid.
//!
//! [`advance`] is a pure function from one entity state to the next. It may
//! cross several tiles in a single call, but never more than
//! [`MAX_CROSSINGS_PER_TICK`], and never enters a blocked tile.

use std::sync::Once;

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res, ResMut};
use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use smallvec::SmallVec;
use tracing::{error, warn};

use crate::constants::{MAX_CROSSINGS_PER_TICK, TOLERANCE_NUDGE};
use crate::entity::ghost::{GhostMode, Pursuer};
use crate::entity::mover::Mover;
use crate::events::{Actor, MovementEvent, Outbox, SimEvent};
use crate::map::direction::Direction;
use crate::map::maze::{boundary_point, Maze};
use crate::systems::components::ActorId;
use crate::systems::ghost::{choose_direction, choose_random_direction};

/// Iteration guard for the movement loop; each iteration either consumes distance or exits.
const MAX_LOOP_ITERATIONS: u32 = MAX_CROSSINGS_PER_TICK * 3 + 2;

static INVALID_DELTA: Once = Once::new();
static INVALID_SPEED: Once = Once::new();
static OUT_OF_BOUNDS: Once = Once::new();

/// The fixed simulation tick length, in seconds.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TickDelta(pub f32);

/// Seeded RNG used for frightened movement so runs are reproducible.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

/// The result of one movement step.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub mover: Mover,
    pub events: SmallVec<[MovementEvent; 4]>,
}

/// Moves an entity for `dt` seconds. The only direction changes come from its buffer.
pub fn advance(mover: &Mover, maze: &Maze, dt: f32) -> Advance {
    advance_steered(mover, maze, dt, |_, _| None)
}

/// Moves an entity for `dt` seconds, asking `steer` for a direction whenever it
/// arrives at a tile center with nothing buffered.
///
/// `steer` receives the tile and the direction the entity arrived with.
pub fn advance_steered<S>(mover: &Mover, maze: &Maze, dt: f32, mut steer: S) -> Advance
where
    S: FnMut(IVec2, Option<Direction>) -> Option<Direction>,
{
    let mut next = mover.clone();
    let mut events = SmallVec::new();

    if !dt.is_finite() || dt < 0.0 {
        INVALID_DELTA.call_once(|| warn!(dt, "Ignoring movement step with an invalid delta"));
        return Advance { mover: next, events };
    }

    let speed = mover.effective_speed();
    if !speed.is_finite() || speed < 0.0 {
        INVALID_SPEED.call_once(|| warn!(speed, "Ignoring movement step with an invalid speed"));
        return Advance { mover: next, events };
    }

    debug_assert!(maze.contains(next.cell), "entity cell {} is outside the maze", next.cell);
    if !maze.contains(next.cell) {
        // A clamped cell could land inside a wall, so the entity is left where it is.
        OUT_OF_BOUNDS.call_once(|| error!(cell = %next.cell, "Entity found outside the maze, not moving it"));
        return Advance { mover: next, events };
    }

    let tile_size = maze.tile_size();
    let eps = maze.eps();

    let mut remaining = (speed * dt).min(2.0 * tile_size - 1.0).max(0.0);
    if remaining > 0.0 && remaining < eps {
        remaining = (remaining - TOLERANCE_NUDGE).max(0.0);
    }

    let mut crossings = 0;
    for _ in 0..MAX_LOOP_ITERATIONS {
        let center = maze.tile_center(next.cell);
        let offset = next.position - center;

        // Snapping only happens on the way in; a slow entity that has just left the
        // center must not be pulled back onto it.
        let approaching = next
            .direction
            .current()
            .is_none_or(|d| offset.dot(d.as_vec2()) <= 0.0);

        if approaching && offset.length() <= eps {
            next.position = center;
            if next.direction.buffered().is_none() {
                if let Some(choice) = steer(next.cell, next.direction.current()) {
                    next.direction.queue(choice);
                }
            }
            let (cell, flags) = (next.cell, next.traversal);
            next.direction
                .try_apply_buffered(|d| !maze.is_blocked(cell + d.as_ivec2(), flags));
        } else if let Some(requested) = next.direction.buffered() {
            // Requests along the current lane apply anywhere; turns wait for the center.
            let along = offset.dot(requested.as_vec2());
            let on_lane = (offset - requested.as_vec2() * along).length() <= f32::EPSILON;
            if on_lane {
                let (cell, flags) = (next.cell, next.traversal);
                next.direction
                    .try_apply_buffered(|d| along < 0.0 || !maze.is_blocked(cell + d.as_ivec2(), flags));
            }
        }

        let offset = next.position - center;
        let Some(direction) = next.direction.current() else {
            // Stopped off-center with a pending turn: walk back so the turn can be tried.
            if next.direction.buffered().is_some() && offset != Vec2::ZERO && remaining > 0.0 {
                next.moving = true;
                let to_center = offset.length();
                if remaining < to_center {
                    next.position -= offset / to_center * remaining;
                    break;
                }
                next.position = center;
                remaining -= to_center;
                continue;
            }
            next.moving = false;
            break;
        };

        next.facing = direction;
        if remaining <= 0.0 {
            break;
        }

        let heading = direction.as_vec2();

        // Corner-cutting: drift back onto the lane while travelling along it.
        let lateral = offset - heading * offset.dot(heading);
        let lateral_len = lateral.length();
        if lateral_len > 0.0 {
            next.position -= lateral / lateral_len * lateral_len.min(remaining);
        }
        let offset = next.position - center;
        let along = offset.dot(heading);
        let lateral = offset - heading * along;

        if along < 0.0 {
            // Travelling back toward the center of the current tile.
            next.moving = true;
            let to_center = -along;
            if remaining < to_center {
                next.position += heading * remaining;
                break;
            }
            next.position += heading * to_center;
            remaining -= to_center;
            continue;
        }

        let to_boundary = (tile_size * 0.5 - along).max(0.0);
        let target = next.cell + direction.as_ivec2();

        if let Some(exit) = maze.portal_exit(next.cell, direction) {
            if crossings >= MAX_CROSSINGS_PER_TICK {
                break;
            }
            next.moving = true;
            if remaining < to_boundary {
                next.position += heading * remaining;
                break;
            }
            next.previous_cell = next.cell;
            next.cell = exit;
            next.position = maze.tile_center(exit);
            remaining = (remaining - (tile_size - along)).max(0.0);
            crossings += 1;
            events.push(MovementEvent::Warp { tile: exit });
            continue;
        }

        if maze.is_blocked(target, next.traversal) {
            if offset.length() <= f32::EPSILON && maze.all_neighbors_blocked(next.cell, next.traversal) {
                next.position = center;
            } else if remaining < to_boundary {
                next.moving = true;
                next.position += heading * remaining;
                break;
            } else {
                next.position = boundary_point(center, direction, tile_size) + lateral;
            }
            next.direction.stop();
            next.moving = false;
            events.push(MovementEvent::HitWall { tile: target });
            break;
        }

        if crossings >= MAX_CROSSINGS_PER_TICK {
            break;
        }
        next.moving = true;
        if remaining < to_boundary {
            next.position += heading * remaining;
            break;
        }

        next.previous_cell = next.cell;
        next.cell = target;
        crossings += 1;
        events.push(MovementEvent::TileEnter { tile: target });

        let to_next_center = tile_size - along;
        if remaining < to_next_center {
            next.position += heading * remaining;
            break;
        }
        next.position = maze.tile_center(target) + lateral;
        remaining -= to_next_center;
    }

    Advance { mover: next, events }
}

/// Advances every entity by one tick, steering pursuers towards their targets.
pub fn movement_system(
    maze: Res<Maze>,
    delta: Res<TickDelta>,
    mut rng: ResMut<SimRng>,
    mut outbox: ResMut<Outbox>,
    mut movers: Query<(&ActorId, &mut Mover, Option<&Pursuer>)>,
) {
    let mut entities: SmallVec<[_; 5]> = movers.iter_mut().collect();
    entities.sort_by_key(|(actor, ..)| actor.order());

    for (actor, mut mover, pursuer) in entities {
        let flags = mover.traversal;
        let step = match pursuer {
            Some(pursuer) if pursuer.mode == GhostMode::Frightened => {
                let rng = &mut rng.0;
                advance_steered(&mover, &maze, delta.0, |cell, arrived| {
                    choose_random_direction(&maze, cell, arrived, flags, rng)
                })
            }
            Some(pursuer) => advance_steered(&mover, &maze, delta.0, |cell, arrived| {
                choose_direction(&maze, cell, arrived, pursuer.target, flags)
            }),
            None => advance(&mover, &maze, delta.0),
        };

        *mover = step.mover;
        let actor: Actor = actor.0;
        outbox.extend(step.events.into_iter().map(|event| SimEvent::Movement { actor, event }));
    }
}
