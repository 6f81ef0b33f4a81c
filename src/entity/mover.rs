use bevy_ecs::component::Component;
use glam::{IVec2, Vec2};

use crate::entity::buffer::DirectionState;
use crate::map::direction::Direction;
use crate::map::maze::{Maze, TraversalFlags};

/// Grid-constrained movement state shared by the agent and the pursuers.
///
/// `position` is continuous (pixels) while `cell` is the tile the entity is
/// logically in. `previous_cell` only changes when `cell` changes, which is what
/// lets the collision engine spot two entities that swapped tiles in one tick.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Mover {
    pub position: Vec2,
    pub cell: IVec2,
    pub previous_cell: IVec2,
    /// Base speed in pixels per second.
    pub speed: f32,
    /// Scales `speed`; adjusted per tick for mode and tunnel slowdowns.
    pub speed_multiplier: f32,
    pub moving: bool,
    pub direction: DirectionState,
    /// The last direction actually travelled; survives stopping.
    pub facing: Direction,
    pub traversal: TraversalFlags,
}

impl Mover {
    /// Creates a stopped entity at the center of `cell`.
    pub fn new(maze: &Maze, cell: IVec2, speed: f32, traversal: TraversalFlags) -> Self {
        Self {
            position: maze.tile_center(cell),
            cell,
            previous_cell: cell,
            speed,
            speed_multiplier: 1.0,
            moving: false,
            direction: DirectionState::default(),
            facing: Direction::default(),
            traversal,
        }
    }

    /// Speed after multipliers, in pixels per second.
    pub fn effective_speed(&self) -> f32 {
        self.speed * self.speed_multiplier
    }

    /// Puts the entity back at the center of `cell`, stopped, with directions cleared.
    pub fn reset(&mut self, maze: &Maze, cell: IVec2, facing: Direction) {
        self.position = maze.tile_center(cell);
        self.cell = cell;
        self.previous_cell = cell;
        self.moving = false;
        self.direction.clear();
        self.facing = facing;
    }
}
