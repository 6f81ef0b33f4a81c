#![allow(dead_code)]

use glam::IVec2;
use pacman_core::entity::mover::Mover;
use pacman_core::map::direction::Direction;
use pacman_core::map::maze::{Maze, TraversalFlags};

pub const TILE: f32 = 8.0;

pub fn maze(rows: &[&str]) -> Maze {
    Maze::parse(rows, TILE).unwrap()
}

/// A single horizontal corridor; open cells are x = 1..=6 on row 1.
pub fn corridor() -> Maze {
    maze(&["########", "#......#", "########"])
}

/// A plus-shaped junction centred on (3, 3).
pub fn crossroads() -> Maze {
    maze(&[
        "#######", //
        "###.###",
        "###.###",
        "#.....#",
        "###.###",
        "###.###",
        "#######",
    ])
}

/// A corridor that wraps around through a portal pair on row 1.
pub fn tunnel() -> Maze {
    maze(&["#######", "T  .  T", "#######"])
}

/// A closed box with a single open cell at (1, 1).
pub fn cell() -> Maze {
    maze(&["###", "#.#", "###"])
}

/// A stopped agent at the center of `(x, y)` that moves `speed` pixels per second.
pub fn agent(maze: &Maze, x: i32, y: i32, speed: f32) -> Mover {
    Mover::new(maze, IVec2::new(x, y), speed, TraversalFlags::AGENT)
}

/// An agent at the center of `(x, y)` already heading in `direction`.
pub fn moving(maze: &Maze, x: i32, y: i32, direction: Direction, speed: f32) -> Mover {
    let mut mover = agent(maze, x, y, speed);
    mover.direction.apply(direction);
    mover.facing = direction;
    mover
}
