//! This module contains all the constants used by the simulation.

use glam::{IVec2, UVec2};

/// Simulation ticks per second.
pub const TICK_RATE: f64 = 60.0;

/// The size of each tile, in pixels.
pub const CELL_SIZE: u32 = 8;
/// The size of the classic game board, in tiles.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);

/// Fraction of a tile an entity may be away from a tile center and still count as "at" it.
pub const CENTER_TOLERANCE: f32 = 0.15;
/// Subtracted from sub-tolerance per-call distances so they never land exactly on the tolerance boundary.
pub const TOLERANCE_NUDGE: f32 = 0.001;
/// Maximum number of tile crossings (including warps) processed in one movement call.
pub const MAX_CROSSINGS_PER_TICK: u32 = 3;

/// Upper bound on real time accepted by the frame driver in a single call, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.25;
/// Consecutive zero-step frames after which the frame driver reports starvation.
pub const STARVATION_THRESHOLD: u32 = 120;

/// Pixels per second at 100% speed (the arcade's 75.75 px/s reference speed).
pub const BASE_SPEED: f32 = 75.757_58;

/// Speed multipliers, as fractions of [`BASE_SPEED`].
pub mod speed {
    pub const AGENT: f32 = 0.80;
    pub const PURSUER: f32 = 0.75;
    pub const PURSUER_TUNNEL: f32 = 0.40;
    pub const PURSUER_FRIGHTENED: f32 = 0.50;
    pub const PURSUER_EATEN: f32 = 2.0;
}

/// How long pursuers stay frightened after a power-up, in seconds.
pub const FRIGHTENED_DURATION: f32 = 6.0;

/// Point values awarded for consecutive pursuer defeats within one power-up cycle.
pub const DEFEAT_SCORES: [u32; 4] = [200, 400, 800, 1600];

/// Tiles ahead of the agent that the ambusher (Pinky) targets.
pub const AMBUSH_LOOKAHEAD: i32 = 4;
/// Tiles ahead of the agent used as the pivot for the flanker (Inky).
pub const FLANK_LOOKAHEAD: i32 = 2;
/// Distance, in tiles, inside which the shy pursuer (Clyde) retreats to its corner.
pub const SHY_DISTANCE: f32 = 8.0;

/// The classic scatter/chase schedule, in seconds. A negative duration is permanent.
pub const CLASSIC_SCHEDULE: [(crate::entity::ghost::GhostMode, f32); 8] = {
    use crate::entity::ghost::GhostMode::{Chase, Scatter};
    [
        (Scatter, 7.0),
        (Chase, 20.0),
        (Scatter, 7.0),
        (Chase, 20.0),
        (Scatter, 5.0),
        (Chase, 20.0),
        (Scatter, 5.0),
        (Chase, -1.0),
    ]
};

/// Classic spawn tiles for the four pursuers, in roster order.
pub const PURSUER_SPAWNS: [IVec2; 4] = [
    IVec2::new(13, 11),
    IVec2::new(13, 14),
    IVec2::new(11, 14),
    IVec2::new(15, 14),
];

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MapTile {
    /// A wall tile. Nothing may enter it.
    Wall = 0,
    /// A walkable tile carrying a regular pellet.
    Path = 1,
    /// A walkable tile carrying a power pellet.
    PowerPellet = 2,
    /// A walkable tile with nothing on it.
    Empty = 3,
    /// The inside of the ghost house.
    GhostHouse = 4,
    /// The ghost house door, passable only with door permission.
    GhostHouseDoor = 5,
}

impl MapTile {
    /// Returns true if the tile is a wall.
    pub const fn is_wall(self) -> bool {
        matches!(self, MapTile::Wall)
    }
}

impl TryFrom<u8> for MapTile {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => MapTile::Wall,
            1 => MapTile::Path,
            2 => MapTile::PowerPellet,
            3 => MapTile::Empty,
            4 => MapTile::GhostHouse,
            5 => MapTile::GhostHouseDoor,
            other => return Err(other),
        })
    }
}

/// The raw layout of the classic game board, as a 2D array of characters.
///
/// `#` wall, `.` pellet path, `o` power pellet, ` ` empty, `H` ghost house,
/// `=` ghost house door, `T` tunnel portal, `X` agent start.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #HHHHHH# ##.######",
    "T     .   #HHHHHH#   .     T",
    "######.## #HHHHHH# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......X .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
