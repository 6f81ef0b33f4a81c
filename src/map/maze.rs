//! The immutable tile grid that every entity moves through.

use bevy_ecs::resource::Resource;
use bitflags::bitflags;
use glam::{IVec2, Vec2};
use tracing::debug;

use crate::constants::{MapTile, CELL_SIZE, CENTER_TOLERANCE, RAW_BOARD};
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::MapTileParser;

bitflags! {
    /// Which kinds of tiles an entity is currently allowed to enter.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        const AGENT = 1 << 0;
        const PURSUER = 1 << 1;
        /// Permission to pass through the ghost house door.
        const DOOR = 1 << 2;
    }
}

/// Notable tiles derived from the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Landmarks {
    /// Where the agent spawns, if the layout marks it.
    pub agent_start: Option<IVec2>,
    /// The tile eaten pursuers return to.
    pub house_target: Option<IVec2>,
    /// The tile just outside the door that pursuers head for when leaving the house.
    pub house_exit: Option<IVec2>,
}

/// The maze: a rectangular grid of [`MapTile`]s with a fixed tile size in pixels.
///
/// The grid is built once per level and is read-only afterwards. Border tiles
/// are walls, except for an optional pair of tunnel portals on the same row at
/// the far left and far right columns, which lead into each other.
#[derive(Resource, Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<MapTile>,
    tunnel: Vec<bool>,
    portals: Option<[IVec2; 2]>,
    tile_size: f32,
    origin: Vec2,
    landmarks: Landmarks,
}

impl Maze {
    /// Builds a maze from row-major tiles, validating the border and inferring the tunnel portals.
    ///
    /// # Errors
    ///
    /// Fails if the tile count does not match the dimensions, the tile size is not a
    /// positive finite number, or the border is open anywhere except a single portal pair.
    pub fn new(width: usize, height: usize, tiles: Vec<MapTile>, tile_size: f32) -> Result<Maze, MapError> {
        if tiles.len() != width * height {
            return Err(MapError::SizeMismatch {
                expected: width * height,
                found: tiles.len(),
            });
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(MapError::InvalidTileSize(tile_size));
        }

        let (w, h) = (width as i32, height as i32);
        let tile_at = |cell: IVec2| tiles[(cell.y * w + cell.x) as usize];

        // Open border tiles are only allowed on the side columns, as a portal pair.
        let mut side_openings = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let cell = IVec2::new(x, y);
                let on_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                if !on_border || tile_at(cell).is_wall() {
                    continue;
                }
                if y == 0 || y == h - 1 {
                    return Err(MapError::OpenBorder(cell));
                }
                side_openings.push(cell);
            }
        }

        let portals = match side_openings.as_slice() {
            [] => None,
            [a, b] if a.y == b.y && a.x == 0 && b.x == w - 1 => Some([*a, *b]),
            _ => return Err(MapError::InvalidPortals(side_openings)),
        };

        // The tunnel is the run of empty tiles leading inward from each portal.
        let mut tunnel = vec![false; tiles.len()];
        if let Some(portals) = portals {
            for (portal, inward) in [(portals[0], IVec2::X), (portals[1], -IVec2::X)] {
                let mut cell = portal;
                tunnel[(cell.y * w + cell.x) as usize] = true;
                cell += inward;
                while cell.x > 0 && cell.x < w - 1 && tile_at(cell) == MapTile::Empty {
                    tunnel[(cell.y * w + cell.x) as usize] = true;
                    cell += inward;
                }
            }
        }

        let door = (0..h)
            .flat_map(|y| (0..w).map(move |x| IVec2::new(x, y)))
            .find(|&cell| tile_at(cell) == MapTile::GhostHouseDoor);
        let landmarks = Landmarks {
            agent_start: None,
            house_exit: door.map(|door| door - IVec2::Y),
            house_target: door.map(|door| door + IVec2::Y * 2),
        };

        debug!(width, height, tile_size, portals = ?portals, "Built maze");

        Ok(Maze {
            width: w,
            height: h,
            tiles,
            tunnel,
            portals,
            tile_size,
            origin: Vec2::ZERO,
            landmarks,
        })
    }

    /// Builds a maze from row-major tile codes (see [`MapTile`] for the numbering).
    pub fn from_codes(width: usize, codes: &[u8], tile_size: f32) -> Result<Maze, MapError> {
        if width == 0 || codes.len() % width != 0 {
            return Err(MapError::SizeMismatch {
                expected: codes.len().next_multiple_of(width.max(1)),
                found: codes.len(),
            });
        }

        let tiles = codes
            .iter()
            .enumerate()
            .map(|(index, &code)| MapTile::try_from(code).map_err(|code| MapError::InvalidTileCode { code, index }))
            .collect::<Result<Vec<_>, _>>()?;

        Maze::new(width, codes.len() / width, tiles, tile_size)
    }

    /// Parses an ASCII board (see [`MapTileParser`]) into a maze.
    pub fn parse(raw_board: &[&str], tile_size: f32) -> GameResult<Maze> {
        let parsed = MapTileParser::parse_board(raw_board)?;
        let mut maze = Maze::new(parsed.width, parsed.height, parsed.tiles, tile_size)?;

        // Portal markers must agree with the openings found in the border.
        if !parsed.tunnel_ends.is_empty() && maze.portals.map(Vec::from) != Some(parsed.tunnel_ends.clone()) {
            return Err(MapError::InvalidPortals(parsed.tunnel_ends).into());
        }

        maze.landmarks.agent_start = parsed.agent_start;
        Ok(maze)
    }

    /// The classic 28x31 arcade board.
    pub fn classic() -> GameResult<Maze> {
        Self::parse(&RAW_BOARD, CELL_SIZE as f32)
    }

    /// Returns the same maze with its top-left corner placed at `origin`, in pixels.
    pub fn with_origin(mut self, origin: Vec2) -> Maze {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The maze dimensions, in tiles.
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Positional tolerance used for every "close enough to center" decision.
    pub fn eps(&self) -> f32 {
        self.tile_size * CENTER_TOLERANCE
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// The portal pair, left one first.
    pub fn portals(&self) -> Option<[IVec2; 2]> {
        self.portals
    }

    /// Returns true if the cell lies inside the grid.
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Returns the tile at `cell`, or `None` outside the grid.
    pub fn tile(&self, cell: IVec2) -> Option<MapTile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell).then(|| (cell.y * self.width + cell.x) as usize)
    }

    /// Returns true for the off-grid cell directly beyond a portal.
    pub fn is_portal_mouth(&self, cell: IVec2) -> bool {
        self.portals.is_some_and(|[left, right]| {
            cell == left - IVec2::X || cell == right + IVec2::X
        })
    }

    /// If `cell` is a portal and moving in `direction` leaves the grid, returns the paired portal.
    pub fn portal_exit(&self, cell: IVec2, direction: Direction) -> Option<IVec2> {
        let [left, right] = self.portals?;
        let beyond = cell + direction.as_ivec2();
        if cell == left && beyond == left - IVec2::X {
            Some(right)
        } else if cell == right && beyond == right + IVec2::X {
            Some(left)
        } else {
            None
        }
    }

    /// Returns true if the cell is part of a tunnel leading to a portal.
    pub fn is_tunnel(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.tunnel[i])
    }

    /// Returns true if the cell is inside the ghost house.
    pub fn is_house(&self, cell: IVec2) -> bool {
        self.tile(cell) == Some(MapTile::GhostHouse)
    }

    /// Returns true if an entity with the given permissions may not enter `cell`.
    ///
    /// Off-grid cells block, except the mouths beyond the tunnel portals.
    pub fn is_blocked(&self, cell: IVec2, flags: TraversalFlags) -> bool {
        match self.tile(cell) {
            None => !self.is_portal_mouth(cell),
            Some(MapTile::Wall) => true,
            Some(MapTile::GhostHouseDoor) => !flags.contains(TraversalFlags::DOOR),
            Some(_) => false,
        }
    }

    /// Wall test with no special permissions: walls and the house door block, portal mouths do not.
    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.is_blocked(cell, TraversalFlags::empty())
    }

    /// Returns true if all four axis-adjacent neighbours of `cell` are blocked.
    pub fn all_neighbors_blocked(&self, cell: IVec2, flags: TraversalFlags) -> bool {
        Direction::DIRECTIONS
            .iter()
            .all(|dir| self.is_blocked(cell + dir.as_ivec2(), flags))
    }

    /// The pixel position of a tile's center.
    pub fn tile_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }

    /// The tile containing a pixel position.
    pub fn world_to_tile(&self, position: Vec2) -> IVec2 {
        ((position - self.origin) / self.tile_size).floor().as_ivec2()
    }

    /// Returns true if `position` is within [`Maze::eps`] of the center of `cell`.
    pub fn at_tile_center(&self, position: Vec2, cell: IVec2) -> bool {
        position.distance(self.tile_center(cell)) <= self.eps()
    }
}

/// The furthest point an entity can reach from `center` without entering the neighbouring tile.
pub fn boundary_point(center: Vec2, direction: Direction, tile_size: f32) -> Vec2 {
    center + direction.as_vec2() * (tile_size * 0.5)
}
