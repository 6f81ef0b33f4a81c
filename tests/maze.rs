use glam::{IVec2, Vec2};
use pacman_core::constants::{MapTile, BOARD_CELL_SIZE, RAW_BOARD};
use pacman_core::error::{GameError, MapError, ParseError};
use pacman_core::map::direction::Direction;
use pacman_core::map::maze::{boundary_point, Maze, TraversalFlags};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{corridor, tunnel, TILE};

#[test]
fn test_classic_maze_dimensions() {
    let maze = Maze::classic().unwrap();
    assert_eq!(maze.size(), BOARD_CELL_SIZE.as_ivec2());
    assert_eq!(maze.portals(), Some([IVec2::new(0, 14), IVec2::new(27, 14)]));
    assert_eq!(maze.landmarks().agent_start, Some(IVec2::new(13, 23)));
    assert_eq!(maze.landmarks().house_exit, Some(IVec2::new(13, 11)));
    assert_eq!(maze.landmarks().house_target, Some(IVec2::new(13, 14)));
}

#[test]
fn test_tile_center_round_trip() {
    for origin in [Vec2::ZERO, Vec2::new(16.0, 24.0), Vec2::new(-5.5, 3.25)] {
        for tile_size in [8.0, 16.0, 3.0] {
            let maze = Maze::parse(&RAW_BOARD, tile_size).unwrap().with_origin(origin);
            for y in 0..maze.height() {
                for x in 0..maze.width() {
                    let cell = IVec2::new(x, y);
                    assert_eq!(maze.world_to_tile(maze.tile_center(cell)), cell);
                }
            }
        }
    }
}

#[test]
fn test_at_tile_center_boundary() {
    let maze = corridor();
    let cell = IVec2::new(2, 1);
    let center = maze.tile_center(cell);
    let eps = maze.eps();

    assert_that(&eps).is_equal_to(TILE * 0.15);
    assert_that(&maze.at_tile_center(center, cell)).is_true();
    assert_that(&maze.at_tile_center(center + Vec2::new(eps * 0.99, 0.0), cell)).is_true();
    assert_that(&maze.at_tile_center(center - Vec2::new(0.0, eps * 0.99), cell)).is_true();
    assert_that(&maze.at_tile_center(center + Vec2::new(eps + 0.01, 0.0), cell)).is_false();
    assert_that(&maze.at_tile_center(center - Vec2::new(0.0, eps + 0.01), cell)).is_false();
}

#[test]
fn test_wall_queries() {
    let maze = Maze::classic().unwrap();

    assert_that(&maze.is_wall(IVec2::new(0, 0))).is_true();
    assert_that(&maze.is_wall(IVec2::new(1, 1))).is_false();
    // The door keeps out anything without permission.
    assert_that(&maze.is_wall(IVec2::new(13, 12))).is_true();
    assert_that(&maze.is_blocked(IVec2::new(13, 12), TraversalFlags::PURSUER | TraversalFlags::DOOR)).is_false();
    // Beyond the portals is open, elsewhere off-grid is not.
    assert_that(&maze.is_wall(IVec2::new(-1, 14))).is_false();
    assert_that(&maze.is_wall(IVec2::new(28, 14))).is_false();
    assert_that(&maze.is_wall(IVec2::new(-1, 13))).is_true();
    assert_that(&maze.is_wall(IVec2::new(5, -1))).is_true();
}

#[test]
fn test_all_neighbors_blocked() {
    let boxed = common::cell();
    assert_that(&boxed.all_neighbors_blocked(IVec2::new(1, 1), TraversalFlags::AGENT)).is_true();

    let maze = corridor();
    assert_that(&maze.all_neighbors_blocked(IVec2::new(1, 1), TraversalFlags::AGENT)).is_false();
}

#[test]
fn test_boundary_point() {
    let center = Vec2::new(20.0, 12.0);
    assert_eq!(boundary_point(center, Direction::Right, 8.0), Vec2::new(24.0, 12.0));
    assert_eq!(boundary_point(center, Direction::Left, 8.0), Vec2::new(16.0, 12.0));
    assert_eq!(boundary_point(center, Direction::Up, 8.0), Vec2::new(20.0, 8.0));
    assert_eq!(boundary_point(center, Direction::Down, 8.0), Vec2::new(20.0, 16.0));
}

#[test]
fn test_portal_exit() {
    let maze = tunnel();
    assert_eq!(maze.portal_exit(IVec2::new(0, 1), Direction::Left), Some(IVec2::new(6, 1)));
    assert_eq!(maze.portal_exit(IVec2::new(6, 1), Direction::Right), Some(IVec2::new(0, 1)));
    assert_eq!(maze.portal_exit(IVec2::new(0, 1), Direction::Right), None);
    assert_eq!(maze.portal_exit(IVec2::new(1, 1), Direction::Left), None);
}

#[test]
fn test_tunnel_zone() {
    let maze = tunnel();
    assert_that(&maze.is_tunnel(IVec2::new(0, 1))).is_true();
    assert_that(&maze.is_tunnel(IVec2::new(2, 1))).is_true();
    assert_that(&maze.is_tunnel(IVec2::new(3, 1))).is_false();
    assert_that(&maze.is_tunnel(IVec2::new(5, 1))).is_true();

    let classic = Maze::classic().unwrap();
    assert_that(&classic.is_tunnel(IVec2::new(5, 14))).is_true();
    assert_that(&classic.is_tunnel(IVec2::new(6, 14))).is_false();
}

#[test]
fn test_from_codes() {
    #[rustfmt::skip]
    let codes = [
        0, 0, 0, 0,
        0, 1, 2, 0,
        0, 3, 4, 0,
        0, 0, 0, 0,
    ];
    let maze = Maze::from_codes(4, &codes, TILE).unwrap();

    assert_eq!(maze.tile(IVec2::new(1, 1)), Some(MapTile::Path));
    assert_eq!(maze.tile(IVec2::new(2, 1)), Some(MapTile::PowerPellet));
    assert_eq!(maze.tile(IVec2::new(1, 2)), Some(MapTile::Empty));
    assert_eq!(maze.tile(IVec2::new(2, 2)), Some(MapTile::GhostHouse));
    assert_eq!(maze.portals(), None);
}

#[test]
fn test_from_codes_rejects_bad_input() {
    assert_eq!(
        Maze::from_codes(2, &[0, 0, 9, 0], TILE).unwrap_err(),
        MapError::InvalidTileCode { code: 9, index: 2 }
    );
    assert!(matches!(
        Maze::from_codes(3, &[0, 0, 0, 0], TILE),
        Err(MapError::SizeMismatch { found: 4, .. })
    ));
    assert_eq!(
        Maze::from_codes(2, &[0, 0, 0, 0], 0.0).unwrap_err(),
        MapError::InvalidTileSize(0.0)
    );
}

#[test]
fn test_open_border_is_rejected() {
    let result = Maze::parse(&["#.#", "#.#", "###"], TILE);
    assert!(matches!(result, Err(GameError::Map(MapError::OpenBorder(cell))) if cell == IVec2::new(1, 0)));
}

#[test]
fn test_unpaired_side_opening_is_rejected() {
    let result = Maze::parse(&["####", " ..#", "####"], TILE);
    assert!(matches!(result, Err(GameError::Map(MapError::InvalidPortals(_)))));

    let result = Maze::parse(&["####", " ..#", "#.. ", "####"], TILE);
    assert!(matches!(result, Err(GameError::Map(MapError::InvalidPortals(_)))));
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        Maze::parse(&["###", "#?#", "###"], TILE),
        Err(GameError::MapParse(ParseError::UnknownCharacter('?')))
    ));
    assert!(matches!(
        Maze::parse(&["###", "#.", "###"], TILE),
        Err(GameError::MapParse(ParseError::RaggedRow { row: 1, .. }))
    ));
    assert!(matches!(Maze::parse(&[], TILE), Err(GameError::MapParse(ParseError::Empty))));
}

#[test]
fn test_house_queries() {
    let maze = Maze::classic().unwrap();
    assert_that(&maze.is_house(IVec2::new(13, 14))).is_true();
    assert_that(&maze.is_house(IVec2::new(13, 12))).is_false();
    assert_eq!(maze.tile(IVec2::new(13, 12)), Some(MapTile::GhostHouseDoor));
}
