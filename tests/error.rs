use glam::IVec2;
use pacman_core::error::{GameError, MapError, ParseError};

#[test]
fn test_game_error_from_parse_error() {
    let parse_error = ParseError::UnknownCharacter('Z');
    let game_error: GameError = parse_error.into();
    assert!(matches!(game_error, GameError::MapParse(_)));
}

#[test]
fn test_game_error_from_map_error() {
    let map_error = MapError::MissingLandmark("agent start");
    let game_error: GameError = map_error.into();
    assert!(matches!(game_error, GameError::Map(_)));
}

#[test]
fn test_game_error_from_figment_error() {
    let figment_error = Box::new(figment::Error::from("bad value".to_string()));
    let game_error: GameError = figment_error.into();
    assert!(matches!(game_error, GameError::Config(_)));
}

#[test]
fn test_parse_error_display() {
    let error = ParseError::UnknownCharacter('!');
    assert_eq!(error.to_string(), "Unknown character in board: !");

    let error = ParseError::RaggedRow {
        row: 2,
        expected: 28,
        found: 27,
    };
    assert_eq!(error.to_string(), "Board row 2 has 27 tiles, expected 28");
}

#[test]
fn test_map_error_display() {
    let error = MapError::BlockedSpawn(IVec2::new(0, 0));
    assert_eq!(
        error.to_string(),
        "Cannot spawn at [0, 0]: the tile is blocked or outside the maze"
    );

    let error = MapError::SizeMismatch { expected: 9, found: 8 };
    assert_eq!(error.to_string(), "Tile data has 8 entries, expected 9");
}

#[test]
fn test_game_error_wraps_message() {
    let error: GameError = MapError::InvalidTileSize(-1.0).into();
    assert_eq!(error.to_string(), "Map error: Tile size must be positive and finite, got -1");
}
