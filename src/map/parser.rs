//! Map parsing functionality for converting raw board layouts into structured data.

use crate::constants::MapTile;
use crate::error::ParseError;
use glam::IVec2;

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMap {
    /// Width of the board, in tiles.
    pub width: usize,
    /// Height of the board, in tiles.
    pub height: usize,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<MapTile>,
    /// The positions of the house door tiles.
    pub house_door: Vec<IVec2>,
    /// The positions of the tunnel portal tiles.
    pub tunnel_ends: Vec<IVec2>,
    /// The agent's starting position.
    pub agent_start: Option<IVec2>,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    ///
    /// Portals (`T`) and the agent start (`X`) are plain empty tiles; their
    /// positions are tracked separately by [`MapTileParser::parse_board`].
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Wall),
            '.' => Ok(MapTile::Path),
            'o' => Ok(MapTile::PowerPellet),
            ' ' => Ok(MapTile::Empty),
            'T' => Ok(MapTile::Empty),
            'X' => Ok(MapTile::Empty),
            'H' => Ok(MapTile::GhostHouse),
            '=' => Ok(MapTile::GhostHouseDoor),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, if rows differ in length, or if
    /// the board contains unknown characters.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut house_door = Vec::new();
        let mut tunnel_ends = Vec::new();
        let mut agent_start = None;

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let position = IVec2::new(x as i32, y as i32);

                match character {
                    'T' => tunnel_ends.push(position),
                    '=' => house_door.push(position),
                    'X' => agent_start = Some(position),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        Ok(ParsedMap {
            width,
            height: raw_board.len(),
            tiles,
            house_door,
            tunnel_ends,
            agent_start,
        })
    }
}
