//! This module defines the maze grid and provides functions for querying it.

pub mod direction;
pub mod maze;
pub mod parser;
