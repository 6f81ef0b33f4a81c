//! Deterministic tile-grid movement, pursuit AI and collision core for a maze-chase game.
//!
//! [`game::Simulation`] ties everything together; the pure pieces
//! ([`systems::movement::advance`], [`systems::collision::check`],
//! [`systems::ghost::choose_direction`], [`timestep::FixedTimestep`]) can be
//! used on their own.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod logging;
pub mod map;
pub mod systems;
pub mod timestep;
