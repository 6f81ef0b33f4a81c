//! Pure-data entity state: positions, directions and pursuer modes.
//!
//! Nothing in here knows about rendering; other layers refer to entities by
//! their [`Actor`](crate::events::Actor) id.

pub mod buffer;
pub mod ghost;
pub mod mover;
