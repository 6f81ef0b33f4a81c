//! The per-tick ECS systems and the pure functions they wrap.
//!
//! Each tick runs [`ghost::ghost_ai_system`], then [`movement::movement_system`],
//! then [`collision::collision_system`].

pub mod collision;
pub mod components;
pub mod ghost;
pub mod movement;
