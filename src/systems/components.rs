use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::IVec2;

use crate::{
    entity::{ghost::Pursuer, mover::Mover},
    events::Actor,
    map::direction::Direction,
};

/// A tag component for the entity steered by outside input.
#[derive(Default, Component)]
pub struct AgentControlled;

/// Stable identity of an entity, used for event reporting and deterministic ordering.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorId(pub Actor);

impl ActorId {
    /// Processing order: the agent first, then pursuers in roster order.
    pub fn order(&self) -> u8 {
        match self.0 {
            Actor::Agent => 0,
            Actor::Pursuer(kind) => 1 + kind as u8,
        }
    }
}

/// Where an entity returns to after a capture or a level reset.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub cell: IVec2,
    pub facing: Direction,
}

#[derive(Bundle)]
pub struct AgentBundle {
    pub agent: AgentControlled,
    pub id: ActorId,
    pub mover: Mover,
    pub spawn: Spawn,
}

#[derive(Bundle)]
pub struct PursuerBundle {
    pub id: ActorId,
    pub pursuer: Pursuer,
    pub mover: Mover,
    pub spawn: Spawn,
}

/// Counts pursuers defeated during the current frightened period.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PowerCycle {
    pub defeated: u8,
}

/// Whether ticks are still being processed.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SimStatus {
    #[default]
    Running,
    /// The agent was captured; ticks are suspended until a respawn.
    AgentCaptured,
}
