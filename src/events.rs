//! Values emitted by the simulation for outside collaborators (audio, rendering, scoring).

use bevy_ecs::resource::Resource;
use glam::IVec2;

use crate::constants::DEFEAT_SCORES;
use crate::entity::ghost::{GhostMode, GhostType};

/// Something that happened to one entity during a movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEvent {
    /// Entered a new tile by walking.
    TileEnter { tile: IVec2 },
    /// Teleported through a portal, arriving at `tile`.
    Warp { tile: IVec2 },
    /// Stopped against the wall at `tile`.
    HitWall { tile: IVec2 },
}

/// Identifies an entity without referring to any storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Agent,
    Pursuer(GhostType),
}

/// The result of an agent/pursuer collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// The agent caught a frightened pursuer.
    PursuerDefeated { pursuer: GhostType, score_tier: u8 },
    /// A pursuer caught the agent.
    AgentCaptured { pursuer: GhostType },
}

impl CollisionOutcome {
    pub fn pursuer(&self) -> GhostType {
        match *self {
            CollisionOutcome::PursuerDefeated { pursuer, .. } | CollisionOutcome::AgentCaptured { pursuer } => pursuer,
        }
    }

    /// Points awarded for this outcome, if any.
    pub fn score(&self) -> Option<u32> {
        match *self {
            CollisionOutcome::PursuerDefeated { score_tier, .. } => {
                Some(DEFEAT_SCORES[(score_tier as usize).min(DEFEAT_SCORES.len() - 1)])
            }
            CollisionOutcome::AgentCaptured { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Movement { actor: Actor, event: MovementEvent },
    Collision(CollisionOutcome),
    /// The global scatter/chase schedule moved to another phase.
    ModeChanged { from: GhostMode, to: GhostMode },
}

/// Events produced during ticks, waiting to be drained by the caller.
#[derive(Resource, Debug, Default)]
pub struct Outbox(Vec<SimEvent>);

impl Outbox {
    pub fn push(&mut self, event: SimEvent) {
        self.0.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = SimEvent>) {
        self.0.extend(events);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_drains_in_order_and_empties() {
        let mut outbox = Outbox::default();
        let changed = SimEvent::ModeChanged {
            from: GhostMode::Scatter,
            to: GhostMode::Chase,
        };
        let entered = SimEvent::Movement {
            actor: Actor::Agent,
            event: MovementEvent::TileEnter { tile: IVec2::new(2, 1) },
        };
        outbox.push(changed);
        outbox.extend([entered]);

        assert_eq!(outbox.drain(), vec![changed, entered]);
        assert_eq!(outbox.drain(), Vec::new());
    }
}
