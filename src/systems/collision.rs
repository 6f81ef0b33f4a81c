use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, ResMut};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::constants::DEFEAT_SCORES;
use crate::entity::ghost::{GhostMode, GhostType, Pursuer};
use crate::entity::mover::Mover;
use crate::events::{CollisionOutcome, Outbox, SimEvent};
use crate::systems::components::{AgentControlled, PowerCycle, SimStatus};

/// How two entities came to occupy the same space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// They swapped tiles during the last tick.
    Crossing,
    /// They are in the same tile.
    SameTile,
}

/// Detects contact between two entities from their current and previous tiles.
///
/// Crossing is tested first, since two entities passing head-on may never share a tile.
pub fn contact(agent: &Mover, other: &Mover) -> Option<Contact> {
    if agent.previous_cell == other.cell && other.previous_cell == agent.cell && agent.cell != other.cell {
        Some(Contact::Crossing)
    } else if agent.cell == other.cell {
        Some(Contact::SameTile)
    } else {
        None
    }
}

/// Resolves agent/pursuer contacts for one tick.
///
/// `pursuers` is checked in the given order and only the first collision is reported.
/// Eaten pursuers never collide. `defeated` is the number of pursuers already
/// defeated during the current frightened period and picks the score tier.
pub fn check<'a>(
    agent: &Mover,
    pursuers: impl IntoIterator<Item = (GhostType, GhostMode, &'a Mover)>,
    defeated: u8,
) -> Option<CollisionOutcome> {
    pursuers
        .into_iter()
        .filter(|(_, mode, _)| *mode != GhostMode::Eaten)
        .find_map(|(pursuer, mode, mover)| {
            let touch = contact(agent, mover)?;
            debug!(ghost = pursuer.as_ref(), contact = ?touch, "Agent touched a pursuer");
            Some(match mode {
                GhostMode::Frightened => CollisionOutcome::PursuerDefeated {
                    pursuer,
                    score_tier: defeated.min(DEFEAT_SCORES.len() as u8 - 1),
                },
                _ => CollisionOutcome::AgentCaptured { pursuer },
            })
        })
}

/// Checks the agent against every pursuer in roster order and applies the outcome.
pub fn collision_system(
    mut outbox: ResMut<Outbox>,
    mut power: ResMut<PowerCycle>,
    mut status: ResMut<SimStatus>,
    agent: Query<&Mover, With<AgentControlled>>,
    mut pursuers: Query<(&mut Pursuer, &Mover), Without<AgentControlled>>,
) {
    let Ok(agent) = agent.single() else {
        return;
    };

    let outcome = {
        let mut roster: SmallVec<[(GhostType, GhostMode, &Mover); 4]> =
            pursuers.iter().map(|(p, mover)| (p.kind, p.mode, mover)).collect();
        roster.sort_by_key(|(kind, ..)| *kind);
        check(agent, roster, power.defeated)
    };
    let Some(outcome) = outcome else {
        return;
    };

    match outcome {
        CollisionOutcome::PursuerDefeated { pursuer, score_tier } => {
            info!(ghost = pursuer.as_ref(), score_tier, score = outcome.score(), "Pursuer defeated");
            power.defeated = power.defeated.saturating_add(1);
            if let Some((mut defeated, _)) = pursuers.iter_mut().find(|(p, _)| p.kind == pursuer) {
                defeated.set_mode(GhostMode::Eaten, 0.0);
            }
        }
        CollisionOutcome::AgentCaptured { pursuer } => {
            info!(ghost = pursuer.as_ref(), "Agent captured");
            *status = SimStatus::AgentCaptured;
        }
    }
    outbox.push(SimEvent::Collision(outcome));
}
