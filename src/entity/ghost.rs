//! Pursuer identities and per-pursuer behaviour state.

use bevy_ecs::component::Component;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// The four classic pursuers, in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum GhostType {
    /// Direct chaser.
    Blinky,
    /// Ambusher, aims ahead of the agent.
    Pinky,
    /// Flanker, mirrors Blinky through a point ahead of the agent.
    Inky,
    /// Shy, chases only from a distance.
    Clyde,
}

impl GhostType {
    pub const ALL: [GhostType; 4] = [GhostType::Blinky, GhostType::Pinky, GhostType::Inky, GhostType::Clyde];

    /// This pursuer's scatter corner. Corners sit outside the grid so they are never reached.
    pub fn scatter_target(self, maze_size: IVec2) -> IVec2 {
        match self {
            GhostType::Blinky => IVec2::new(maze_size.x - 3, -3),
            GhostType::Pinky => IVec2::new(2, -3),
            GhostType::Inky => IVec2::new(maze_size.x - 1, maze_size.y),
            GhostType::Clyde => IVec2::new(0, maze_size.y),
        }
    }
}

/// Behaviour modes a pursuer can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GhostMode {
    /// Head for a fixed corner.
    Scatter,
    /// Head for an agent-relative target.
    Chase,
    /// Vulnerable, wandering randomly.
    Frightened,
    /// Defeated, returning home; ignores collisions.
    Eaten,
}

impl GhostMode {
    /// Frightened and Eaten are per-pursuer overrides that ignore the global schedule.
    pub const fn is_override(self) -> bool {
        matches!(self, GhostMode::Frightened | GhostMode::Eaten)
    }
}

/// Per-pursuer AI state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Pursuer {
    pub kind: GhostType,
    pub mode: GhostMode,
    /// Seconds spent in the current mode, or seconds left while frightened.
    pub mode_timer: f32,
    /// The tile this pursuer is steering towards. May lie outside the grid.
    pub target: IVec2,
}

impl Pursuer {
    pub fn new(kind: GhostType, mode: GhostMode) -> Self {
        Self {
            kind,
            mode,
            mode_timer: 0.0,
            target: IVec2::ZERO,
        }
    }

    /// Switches mode and restarts the mode timer.
    pub fn set_mode(&mut self, mode: GhostMode, timer: f32) {
        self.mode = mode;
        self.mode_timer = timer;
    }
}
