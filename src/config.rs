//! Simulation tuning, loaded from defaults overridden by `PACMAN_SIM_*` environment variables.

use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{
    speed, AMBUSH_LOOKAHEAD, BASE_SPEED, CELL_SIZE, CLASSIC_SCHEDULE, FLANK_LOOKAHEAD, FRIGHTENED_DURATION,
    MAX_FRAME_DELTA, SHY_DISTANCE, STARVATION_THRESHOLD, TICK_RATE,
};
use crate::error::{GameError, GameResult};
use crate::systems::ghost::{ModeSchedule, Phase};

const ENV_PREFIX: &str = "PACMAN_SIM_";

/// Every tunable number in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pixel size of one tile.
    pub tile_size: f32,
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Longest frame delta, in seconds, the driver accepts before clamping.
    pub max_frame_delta: f64,
    /// Consecutive tick-less updates before a starvation warning.
    pub starvation_threshold: u32,
    /// Full speed in pixels per second; entities move at a fraction of it.
    pub base_speed: f32,
    pub agent_speed: f32,
    pub pursuer_speed: f32,
    pub pursuer_tunnel_speed: f32,
    pub pursuer_frightened_speed: f32,
    pub pursuer_eaten_speed: f32,
    /// Seconds a power-up keeps pursuers frightened.
    pub frightened_duration: f32,
    pub schedule: Vec<Phase>,
    /// Tiles ahead of the agent the ambusher aims for.
    pub ambush_lookahead: i32,
    /// Tiles ahead of the agent the flanker pivots around.
    pub flank_lookahead: i32,
    /// Distance in tiles inside which the shy pursuer gives up the chase.
    pub shy_distance: f32,
    /// Seed for frightened-mode randomness.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: CELL_SIZE as f32,
            tick_rate: TICK_RATE,
            max_frame_delta: MAX_FRAME_DELTA,
            starvation_threshold: STARVATION_THRESHOLD,
            base_speed: BASE_SPEED,
            agent_speed: speed::AGENT,
            pursuer_speed: speed::PURSUER,
            pursuer_tunnel_speed: speed::PURSUER_TUNNEL,
            pursuer_frightened_speed: speed::PURSUER_FRIGHTENED,
            pursuer_eaten_speed: speed::PURSUER_EATEN,
            frightened_duration: FRIGHTENED_DURATION,
            schedule: CLASSIC_SCHEDULE.iter().map(|&(mode, duration)| Phase::new(mode, duration)).collect(),
            ambush_lookahead: AMBUSH_LOOKAHEAD,
            flank_lookahead: FLANK_LOOKAHEAD,
            shy_distance: SHY_DISTANCE,
            seed: 0x5EED,
        }
    }
}

impl SimConfig {
    /// Loads the defaults, then applies any `PACMAN_SIM_*` environment overrides.
    pub fn load() -> GameResult<Self> {
        Self::from_figment(Figment::from(Serialized::defaults(SimConfig::default())).merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extracts and validates a configuration from an arbitrary provider stack.
    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        let config: SimConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Seconds per simulation tick.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate
    }

    pub fn validate(&self) -> GameResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GameError::InvalidConfig(format!("{name} must be positive and finite, got {value}")))
            }
        };
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(GameError::InvalidConfig(format!("{name} must be non-negative, got {value}")))
            }
        };

        positive("tile_size", self.tile_size.into())?;
        positive("tick_rate", self.tick_rate)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        positive("frightened_duration", self.frightened_duration.into())?;
        non_negative("base_speed", self.base_speed.into())?;
        non_negative("agent_speed", self.agent_speed.into())?;
        non_negative("pursuer_speed", self.pursuer_speed.into())?;
        non_negative("pursuer_tunnel_speed", self.pursuer_tunnel_speed.into())?;
        non_negative("pursuer_frightened_speed", self.pursuer_frightened_speed.into())?;
        non_negative("pursuer_eaten_speed", self.pursuer_eaten_speed.into())?;
        non_negative("shy_distance", self.shy_distance.into())?;
        if self.starvation_threshold == 0 {
            return Err(GameError::InvalidConfig("starvation_threshold must be at least 1".into()));
        }
        ModeSchedule::new(self.schedule.clone())?;
        Ok(())
    }
}

/// The slice of [`SimConfig`] the per-tick systems read.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub agent_speed: f32,
    pub pursuer_speed: f32,
    pub pursuer_tunnel_speed: f32,
    pub pursuer_frightened_speed: f32,
    pub pursuer_eaten_speed: f32,
    pub frightened_duration: f32,
    pub ambush_lookahead: i32,
    pub flank_lookahead: i32,
    pub shy_distance: f32,
}

impl From<&SimConfig> for Tuning {
    fn from(config: &SimConfig) -> Self {
        Self {
            agent_speed: config.agent_speed,
            pursuer_speed: config.pursuer_speed,
            pursuer_tunnel_speed: config.pursuer_tunnel_speed,
            pursuer_frightened_speed: config.pursuer_frightened_speed,
            pursuer_eaten_speed: config.pursuer_eaten_speed,
            frightened_duration: config.frightened_duration,
            ambush_lookahead: config.ambush_lookahead,
            flank_lookahead: config.flank_lookahead,
            shy_distance: config.shy_distance,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::from(&SimConfig::default())
    }
}
