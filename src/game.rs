//! The simulation container: one maze, one agent, any number of pursuers,
//! advanced in fixed ticks by a [`FixedTimestep`] driver.

use bevy_ecs::entity::Entity;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::Mut;
use bevy_ecs::{schedule::Schedule, world::World};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::{SimConfig, Tuning};
use crate::constants::{PURSUER_SPAWNS, RAW_BOARD};
use crate::entity::ghost::{GhostMode, GhostType, Pursuer};
use crate::entity::mover::Mover;
use crate::error::{GameResult, MapError};
use crate::events::{Actor, Outbox, SimEvent};
use crate::formatter;
use crate::map::direction::Direction;
use crate::map::maze::{Maze, TraversalFlags};
use crate::systems::collision::collision_system;
use crate::systems::components::{ActorId, AgentBundle, AgentControlled, PowerCycle, PursuerBundle, SimStatus, Spawn};
use crate::systems::ghost::{frighten, ghost_ai_system, pursuer_traversal, ModeSchedule};
use crate::systems::movement::{movement_system, SimRng, TickDelta};
use crate::timestep::{FixedTimestep, TimestepStats};

/// Owns the ECS world and runs AI, movement and collision once per fixed tick.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    timestep: FixedTimestep,
    base_speed: f32,
    agent: Option<Entity>,
    pursuers: SmallVec<[(GhostType, Entity); 4]>,
}

impl Simulation {
    /// Creates an empty simulation over `maze`. Entities are added with
    /// [`spawn_agent`](Self::spawn_agent) and [`spawn_pursuer`](Self::spawn_pursuer).
    pub fn new(maze: Maze, config: &SimConfig) -> GameResult<Simulation> {
        config.validate()?;
        let mode_schedule = ModeSchedule::new(config.schedule.clone())?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        world.insert_resource(maze);
        world.insert_resource(mode_schedule);
        world.insert_resource(Tuning::from(config));
        world.insert_resource(Outbox::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(config.seed)));
        world.insert_resource(TickDelta(config.tick_seconds() as f32));
        world.insert_resource(PowerCycle::default());
        world.insert_resource(SimStatus::default());

        schedule.add_systems((ghost_ai_system, movement_system, collision_system).chain());

        let timestep =
            FixedTimestep::with_limits(config.tick_seconds(), config.max_frame_delta, config.starvation_threshold);

        Ok(Simulation {
            world,
            schedule,
            timestep,
            base_speed: config.base_speed,
            agent: None,
            pursuers: SmallVec::new(),
        })
    }

    /// The classic board with the agent and all four pursuers at their arcade spawns.
    pub fn classic(config: &SimConfig) -> GameResult<Simulation> {
        let maze = Maze::parse(&RAW_BOARD, config.tile_size)?;
        let start = maze
            .landmarks()
            .agent_start
            .ok_or(MapError::MissingLandmark("agent start"))?;

        let mut sim = Simulation::new(maze, config)?;
        sim.spawn_agent(start, Direction::Left)?;
        for (kind, cell) in GhostType::ALL.into_iter().zip(PURSUER_SPAWNS) {
            let facing = if kind == GhostType::Blinky {
                Direction::Left
            } else {
                Direction::Up
            };
            sim.spawn_pursuer(kind, cell, facing)?;
        }
        info!(pursuers = sim.pursuers.len(), "Classic simulation ready");
        Ok(sim)
    }

    /// Places the agent at `cell`, replacing any existing agent.
    pub fn spawn_agent(&mut self, cell: glam::IVec2, facing: Direction) -> GameResult<Entity> {
        let maze = self.maze();
        if !maze.contains(cell) || maze.is_blocked(cell, TraversalFlags::AGENT) {
            return Err(MapError::BlockedSpawn(cell).into());
        }

        let mut mover = Mover::new(maze, cell, self.base_speed, TraversalFlags::AGENT);
        mover.speed_multiplier = self.world.resource::<Tuning>().agent_speed;
        mover.facing = facing;

        if let Some(old) = self.agent.take() {
            self.world.despawn(old);
        }
        let entity = self
            .world
            .spawn(AgentBundle {
                agent: AgentControlled,
                id: ActorId(Actor::Agent),
                mover,
                spawn: Spawn { cell, facing },
            })
            .id();
        self.agent = Some(entity);
        debug!(cell = %cell, "Agent spawned");
        Ok(entity)
    }

    /// Places a pursuer at `cell` in the current global mode, replacing any pursuer of the same kind.
    pub fn spawn_pursuer(&mut self, kind: GhostType, cell: glam::IVec2, facing: Direction) -> GameResult<Entity> {
        let mode = self.world.resource::<ModeSchedule>().mode();
        let maze = self.maze();
        let traversal = pursuer_traversal(mode, maze, cell);
        if !maze.contains(cell) || maze.is_blocked(cell, traversal) {
            return Err(MapError::BlockedSpawn(cell).into());
        }

        let mut mover = Mover::new(maze, cell, self.base_speed, traversal);
        mover.speed_multiplier = self.world.resource::<Tuning>().pursuer_speed;
        mover.facing = facing;

        if let Some(index) = self.pursuers.iter().position(|(k, _)| *k == kind) {
            let (_, old) = self.pursuers.remove(index);
            self.world.despawn(old);
        }
        let entity = self
            .world
            .spawn(PursuerBundle {
                id: ActorId(Actor::Pursuer(kind)),
                pursuer: Pursuer::new(kind, mode),
                mover,
                spawn: Spawn { cell, facing },
            })
            .id();
        self.pursuers.push((kind, entity));
        self.pursuers.sort_by_key(|(k, _)| *k);
        debug!(ghost = kind.as_ref(), cell = %cell, "Pursuer spawned");
        Ok(entity)
    }

    /// Buffers a direction for the agent; it is taken at the next tile center where it is legal.
    pub fn queue_direction(&mut self, direction: Direction) {
        if let Some(mut mover) = self.agent.and_then(|e| self.world.get_mut::<Mover>(e)) {
            mover.direction.queue(direction);
        }
    }

    /// Forces the agent's direction immediately.
    pub fn apply_direction(&mut self, direction: Direction) {
        if let Some(mut mover) = self.agent.and_then(|e| self.world.get_mut::<Mover>(e)) {
            mover.direction.apply(direction);
        }
    }

    /// Frightens every pursuer that is not already eaten and starts a new defeat streak.
    pub fn power_up(&mut self) {
        let duration = self.world.resource::<Tuning>().frightened_duration;
        let mut frightened = 0;
        let mut pursuers = self.world.query::<&mut Pursuer>();
        for mut pursuer in pursuers.iter_mut(&mut self.world) {
            if frighten(&mut pursuer, duration) {
                frightened += 1;
            }
        }
        self.world.resource_mut::<PowerCycle>().defeated = 0;
        info!(frightened, duration, "Power-up");
    }

    /// Feeds real elapsed time to the driver and runs however many ticks it covers.
    ///
    /// While the agent is captured the driver keeps time but entities do not move.
    pub fn update(&mut self, real_dt: f64) -> u32 {
        let Simulation {
            world,
            schedule,
            timestep,
            ..
        } = self;
        timestep.update(real_dt, || run_tick(world, schedule))
    }

    /// Runs exactly one tick, bypassing the driver.
    pub fn step(&mut self) {
        run_tick(&mut self.world, &mut self.schedule);
    }

    /// Takes every event produced since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<Outbox>().drain()
    }

    /// Returns every entity to its spawn and resumes ticking after a capture.
    pub fn respawn(&mut self) {
        let global = self.world.resource::<ModeSchedule>().mode();
        self.world.resource_scope(|world, maze: Mut<Maze>| {
            let mut movers = world.query::<(&Spawn, &mut Mover, Option<&mut Pursuer>)>();
            for (spawn, mut mover, pursuer) in movers.iter_mut(world) {
                mover.reset(&maze, spawn.cell, spawn.facing);
                if let Some(mut pursuer) = pursuer {
                    pursuer.set_mode(global, 0.0);
                    mover.traversal = pursuer_traversal(global, &maze, spawn.cell);
                }
            }
        });
        *self.world.resource_mut::<SimStatus>() = SimStatus::Running;
        debug!("Entities respawned");
    }

    /// Respawns everything and restarts the mode schedule, as at the start of a level.
    pub fn reset_level(&mut self) {
        self.world.resource_mut::<ModeSchedule>().reset();
        *self.world.resource_mut::<PowerCycle>() = PowerCycle::default();
        self.timestep.reset();
        self.respawn();
        info!("Level reset");
    }

    pub fn maze(&self) -> &Maze {
        self.world.resource::<Maze>()
    }

    pub fn agent(&self) -> Option<&Mover> {
        self.agent.and_then(|e| self.world.get::<Mover>(e))
    }

    pub fn pursuer(&self, kind: GhostType) -> Option<(&Pursuer, &Mover)> {
        let (_, entity) = self.pursuers.iter().find(|(k, _)| *k == kind)?;
        Some((self.world.get::<Pursuer>(*entity)?, self.world.get::<Mover>(*entity)?))
    }

    /// Mutable access to a pursuer, for collaborators that script scenarios.
    pub fn pursuer_mut(&mut self, kind: GhostType) -> Option<(Mut<'_, Pursuer>, Mut<'_, Mover>)> {
        let (_, entity) = *self.pursuers.iter().find(|(k, _)| *k == kind)?;
        let mut query = self.world.query::<(&mut Pursuer, &mut Mover)>();
        query.get_mut(&mut self.world, entity).ok()
    }

    /// Mutable access to the agent's movement state.
    pub fn agent_mut(&mut self) -> Option<Mut<'_, Mover>> {
        self.agent.and_then(|e| self.world.get_mut::<Mover>(e))
    }

    /// The global scatter/chase mode.
    pub fn mode(&self) -> GhostMode {
        self.world.resource::<ModeSchedule>().mode()
    }

    pub fn mode_schedule(&self) -> &ModeSchedule {
        self.world.resource::<ModeSchedule>()
    }

    pub fn status(&self) -> SimStatus {
        *self.world.resource::<SimStatus>()
    }

    /// Pursuers defeated during the current frightened period.
    pub fn defeated_this_cycle(&self) -> u8 {
        self.world.resource::<PowerCycle>().defeated
    }

    pub fn stats(&self) -> TimestepStats {
        self.timestep.stats()
    }
}

fn run_tick(world: &mut World, schedule: &mut Schedule) {
    formatter::increment_tick();
    if *world.resource::<SimStatus>() == SimStatus::Running {
        schedule.run(world);
    }
}
