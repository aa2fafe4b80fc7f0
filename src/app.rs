/*
 * Application Module
 *
 * This module defines the Engine that owns the world and exposes the two
 * calls a host render loop makes: initialize once, then step once per frame.
 *
 * The engine is a two-state machine. It starts Uninitialized, where step
 * only merges parameter overrides and advances the clock; initialize moves
 * it to Initialized (again, if called twice) with a freshly seeded flock.
 * Callers get snapshots or shared references, never a mutable handle into
 * the live state.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::boid::Boid;
use crate::config::EngineConfig;
use crate::debug::DebugProbe;
use crate::error::EngineError;
use crate::params::{ParamOverrides, SimulationParams};
use crate::physics::{self, FrameInput};
use crate::snapshot::WorldStateSnapshot;
use crate::torus::wrap_point;
use crate::MAX_POPULATION;

/// Everything the host can observe about the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldState {
    pub boids: Vec<Boid>,
    pub params: SimulationParams,
    pub probes: Vec<DebugProbe>,
}

impl WorldState {
    pub fn snapshot(&self) -> WorldStateSnapshot {
        WorldStateSnapshot::from(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    Initialized,
}

/// One frame's worth of input from the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepRequest {
    pub dt: f32,
    pub parameter_overrides: ParamOverrides,
    pub stimulus_x: Option<f32>,
    pub stimulus_y: Option<f32>,
}

impl StepRequest {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn with_stimulus(mut self, x: f32, y: f32) -> Self {
        self.stimulus_x = Some(x);
        self.stimulus_y = Some(y);
        self
    }

    pub fn with_override(mut self, key: &str, value: f32) -> Self {
        self.parameter_overrides.insert(key.to_string(), value);
        self
    }

    // Only a point with both coordinates counts as a stimulus
    pub fn stimulus(&self) -> Option<Point2> {
        match (self.stimulus_x, self.stimulus_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(pt2(x, y)),
            _ => None,
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    state: WorldState,
    // Scratch buffer the next frame is written into before the swap
    next_boids: Vec<Boid>,
    phase: EnginePhase,
    elapsed: f64,
    frame: u64,
    rng: StdRng,
}

impl Engine {
    /// Build an uninitialized engine from a validated config. Initialize can
    /// still fail on the world size it is given.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = WorldState {
            params: config.parameters,
            ..WorldState::default()
        };

        Ok(Self {
            config,
            state,
            next_boids: Vec::new(),
            phase: EnginePhase::Uninitialized,
            elapsed: 0.0,
            frame: 0,
            rng,
        })
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == EnginePhase::Initialized
    }

    /// Total simulated time, accumulated over every step including the ones
    /// made before initialization.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Replace the world with a freshly seeded flock sized from the config.
    /// On error the previous state is left untouched.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<WorldStateSnapshot, EngineError> {
        check_dimensions(width, height)?;

        let count = self.config.population.count(width, height)?;
        let boids = physics::spawn_boids(
            &mut self.rng,
            count,
            width as f32,
            height as f32,
            self.config.initial_speed,
        );
        info!(
            boids = count,
            width,
            height,
            seeded = self.config.seed.is_some(),
            "flock initialized"
        );
        Ok(self.install(width, height, boids))
    }

    /// Like [`Engine::initialize`] but with an explicit flock instead of a
    /// random one. Positions are wrapped onto the torus; an agent with a
    /// non-finite component is rejected and the previous state kept.
    pub fn initialize_with_agents(
        &mut self,
        width: u32,
        height: u32,
        mut boids: Vec<Boid>,
    ) -> Result<WorldStateSnapshot, EngineError> {
        check_dimensions(width, height)?;
        if boids.len() > MAX_POPULATION {
            return Err(EngineError::InvalidConfig(format!(
                "{} agents exceeds {MAX_POPULATION} boids",
                boids.len()
            )));
        }
        if let Some(index) = boids
            .iter()
            .position(|b| !(b.position.is_finite() && b.velocity.is_finite()))
        {
            return Err(EngineError::InvalidAgent { index });
        }
        for boid in &mut boids {
            boid.position = wrap_point(boid.position, width as f32, height as f32);
        }
        info!(boids = boids.len(), width, height, "flock initialized from explicit agents");
        Ok(self.install(width, height, boids))
    }

    fn install(&mut self, width: u32, height: u32, boids: Vec<Boid>) -> WorldStateSnapshot {
        let params = self.config.parameters.with_world_size(width as f32, height as f32);
        let probes = self
            .config
            .probe_indices
            .iter()
            .filter(|&&index| {
                let in_range = index < boids.len();
                if !in_range {
                    warn!(index, boids = boids.len(), "dropping debug probe outside the flock");
                }
                in_range
            })
            .map(|&index| DebugProbe::new(index))
            .collect();

        self.next_boids = Vec::with_capacity(boids.len());
        self.state = WorldState { boids, params, probes };
        self.phase = EnginePhase::Initialized;
        self.state.snapshot()
    }

    /// Advance the world by one frame and return a snapshot of the result.
    ///
    /// Overrides are merged first so they apply to this very frame. Before
    /// initialization this only merges overrides and advances the clock.
    pub fn step(&mut self, request: &StepRequest) -> WorldStateSnapshot {
        self.advance(request);
        self.state.snapshot()
    }

    /// [`Engine::step`] without building a snapshot.
    pub fn advance(&mut self, request: &StepRequest) -> &WorldState {
        self.state.params.apply_overrides(&request.parameter_overrides);

        let dt = if request.dt.is_finite() && request.dt >= 0.0 {
            request.dt
        } else {
            warn!(dt = request.dt, "treating invalid time step as zero");
            0.0
        };
        self.elapsed += dt as f64;

        if self.phase == EnginePhase::Uninitialized {
            return &self.state;
        }

        let frame = FrameInput {
            dt,
            elapsed: self.elapsed,
            stimulus: request.stimulus(),
        };
        physics::update_boids(
            &self.state.boids,
            &mut self.next_boids,
            &mut self.state.probes,
            &self.state.params,
            frame,
        );
        std::mem::swap(&mut self.state.boids, &mut self.next_boids);

        self.frame += 1;
        trace!(frame = self.frame, elapsed = self.elapsed, "flock stepped");
        &self.state
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions { width, height });
    }
    Ok(())
}
