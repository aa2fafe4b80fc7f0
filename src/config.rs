/*
 * Engine Configuration Module
 *
 * Settings that only matter when the flock is (re)built: how many boids to
 * create, how fast they start, how the RNG is seeded, which boids carry a
 * debug probe, and the parameter defaults installed by initialize.
 */

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::SimulationParams;
use crate::MAX_POPULATION;

/// How the population size is derived from the world size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    /// A constant number of boids regardless of world size.
    Fixed(usize),
    /// One boid per `spacing x spacing` cell tiling the world.
    Grid(f32),
}

impl Default for Population {
    fn default() -> Self {
        Population::Fixed(1000)
    }
}

impl Population {
    /// Number of boids for a `width x height` world, capped at
    /// [`MAX_POPULATION`].
    pub fn count(&self, width: u32, height: u32) -> Result<usize, EngineError> {
        let count = match *self {
            Population::Fixed(n) => Some(n),
            Population::Grid(spacing) => {
                // stay in f64 so a tiny spacing cannot saturate the cast
                let cols = (width as f64 / spacing as f64).floor().max(1.0);
                let rows = (height as f64 / spacing as f64).floor().max(1.0);
                if cols * rows > MAX_POPULATION as f64 {
                    None
                } else {
                    (cols as usize).checked_mul(rows as usize)
                }
            }
        };

        match count {
            Some(n) if n <= MAX_POPULATION => Ok(n),
            _ => Err(EngineError::InvalidConfig(format!(
                "population for a {width}x{height} world exceeds {MAX_POPULATION} boids"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub population: Population,
    /// Initial velocities are drawn from `[-initial_speed, initial_speed)` per axis.
    pub initial_speed: f32,
    /// Deterministic seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    /// Boids that get a debug probe.
    pub probe_indices: Vec<usize>,
    /// Parameters installed by initialize; world size is overwritten.
    pub parameters: SimulationParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population: Population::default(),
            initial_speed: 100.0,
            seed: None,
            probe_indices: vec![0],
            parameters: SimulationParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        match self.population {
            Population::Grid(spacing) if !(spacing.is_finite() && spacing > 0.0) => {
                return Err(EngineError::InvalidConfig(format!(
                    "grid spacing must be positive, got {spacing}"
                )));
            }
            Population::Fixed(n) if n > MAX_POPULATION => {
                return Err(EngineError::InvalidConfig(format!(
                    "fixed population {n} exceeds {MAX_POPULATION} boids"
                )));
            }
            _ => {}
        }
        // the sampled range spans twice the speed, which must stay finite
        if !(self.initial_speed >= 0.0 && (2.0 * self.initial_speed).is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "initial_speed must be non-negative, got {}",
                self.initial_speed
            )));
        }
        if !self.parameters.is_valid() {
            return Err(EngineError::InvalidConfig(
                "default parameters violate their invariants".to_string(),
            ));
        }
        Ok(())
    }
}
