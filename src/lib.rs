/*
 * Boid Flocking Engine - Module Definitions
 *
 * This file defines the module structure of the flocking engine. A host
 * render loop calls Engine::initialize once and Engine::step every frame;
 * everything else is the per-frame math behind those two calls.
 */

// Re-export key components for easier access
pub use app::{Engine, EnginePhase, StepRequest, WorldState};
pub use boid::Boid;
pub use config::{EngineConfig, Population};
pub use debug::DebugProbe;
pub use error::EngineError;
pub use params::{ParamKey, ParamOverrides, SimulationParams};
pub use snapshot::WorldStateSnapshot;

// Define modules
pub mod app;
pub mod boid;
pub mod config;
pub mod debug;
pub mod error;
pub mod neighbors;
pub mod params;
pub mod physics;
pub mod snapshot;
pub mod torus;

// Constants
pub const STIMULUS_RADIUS: f32 = 100.0;
pub const ALIGNMENT_SCALE: f32 = 10.0;
pub const MAX_POPULATION: usize = 100_000;
