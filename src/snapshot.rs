/*
 * Snapshot Module
 *
 * Plain, serialization-friendly copies of the world handed to the host
 * after every call. Boids are flattened to [x, y, vx, vy] and parameters to
 * a canonical name -> value map.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::WorldState;
use crate::debug::DebugProbe;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStateSnapshot {
    pub agents: Vec<[f32; 4]>,
    pub parameters: BTreeMap<String, f32>,
    pub debug_probes: Vec<DebugProbe>,
}

impl From<&WorldState> for WorldStateSnapshot {
    fn from(state: &WorldState) -> Self {
        Self {
            agents: state.boids.iter().map(|b| b.to_array()).collect(),
            parameters: state.params.to_map(),
            debug_probes: state.probes.clone(),
        }
    }
}

impl WorldStateSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
