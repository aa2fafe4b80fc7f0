/*
 * Debug Probe Module
 *
 * A DebugProbe follows one boid and records which boids it saw as
 * neighbors on the latest frame. Probes are refreshed every step and are
 * read-only from the simulation's point of view.
 */

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugProbe {
    #[serde(rename = "index")]
    pub agent_index: usize,
    pub neighbor_indices: Vec<usize>,
}

impl DebugProbe {
    pub fn new(agent_index: usize) -> Self {
        Self {
            agent_index,
            neighbor_indices: Vec::new(),
        }
    }
}
