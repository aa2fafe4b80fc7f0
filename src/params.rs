/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds the tunable
 * knobs of the flocking rules. Parameters live in fixed named fields; the
 * string-keyed form only exists at the boundary, where a sparse patch of
 * name -> value pairs is merged into the persisted set once per step.
 */

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Sparse parameter patch as received from the host. Keys that are not
/// listed keep their previous value.
pub type ParamOverrides = HashMap<String, f32>;

// Parameters for the simulation, adjustable every frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
    pub neighbor_radius: f32,
    pub max_speed: f32,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub random_weight: f32,
    pub stimulus_weight: f32,
    /// Fraction of the previous velocity blended into the new one.
    pub damping: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            neighbor_radius: 50.0,
            max_speed: 200.0,
            separation_weight: 3.0,
            cohesion_weight: 1.0,
            alignment_weight: 3.0,
            random_weight: 1.0,
            stimulus_weight: 1.0,
            damping: 0.25,
            world_width: 1000.0,
            world_height: 1000.0,
        }
    }
}

/// Name of a single tunable parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    NeighborRadius,
    MaxSpeed,
    SeparationWeight,
    CohesionWeight,
    AlignmentWeight,
    RandomWeight,
    StimulusWeight,
    Damping,
    WorldWidth,
    WorldHeight,
}

impl ParamKey {
    pub const ALL: [ParamKey; 10] = [
        ParamKey::NeighborRadius,
        ParamKey::MaxSpeed,
        ParamKey::SeparationWeight,
        ParamKey::CohesionWeight,
        ParamKey::AlignmentWeight,
        ParamKey::RandomWeight,
        ParamKey::StimulusWeight,
        ParamKey::Damping,
        ParamKey::WorldWidth,
        ParamKey::WorldHeight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::NeighborRadius => "neighborRadius",
            ParamKey::MaxSpeed => "maxSpeed",
            ParamKey::SeparationWeight => "separationWeight",
            ParamKey::CohesionWeight => "cohesionWeight",
            ParamKey::AlignmentWeight => "alignmentWeight",
            ParamKey::RandomWeight => "randomWeight",
            ParamKey::StimulusWeight => "stimulusWeight",
            ParamKey::Damping => "damping",
            ParamKey::WorldWidth => "worldWidth",
            ParamKey::WorldHeight => "worldHeight",
        }
    }

    // Whether `value` keeps the parameter invariants intact
    fn accepts(self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            ParamKey::WorldWidth | ParamKey::WorldHeight => value > 0.0,
            ParamKey::MaxSpeed | ParamKey::NeighborRadius => value >= 0.0,
            _ => true,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = ();

    // Accepts the canonical names plus the legacy settings names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "neighborRadius" | "distMax" => ParamKey::NeighborRadius,
            "maxSpeed" | "velocityMax" => ParamKey::MaxSpeed,
            "separationWeight" | "separationFactor" => ParamKey::SeparationWeight,
            "cohesionWeight" | "cohesionFactor" => ParamKey::CohesionWeight,
            "alignmentWeight" | "alignmentFactor" => ParamKey::AlignmentWeight,
            "randomWeight" | "randomFactor" => ParamKey::RandomWeight,
            "stimulusWeight" | "fearFactor" => ParamKey::StimulusWeight,
            "damping" => ParamKey::Damping,
            "worldWidth" | "width" => ParamKey::WorldWidth,
            "worldHeight" | "height" => ParamKey::WorldHeight,
            _ => return Err(()),
        };
        Ok(key)
    }
}

impl SimulationParams {
    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    pub fn get(&self, key: ParamKey) -> f32 {
        match key {
            ParamKey::NeighborRadius => self.neighbor_radius,
            ParamKey::MaxSpeed => self.max_speed,
            ParamKey::SeparationWeight => self.separation_weight,
            ParamKey::CohesionWeight => self.cohesion_weight,
            ParamKey::AlignmentWeight => self.alignment_weight,
            ParamKey::RandomWeight => self.random_weight,
            ParamKey::StimulusWeight => self.stimulus_weight,
            ParamKey::Damping => self.damping,
            ParamKey::WorldWidth => self.world_width,
            ParamKey::WorldHeight => self.world_height,
        }
    }

    fn slot_mut(&mut self, key: ParamKey) -> &mut f32 {
        match key {
            ParamKey::NeighborRadius => &mut self.neighbor_radius,
            ParamKey::MaxSpeed => &mut self.max_speed,
            ParamKey::SeparationWeight => &mut self.separation_weight,
            ParamKey::CohesionWeight => &mut self.cohesion_weight,
            ParamKey::AlignmentWeight => &mut self.alignment_weight,
            ParamKey::RandomWeight => &mut self.random_weight,
            ParamKey::StimulusWeight => &mut self.stimulus_weight,
            ParamKey::Damping => &mut self.damping,
            ParamKey::WorldWidth => &mut self.world_width,
            ParamKey::WorldHeight => &mut self.world_height,
        }
    }

    /// Set one parameter. Returns `false` and leaves the old value in place
    /// if `value` would break an invariant (non-finite, non-positive world
    /// size, negative speed or radius).
    pub fn set(&mut self, key: ParamKey, value: f32) -> bool {
        if !key.accepts(value) {
            return false;
        }
        *self.slot_mut(key) = value;
        true
    }

    /// Merge a sparse patch into the persisted parameters. Unknown keys are
    /// skipped so newer hosts can talk to older engines. Returns the number
    /// of values actually applied.
    ///
    /// When a patch names one parameter under both its canonical and a legacy
    /// name, the canonical entry wins regardless of map order.
    pub fn apply_overrides(&mut self, overrides: &ParamOverrides) -> usize {
        let mut resolved = Vec::with_capacity(overrides.len());
        for (name, &value) in overrides {
            match name.parse::<ParamKey>() {
                Ok(key) => resolved.push((key, name.as_str() == key.as_str(), value)),
                Err(_) => debug!(key = %name, "ignoring unknown parameter override"),
            }
        }
        // aliases sort before the canonical name, so it is applied last
        resolved.sort_by_key(|&(key, canonical, _)| (key, canonical));

        let mut applied = 0;
        for (key, _, value) in resolved {
            if self.set(key, value) {
                debug!(%key, value, "parameter override applied");
                applied += 1;
            } else {
                warn!(%key, value, "rejected parameter override");
            }
        }
        applied
    }

    // Canonical name -> value view, as reported in snapshots
    pub fn to_map(&self) -> BTreeMap<String, f32> {
        ParamKey::ALL
            .iter()
            .map(|&key| (key.as_str().to_string(), self.get(key)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        ParamKey::ALL.iter().all(|&key| key.accepts(self.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(entries: &[(&str, f32)]) -> ParamOverrides {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn overrides_are_sparse() {
        let mut params = SimulationParams::default();
        let applied = params.apply_overrides(&patch(&[("maxSpeed", 42.0)]));
        assert_eq!(applied, 1);
        assert_eq!(params.max_speed, 42.0);
        assert_eq!(params.neighbor_radius, SimulationParams::default().neighbor_radius);
        assert_eq!(params.separation_weight, SimulationParams::default().separation_weight);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut params = SimulationParams::default();
        let applied = params.apply_overrides(&patch(&[("turbulence", 9.0), ("cohesionWeight", 0.5)]));
        assert_eq!(applied, 1);
        assert_eq!(params.cohesion_weight, 0.5);
    }

    #[test]
    fn legacy_names_are_aliases() {
        let mut params = SimulationParams::default();
        params.apply_overrides(&patch(&[("distMax", 75.0), ("fearFactor", -2.0), ("width", 640.0)]));
        assert_eq!(params.neighbor_radius, 75.0);
        assert_eq!(params.stimulus_weight, -2.0);
        assert_eq!(params.world_width, 640.0);
    }

    #[test]
    fn canonical_name_beats_its_alias() {
        // every map gets fresh hash keys, so this covers many iteration orders
        for _ in 0..200 {
            let mut params = SimulationParams::default();
            params.apply_overrides(&patch(&[("distMax", 10.0), ("neighborRadius", 90.0)]));
            assert_eq!(params.neighbor_radius, 90.0);

            params.apply_overrides(&patch(&[("maxSpeed", 30.0), ("velocityMax", 70.0), ("width", 1.0)]));
            assert_eq!(params.max_speed, 30.0);
            assert_eq!(params.world_width, 1.0);
        }
    }

    #[test]
    fn invariant_breaking_values_are_rejected() {
        let mut params = SimulationParams::default();
        let applied = params.apply_overrides(&patch(&[
            ("worldWidth", 0.0),
            ("worldHeight", -5.0),
            ("maxSpeed", -1.0),
            ("neighborRadius", f32::NAN),
            ("randomWeight", f32::INFINITY),
        ]));
        assert_eq!(applied, 0);
        assert_eq!(params, SimulationParams::default());
        assert!(params.is_valid());
    }

    #[test]
    fn map_uses_canonical_names() {
        let map = SimulationParams::default().to_map();
        assert_eq!(map.len(), ParamKey::ALL.len());
        assert_eq!(map["neighborRadius"], 50.0);
        assert_eq!(map["damping"], 0.25);
        for key in ParamKey::ALL {
            assert_eq!(key.as_str().parse::<ParamKey>(), Ok(key));
        }
    }
}
