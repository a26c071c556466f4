use crate::ids::{ActionId, MonsterId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How per-zone encounter rates are estimated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorMode {
    /// Curated per-zone rate tables, falling back to the raw spawn weights.
    StaticTable,
    /// Sample clears from the spawn rules.
    #[default]
    MonteCarlo,
}

/// Engine configuration parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub estimator: EstimatorMode,
    /// Seed for the Monte Carlo sampler; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// Curated probability-of-appearance-per-clear tables, per zone.
    pub spawn_tables: BTreeMap<ActionId, BTreeMap<MonsterId, f64>>,
}
