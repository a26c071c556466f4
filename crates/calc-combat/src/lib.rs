#![deny(warnings)]

//! Combat zone economics: encounter-rate estimation and hourly loot.
//!
//! Estimators are selected from [`calc_core::EngineConfig`] via
//! [`build_estimator`]; their estimates feed [`aggregate_loot`] and
//! [`encounter_rows`] for display.

pub mod estimator;
pub mod loot;

pub use estimator::{
    build_estimator, EncounterEstimator, EncounterRateEstimate, EncounterSample,
    MonteCarloEstimator, StaticTableEstimator, MAX_SIMULATED_CLEARS,
};
pub use loot::{aggregate_loot, encounter_rows, EncounterRow, LootReport, LootRow, TimeScale};
