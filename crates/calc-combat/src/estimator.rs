//! Encounter-rate estimation for combat zones.
//!
//! Two interchangeable strategies sit behind [`EncounterEstimator`]:
//! - [`StaticTableEstimator`] reads curated per-zone rate tables, falling back
//!   to the zone's raw spawn weights
//! - [`MonteCarloEstimator`] samples `ceil(kph)` clears from the spawn rules
//!   (at most [`MAX_SIMULATED_CLEARS`]), with every 10th clear replaced by the
//!   boss fight

use calc_core::{ActionDefinition, ActionId, EngineConfig, EstimatorMode, MonsterId, MonsterSpawnInfo};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Every clear with a 1-based index divisible by this is a boss fight.
pub const BOSS_CLEAR_INTERVAL: usize = 10;

/// Upper bound on clears sampled per estimate. A multiple of
/// [`BOSS_CLEAR_INTERVAL`] so capped runs keep the boss share.
pub const MAX_SIMULATED_CLEARS: usize = 100_000;

/// Monsters of one simulated clear, in draw order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EncounterSample {
    pub monsters: Vec<MonsterId>,
}

/// Estimated appearances per clear, one entry per monster in zone order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EncounterRateEstimate {
    pub rates: Vec<(MonsterId, f64)>,
}

impl EncounterRateEstimate {
    /// Rate of `monster`, zero when it was never encountered.
    pub fn rate(&self, monster: &MonsterId) -> f64 {
        self.rates
            .iter()
            .find(|(m, _)| m == monster)
            .map(|(_, r)| *r)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

/// Strategy producing per-monster encounter rates for a zone at a given kph.
pub trait EncounterEstimator {
    fn mode(&self) -> EstimatorMode;

    /// A zone without spawn data, or a kph that is not positive, yields an empty estimate.
    fn estimate(&mut self, zone: &ActionDefinition, kph: f64) -> EncounterRateEstimate;
}

/// Zone monsters in report order: spawn list first, then the boss set, each once.
pub fn zone_monsters(info: &MonsterSpawnInfo) -> Vec<MonsterId> {
    let mut out: Vec<MonsterId> = Vec::new();
    let all = info
        .spawns
        .iter()
        .map(|s| &s.combat_monster_hrid)
        .chain(info.boss_fight_monsters.iter());
    for monster in all {
        if !out.contains(monster) {
            out.push(monster.clone());
        }
    }
    out
}

fn usable_kph(kph: f64) -> bool {
    kph.is_finite() && kph > 0.0
}

/// Curated rate tables keyed by zone, with the raw spawn weights as fallback.
#[derive(Clone, Debug, Default)]
pub struct StaticTableEstimator {
    tables: BTreeMap<ActionId, BTreeMap<MonsterId, f64>>,
}

impl StaticTableEstimator {
    pub fn new(tables: BTreeMap<ActionId, BTreeMap<MonsterId, f64>>) -> Self {
        Self { tables }
    }

    /// Rate table of `zone` without regard to kph.
    pub fn rates_for(&self, zone: &ActionDefinition) -> EncounterRateEstimate {
        let Some(info) = zone.spawn_info() else {
            return EncounterRateEstimate::default();
        };
        let rates = match self.tables.get(&zone.hrid) {
            Some(table) => {
                let mut rates: Vec<(MonsterId, f64)> = zone_monsters(info)
                    .into_iter()
                    .filter_map(|m| table.get(&m).map(|r| (m, *r)))
                    .collect();
                for (m, r) in table {
                    if !rates.iter().any(|(seen, _)| seen == m) {
                        rates.push((m.clone(), *r));
                    }
                }
                rates
            }
            None => {
                debug!(zone = %zone.hrid, "no curated table, using raw spawn rates");
                let mut rates: Vec<(MonsterId, f64)> = Vec::new();
                for spawn in &info.spawns {
                    match rates.iter_mut().find(|(m, _)| *m == spawn.combat_monster_hrid) {
                        Some((_, r)) => *r += spawn.rate,
                        None => rates.push((spawn.combat_monster_hrid.clone(), spawn.rate)),
                    }
                }
                rates
            }
        };
        EncounterRateEstimate { rates }
    }
}

impl EncounterEstimator for StaticTableEstimator {
    fn mode(&self) -> EstimatorMode {
        EstimatorMode::StaticTable
    }

    fn estimate(&mut self, zone: &ActionDefinition, kph: f64) -> EncounterRateEstimate {
        if !usable_kph(kph) {
            return EncounterRateEstimate::default();
        }
        self.rates_for(zone)
    }
}

/// Draw one clear: up to `max_spawn_count` weighted draws, stopping at the
/// first monster that would push total strength past the budget.
pub fn random_encounter<R: Rng + ?Sized>(info: &MonsterSpawnInfo, rng: &mut R) -> EncounterSample {
    let total_weight: f64 = info.spawns.iter().map(|s| s.rate).sum();
    let mut monsters = Vec::new();
    let mut total_strength = 0.0;
    'slots: for _ in 0..info.max_spawn_count {
        let target = total_weight * rng.gen::<f64>();
        let mut cumulative = 0.0;
        for spawn in &info.spawns {
            cumulative += spawn.rate;
            if target <= cumulative {
                total_strength += spawn.strength;
                if total_strength > info.max_total_strength {
                    break 'slots;
                }
                monsters.push(spawn.combat_monster_hrid.clone());
                break;
            }
        }
    }
    EncounterSample { monsters }
}

/// Number of clears to sample for `kph`: `ceil(kph)`, capped at [`MAX_SIMULATED_CLEARS`].
pub fn clear_count(kph: f64) -> usize {
    if !usable_kph(kph) {
        return 0;
    }
    let wanted = kph.ceil();
    if wanted >= MAX_SIMULATED_CLEARS as f64 {
        MAX_SIMULATED_CLEARS
    } else {
        wanted as usize
    }
}

/// Clears drawn lazily, [`clear_count`] of them; clears 10, 20, 30… are the boss fight.
pub fn simulate_clears<'a, R: Rng + ?Sized>(
    info: &'a MonsterSpawnInfo,
    kph: f64,
    rng: &'a mut R,
) -> impl Iterator<Item = EncounterSample> + 'a {
    (1..=clear_count(kph)).map(move |i| {
        if i % BOSS_CLEAR_INTERVAL == 0 {
            EncounterSample {
                monsters: info.boss_fight_monsters.clone(),
            }
        } else {
            random_encounter(info, &mut *rng)
        }
    })
}

/// Kills per monster across all clears.
pub fn tally_kills<I>(samples: I) -> BTreeMap<MonsterId, u64>
where
    I: IntoIterator,
    I::Item: Borrow<EncounterSample>,
{
    let mut kills = BTreeMap::new();
    for sample in samples {
        for monster in &sample.borrow().monsters {
            *kills.entry(monster.clone()).or_insert(0) += 1;
        }
    }
    kills
}

/// Kills divided by kph, for the zone's monsters that were killed at least once.
///
/// `clears` is how many clears produced `kills`; when fewer than `ceil(kph)`
/// were sampled the counts are scaled up to the full hour.
pub fn encounter_rates(
    info: &MonsterSpawnInfo,
    kills: &BTreeMap<MonsterId, u64>,
    clears: usize,
    kph: f64,
) -> EncounterRateEstimate {
    if !usable_kph(kph) || clears == 0 {
        return EncounterRateEstimate::default();
    }
    let scale = kph.ceil() / clears as f64;
    let rates = zone_monsters(info)
        .into_iter()
        .filter_map(|m| {
            let k = *kills.get(&m)?;
            Some((m, k as f64 * scale / kph))
        })
        .collect();
    EncounterRateEstimate { rates }
}

/// Sampling estimator; results vary with the random source.
#[derive(Clone, Debug)]
pub struct MonteCarloEstimator<R = ChaCha8Rng> {
    rng: R,
}

impl MonteCarloEstimator<ChaCha8Rng> {
    /// Reproducible sampling from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> MonteCarloEstimator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn simulate_encounters(&mut self, zone: &ActionDefinition, kph: f64) -> EncounterRateEstimate {
        let Some(info) = zone.spawn_info() else {
            debug!(zone = %zone.hrid, "zone has no spawn data");
            return EncounterRateEstimate::default();
        };
        let clears = clear_count(kph);
        if kph.ceil() > MAX_SIMULATED_CLEARS as f64 {
            warn!(zone = %zone.hrid, kph, clears, "kph above the sampling cap, scaling sampled kills");
        }
        let kills = tally_kills(simulate_clears(info, kph, &mut self.rng));
        debug!(zone = %zone.hrid, clears, monsters = kills.len(), "simulated clears");
        encounter_rates(info, &kills, clears, kph)
    }
}

impl<R: Rng> EncounterEstimator for MonteCarloEstimator<R> {
    fn mode(&self) -> EstimatorMode {
        EstimatorMode::MonteCarlo
    }

    fn estimate(&mut self, zone: &ActionDefinition, kph: f64) -> EncounterRateEstimate {
        self.simulate_encounters(zone, kph)
    }
}

/// Estimator selected by `config.estimator`.
pub fn build_estimator(config: &EngineConfig) -> Box<dyn EncounterEstimator> {
    match config.estimator {
        EstimatorMode::StaticTable => Box::new(StaticTableEstimator::new(config.spawn_tables.clone())),
        EstimatorMode::MonteCarlo => match config.rng_seed {
            Some(seed) => Box::new(MonteCarloEstimator::seeded(seed)),
            None => Box::new(MonteCarloEstimator::from_entropy()),
        },
    }
}
