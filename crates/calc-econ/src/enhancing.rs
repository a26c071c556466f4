//! Expected cost of enhancing an item to a target level.
//!
//! Each attempt at level `i` succeeds with probability `p_i` (one level up, or
//! two with the blessed bonus). A failure resets to level 0, or drops a single
//! level and consumes one protection when protection is active at that level.
//! Expectations come from solving the absorbing Markov chain exactly.

use crate::pricing::PriceResolver;
use calc_core::ItemDetail;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Base success chance per current enhancement level.
pub const BASE_SUCCESS_RATES: [f64; 20] = [
    0.50, 0.45, 0.45, 0.40, 0.40, 0.40, 0.35, 0.35, 0.35, 0.35, 0.30, 0.30, 0.30, 0.30, 0.30,
    0.30, 0.30, 0.30, 0.30, 0.30,
];

pub const MAX_ENHANCEMENT_LEVEL: u32 = 20;

/// Duration of one enhancement attempt before speed bonuses.
pub const BASE_ATTEMPT_SECONDS: f64 = 12.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnhancementInputs {
    /// Enhancing level including level teas.
    pub enhancing_level: f64,
    /// Tool success bonus in percent.
    pub tool_success_percent: f64,
    /// Gear speed bonus in percent.
    pub gear_speed_percent: f64,
    /// Desired enhancement level, clamped to 1..=20.
    pub target_level: u32,
    /// Lowest level at which failures consume a protection instead of resetting.
    pub protect_from: Option<u32>,
    /// Chance that a success climbs two levels.
    pub blessed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnhancementPlan {
    pub target_level: u32,
    /// Success chance at each level below the target.
    pub success_chances: Vec<f64>,
    /// Expected attempts made at each level below the target.
    pub expected_visits: Vec<f64>,
    pub expected_attempts: f64,
    pub expected_protections: f64,
    pub seconds_per_attempt: f64,
    pub expected_hours: f64,
    pub material_cost: f64,
    pub protection_cost: f64,
    pub total_cost: f64,
}

/// Multiplier on base success from the level gap and tool bonus.
pub fn success_multiplier(enhancing_level: f64, item_level: u32, tool_success_percent: f64) -> f64 {
    let item_level = f64::from(item_level);
    if enhancing_level >= item_level {
        1.0 + (0.05 * (enhancing_level - item_level) + tool_success_percent) / 100.0
    } else {
        (1.0 - 0.5 * (1.0 - enhancing_level / item_level)) + tool_success_percent / 100.0
    }
}

/// Seconds per attempt: overleveling and gear speed both shorten attempts.
pub fn attempt_seconds(enhancing_level: f64, item_level: u32, gear_speed_percent: f64) -> f64 {
    let over = (enhancing_level - f64::from(item_level)).max(0.0);
    BASE_ATTEMPT_SECONDS / (1.0 + (over + gear_speed_percent) / 100.0)
}

// Keeps 0 × ∞ at zero for free materials or unused protection.
fn scaled(count: f64, unit: f64) -> f64 {
    if count == 0.0 || unit == 0.0 {
        0.0
    } else {
        count * unit
    }
}

fn is_protected(level: usize, protect_from: Option<u32>) -> bool {
    protect_from.is_some_and(|p| level >= p.max(1) as usize)
}

/// Solve `a · x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        let pivot_row = a[col].clone();
        for row in col + 1..n {
            let f = a[row][col] / pivot_row[col];
            if f == 0.0 {
                continue;
            }
            for (k, p) in pivot_row.iter().enumerate().skip(col) {
                a[row][k] -= f * p;
            }
            b[row] -= f * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Expected attempts at each level 0..target, starting from level 0.
/// `None` when some level can never be passed.
pub fn expected_visits(chances: &[f64], protect_from: Option<u32>, blessed: f64) -> Option<Vec<f64>> {
    let n = chances.len();
    if chances.iter().any(|&p| p <= 0.0) {
        return None;
    }
    // a = (I - Q)^T, where Q holds transitions between levels below the target.
    let mut a = vec![vec![0.0; n]; n];
    for (i, row) in a.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    for (i, &p) in chances.iter().enumerate() {
        let mut step = |to: usize, prob: f64| {
            if to < n {
                a[to][i] -= prob;
            }
        };
        step(i + 1, p * (1.0 - blessed));
        step(i + 2, p * blessed);
        let fail_to = if is_protected(i, protect_from) { i - 1 } else { 0 };
        step(fail_to, 1.0 - p);
    }
    let mut start = vec![0.0; n];
    if n > 0 {
        start[0] = 1.0;
    }
    solve(a, start)
}

/// Expected attempts, protections, time and coin to enhance `item` from 0 to the target.
pub fn plan_enhancement(
    item: &ItemDetail,
    inputs: &EnhancementInputs,
    prices: &PriceResolver<'_>,
    protection_price: Option<Decimal>,
) -> EnhancementPlan {
    let target_level = inputs.target_level.clamp(1, MAX_ENHANCEMENT_LEVEL);
    let multiplier = success_multiplier(
        inputs.enhancing_level,
        item.item_level,
        inputs.tool_success_percent,
    );
    let success_chances: Vec<f64> = BASE_SUCCESS_RATES[..target_level as usize]
        .iter()
        .map(|base| (base * multiplier).clamp(0.0, 1.0))
        .collect();
    let seconds_per_attempt = attempt_seconds(
        inputs.enhancing_level,
        item.item_level,
        inputs.gear_speed_percent,
    );

    let blessed = inputs.blessed.clamp(0.0, 1.0);
    let (expected_visits, expected_attempts, expected_protections) =
        match expected_visits(&success_chances, inputs.protect_from, blessed) {
            Some(visits) => {
                let attempts = visits.iter().sum();
                let protections = visits
                    .iter()
                    .zip(&success_chances)
                    .enumerate()
                    .filter(|(i, _)| is_protected(*i, inputs.protect_from))
                    .map(|(_, (v, p))| v * (1.0 - p))
                    .sum();
                (visits, attempts, protections)
            }
            None => {
                let protections = match inputs.protect_from {
                    Some(_) => f64::INFINITY,
                    None => 0.0,
                };
                (vec![], f64::INFINITY, protections)
            }
        };

    let cost_per_attempt: f64 = item
        .enhancement_costs
        .iter()
        .map(|c| c.count * prices.price_f64(&c.item_hrid))
        .sum();
    let protection_unit = protection_price
        .map(crate::pricing::to_f64)
        .unwrap_or_else(|| prices.price_f64(&item.hrid));
    let material_cost = scaled(expected_attempts, cost_per_attempt);
    let protection_cost = scaled(expected_protections, protection_unit);

    debug!(
        item = %item.hrid,
        target_level,
        expected_attempts,
        expected_protections,
        "enhancement plan"
    );

    EnhancementPlan {
        target_level,
        success_chances,
        expected_visits,
        expected_attempts,
        expected_protections,
        seconds_per_attempt,
        expected_hours: expected_attempts * seconds_per_attempt / 3600.0,
        material_cost,
        protection_cost,
        total_cost: material_cost + protection_cost,
    }
}
