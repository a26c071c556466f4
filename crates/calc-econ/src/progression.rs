//! Time-to-level estimates from the level experience table.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressionEstimate {
    pub current_level: u32,
    pub target_level: u32,
    pub experience_needed: f64,
    pub actions_needed: f64,
    pub hours_needed: f64,
}

/// Highest level whose cumulative experience threshold is at most `experience`.
pub fn level_for_experience(table: &[u64], experience: f64) -> u32 {
    table
        .iter()
        .rposition(|&threshold| threshold as f64 <= experience)
        .map(|i| i as u32)
        .unwrap_or(0)
}

/// Attempts and hours to go from `current_experience` to `target_level`.
///
/// Returns `None` when the target is unset or outside the table. A target
/// already reached needs zero actions.
pub fn estimate_progression(
    table: &[u64],
    current_experience: f64,
    target_level: Option<u32>,
    experience_per_action: f64,
    efficiency: f64,
    seconds: f64,
) -> Option<ProgressionEstimate> {
    let target_level = target_level?;
    let threshold = *table.get(target_level as usize)? as f64;
    let current = current_experience.max(0.0);
    let experience_needed = (threshold - current).max(0.0);
    let per_attempt = experience_per_action * efficiency;
    let actions_needed = if experience_needed == 0.0 {
        0.0
    } else if per_attempt > 0.0 {
        (experience_needed / per_attempt).ceil()
    } else {
        f64::INFINITY
    };
    Some(ProgressionEstimate {
        current_level: level_for_experience(table, current),
        target_level,
        experience_needed,
        actions_needed,
        hours_needed: actions_needed * seconds / 3600.0,
    })
}
