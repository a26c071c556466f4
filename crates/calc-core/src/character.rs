use serde::{Deserialize, Serialize};

/// Character stats entered by the operator. `None` means "not entered yet",
/// which is distinct from an entered zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterInputs {
    /// Skill level; treated as 1 when unset.
    pub level: Option<u32>,
    /// Tool speed (or, for enhancing, success) bonus in percent.
    pub tool_bonus: Option<f64>,
    /// Gear efficiency in percent.
    pub gear_efficiency: Option<f64>,
    /// Gear speed in percent (enhancing only).
    pub gear_speed: Option<f64>,
    /// Current total experience in the skill, for progression queries.
    pub experience: Option<f64>,
    /// Level to reach, for progression queries.
    pub target_level: Option<u32>,
}

impl CharacterInputs {
    pub fn level_or_default(&self) -> u32 {
        self.level.unwrap_or(1)
    }

    pub fn tool_bonus_or_zero(&self) -> f64 {
        self.tool_bonus.unwrap_or(0.0)
    }

    pub fn gear_efficiency_or_zero(&self) -> f64 {
        self.gear_efficiency.unwrap_or(0.0)
    }

    pub fn gear_speed_or_zero(&self) -> f64 {
        self.gear_speed.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_fall_back() {
        let c = CharacterInputs::default();
        assert_eq!(c.level_or_default(), 1);
        assert_eq!(c.tool_bonus_or_zero(), 0.0);
        assert_eq!(c.gear_efficiency_or_zero(), 0.0);
    }

    #[test]
    fn entered_zero_is_kept() {
        let c = CharacterInputs {
            level: Some(0),
            ..Default::default()
        };
        assert_eq!(c.level_or_default(), 0);
    }
}
