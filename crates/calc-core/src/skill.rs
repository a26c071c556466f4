use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Non-combat skills that actions and level teas are tied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Milking,
    Foraging,
    Woodcutting,
    Cheesesmithing,
    Crafting,
    Tailoring,
    Cooking,
    Brewing,
    Enhancing,
}

impl Skill {
    pub const ALL: [Skill; 9] = [
        Skill::Milking,
        Skill::Foraging,
        Skill::Woodcutting,
        Skill::Cheesesmithing,
        Skill::Crafting,
        Skill::Tailoring,
        Skill::Cooking,
        Skill::Brewing,
        Skill::Enhancing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Milking => "milking",
            Skill::Foraging => "foraging",
            Skill::Woodcutting => "woodcutting",
            Skill::Cheesesmithing => "cheesesmithing",
            Skill::Crafting => "crafting",
            Skill::Tailoring => "tailoring",
            Skill::Cooking => "cooking",
            Skill::Brewing => "brewing",
            Skill::Enhancing => "enhancing",
        }
    }

    /// Skill identifier as used in level requirements, e.g. "/skills/milking".
    pub fn hrid(self) -> String {
        format!("/skills/{}", self.as_str())
    }

    /// Action type identifier, e.g. "/action_types/milking".
    pub fn action_type(self) -> String {
        format!("/action_types/{}", self.as_str())
    }

    /// Resolve the skill of an action type identifier. Combat and unknown types yield `None`.
    pub fn from_action_type(action_type: &str) -> Option<Skill> {
        action_type
            .strip_prefix("/action_types/")
            .and_then(|s| s.parse().ok())
    }

    /// Non-combat stat that a tool for this skill improves.
    pub fn tool_stat(self) -> String {
        match self {
            Skill::Enhancing => "enhancingSuccess".to_string(),
            other => format!("{}Speed", other.as_str()),
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSkill(s.to_string()))
    }
}
