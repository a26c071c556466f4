//! Tea buffs: turning a selection of consumables into a bonus bundle.

use calc_core::{ItemDetail, Skill};
use serde::Serialize;
use thiserror::Error;

/// Materials-cost multiplier of artisan tea.
pub const ARTISAN_TEA_BONUS: f64 = 0.9;
/// Additive chance of a double enhancement success from blessed tea.
pub const BLESSED_TEA_BONUS: f64 = 0.01;
/// Additive efficiency from efficiency tea.
pub const EFFICIENCY_TEA_BONUS: f64 = 0.1;
/// Yield multiplier of gathering tea.
pub const GATHERING_TEA_BONUS: f64 = 1.15;
/// Output multiplier of gourmet tea.
pub const GOURMET_TEA_BONUS: f64 = 1.12;
/// Experience multiplier of wisdom tea.
pub const WISDOM_TEA_BONUS: f64 = 1.12;
/// Flat level bonus of a skill tea.
pub const LEVEL_TEA_BONUS: f64 = 3.0;
/// Flat level bonus of a super skill tea.
pub const SUPER_LEVEL_TEA_BONUS: f64 = 6.0;

pub const ARTISAN_TEA: &str = "/items/artisan_tea";
pub const BLESSED_TEA: &str = "/items/blessed_tea";
pub const EFFICIENCY_TEA: &str = "/items/efficiency_tea";
pub const GATHERING_TEA: &str = "/items/gathering_tea";
pub const GOURMET_TEA: &str = "/items/gourmet_tea";
pub const WISDOM_TEA: &str = "/items/wisdom_tea";

/// Item id of the normal level tea of a skill, e.g. "/items/foraging_tea".
pub fn level_tea(skill: Skill) -> String {
    format!("/items/{}_tea", skill)
}

/// Item id of the super level tea of a skill, e.g. "/items/super_foraging_tea".
pub fn super_level_tea(skill: Skill) -> String {
    format!("/items/super_{}_tea", skill)
}

/// Both level teas of one skill are selected; only one may be active.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize)]
#[error("cannot use both {skill} teas")]
pub struct BuffConflict {
    pub skill: Skill,
}

/// Resolved bonuses of a tea selection. Absent teas contribute their identity value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuffBundle {
    pub artisan: f64,
    pub wisdom: f64,
    pub gourmet: f64,
    pub blessed: f64,
    pub gathering: f64,
    pub efficiency: f64,
    /// Flat level bonus; zero while `conflict` is set.
    pub level: f64,
    pub conflict: Option<BuffConflict>,
}

impl Default for BuffBundle {
    fn default() -> Self {
        Self {
            artisan: 1.0,
            wisdom: 1.0,
            gourmet: 1.0,
            blessed: 0.0,
            gathering: 1.0,
            efficiency: 0.0,
            level: 0.0,
            conflict: None,
        }
    }
}

impl BuffBundle {
    /// Message to surface next to the tea input, if the selection is invalid.
    pub fn error_message(&self) -> Option<String> {
        self.conflict.map(|c| c.to_string())
    }
}

/// Resolve selected consumable ids into bonuses for an action of `skill`.
///
/// Selecting both the normal and super tea of `skill` reports a conflict and
/// leaves the level bonus at zero; all other bonuses still apply.
pub fn resolve_buffs<S: AsRef<str>>(selected: &[S], skill: Option<Skill>) -> BuffBundle {
    let has = |id: &str| selected.iter().any(|s| s.as_ref() == id);
    let pick = |id: &str, bonus: f64, identity: f64| if has(id) { bonus } else { identity };

    let (level, conflict) = match skill {
        Some(skill) => {
            let normal = has(&level_tea(skill));
            let super_ = has(&super_level_tea(skill));
            match (normal, super_) {
                (true, true) => (0.0, Some(BuffConflict { skill })),
                (_, true) => (SUPER_LEVEL_TEA_BONUS, None),
                (true, false) => (LEVEL_TEA_BONUS, None),
                (false, false) => (0.0, None),
            }
        }
        None => (0.0, None),
    };

    BuffBundle {
        artisan: pick(ARTISAN_TEA, ARTISAN_TEA_BONUS, 1.0),
        wisdom: pick(WISDOM_TEA, WISDOM_TEA_BONUS, 1.0),
        gourmet: pick(GOURMET_TEA, GOURMET_TEA_BONUS, 1.0),
        blessed: pick(BLESSED_TEA, BLESSED_TEA_BONUS, 0.0),
        gathering: pick(GATHERING_TEA, GATHERING_TEA_BONUS, 1.0),
        efficiency: pick(EFFICIENCY_TEA, EFFICIENCY_TEA_BONUS, 0.0),
        level,
        conflict,
    }
}

/// Consumables usable in `action_type`, in catalog order.
pub fn available_buffs<'a>(
    items: impl IntoIterator<Item = &'a ItemDetail>,
    action_type: &str,
) -> Vec<&'a ItemDetail> {
    items
        .into_iter()
        .filter(|i| i.is_usable_in(action_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{ConsumableDetail, EquipmentDetail, ItemId};
    use rust_decimal::Decimal;

    #[test]
    fn empty_selection_is_neutral() {
        let none: [&str; 0] = [];
        assert_eq!(resolve_buffs(&none, Some(Skill::Milking)), BuffBundle::default());
    }

    #[test]
    fn skill_agnostic_teas_apply() {
        let b = resolve_buffs(&[WISDOM_TEA, GATHERING_TEA, EFFICIENCY_TEA], None);
        assert_eq!(b.wisdom, WISDOM_TEA_BONUS);
        assert_eq!(b.gathering, GATHERING_TEA_BONUS);
        assert_eq!(b.efficiency, EFFICIENCY_TEA_BONUS);
        assert_eq!(b.artisan, 1.0);
        assert_eq!(b.blessed, 0.0);
        assert_eq!(b.level, 0.0);
    }

    #[test]
    fn level_teas_by_tier() {
        let normal = resolve_buffs(&["/items/foraging_tea"], Some(Skill::Foraging));
        assert_eq!(normal.level, LEVEL_TEA_BONUS);
        assert!(normal.conflict.is_none());

        let super_ = resolve_buffs(&["/items/super_foraging_tea"], Some(Skill::Foraging));
        assert_eq!(super_.level, SUPER_LEVEL_TEA_BONUS);
        assert!(super_.conflict.is_none());
    }

    #[test]
    fn other_skill_tea_does_nothing() {
        let b = resolve_buffs(&["/items/milking_tea"], Some(Skill::Foraging));
        assert_eq!(b.level, 0.0);
        assert!(b.conflict.is_none());
    }

    #[test]
    fn both_tiers_conflict() {
        for skill in Skill::ALL {
            let b = resolve_buffs(
                &[level_tea(skill), super_level_tea(skill), WISDOM_TEA.to_string()],
                Some(skill),
            );
            let msg = b.error_message().expect("conflict expected");
            assert!(msg.contains(skill.as_str()));
            assert_eq!(b.level, 0.0);
            assert_eq!(b.wisdom, WISDOM_TEA_BONUS);
        }
    }

    #[test]
    fn lists_usable_consumables() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("/action_types/milking".to_string(), true);
        let tea = ItemDetail {
            hrid: ItemId::from("/items/milking_tea"),
            name: "Milking Tea".to_string(),
            category_hrid: String::new(),
            sell_price: Decimal::ZERO,
            item_level: 0,
            sort_index: 0,
            consumable_detail: ConsumableDetail {
                usable_in_action_type_map: map,
            },
            equipment_detail: EquipmentDetail::default(),
            enhancement_costs: vec![],
        };
        let items = vec![tea];
        assert_eq!(available_buffs(&items, "/action_types/milking").len(), 1);
        assert!(available_buffs(&items, "/action_types/foraging").is_empty());
    }
}
