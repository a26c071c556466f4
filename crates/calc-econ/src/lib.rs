#![deny(warnings)]

//! Economic calculators for gathering and production actions.
//!
//! This crate provides:
//! - Buff resolution from a tea selection
//! - Action rates: seconds per action, efficiency and tool bonuses
//! - Unit pricing with overrides and the market fallback chain
//! - Per-action experience, yield and profit rows
//! - Progression and enhancement cost estimates
//! - The searchable market table

pub mod buffs;
pub mod enhancing;
pub mod listing;
pub mod pricing;
pub mod progression;
pub mod rates;
pub mod yields;

pub use buffs::{available_buffs, resolve_buffs, BuffBundle, BuffConflict};
pub use enhancing::{plan_enhancement, EnhancementInputs, EnhancementPlan};
pub use listing::{market_listing, MarketListingRow};
pub use pricing::{market_price, unit_price, PriceResolver, MARKET_TAX_COEFFICIENT};
pub use progression::{estimate_progression, level_for_experience, ProgressionEstimate};
pub use rates::{
    effective_level, effective_seconds, efficiency_multiplier, tool_bonus_percent,
    MIN_ACTION_SECONDS,
};
pub use yields::{compute_row, compute_rows, relevant_items, ActionRow, ItemRate};
