#![deny(warnings)]

//! Session layer over the calculators.
//!
//! [`Calculator`] owns the catalogs, market data and session price overrides,
//! and keeps encounter estimates in a caller-owned [`Memo`] so sampled rates
//! only change when the zone or kph does.

mod memo;
mod session;

pub use memo::Memo;
pub use session::{ActionTable, Calculator, CombatReport, EnhancementRequest};
