//! `lootledger-pricing` — payout resolution (pure domain).
//!
//! One canonical resolver decides the effective payout percentage for a
//! line: non-payable wins, then an item-level override, then the member's
//! rank (bonus-aware), then zero. Every price shown or paid anywhere in the
//! system goes through this crate.

pub mod resolver;

pub use resolver::{
    PayoutInputs, PricedLine, PricedLines, PricingLine, effective_percent, price_lines,
    resolve_unit_price,
};
