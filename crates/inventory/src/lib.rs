//! `lootledger-inventory` — current on-hand counts and their valuation.
//!
//! An [`InventoryEntry`] is the current count of one item for one member —
//! not a ledger. The aggregation functions here are pure views over an
//! immutable snapshot of entries + reference data; persistence-side upsert
//! semantics live behind the store.

pub mod entry;
pub mod view;

pub use entry::InventoryEntry;
pub use view::{InventoryLine, MemberInventoryView, member_inventory, owners_of, search_holders};
