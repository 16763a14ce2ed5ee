//! `lootledger-catalog` — the item catalog (pure domain).

pub mod item;

pub use item::{CatalogItem, ItemDraft};
