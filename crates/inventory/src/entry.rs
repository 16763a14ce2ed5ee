use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lootledger_core::{ItemId, MemberId};

/// Current on-hand quantity of one item for one member.
///
/// At most one entry exists per (member, item) pair; granting more of an
/// already-held item increments the existing entry. Entries at quantity
/// zero are deleted rather than persisted. `item_name` is denormalized so
/// the entry stays displayable after its catalog item is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub member: MemberId,
    pub item: ItemId,
    pub item_name: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryEntry {
    pub fn new(
        member: MemberId,
        item: ItemId,
        item_name: impl Into<String>,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            member,
            item,
            item_name: item_name.into(),
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}
