use std::collections::HashMap;

use serde::Serialize;

use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, MemberId, Money, Percent, RankId};
use lootledger_pricing::{PayoutInputs, effective_percent};
use lootledger_roster::{Member, Rank};

use crate::entry::InventoryEntry;

/// One valued line of a member's inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLine {
    pub item: ItemId,
    pub name: String,
    pub quantity: u32,
    pub pct_used: Percent,
    pub unit_price: Money,
    pub line_total: Money,

    /// The catalog item no longer exists; the line keeps the entry's stored
    /// name and is valued at zero.
    pub orphaned: bool,
}

/// A member's full inventory, valued against their current rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberInventoryView {
    pub member: MemberId,
    pub member_name: String,
    pub rank: Option<RankId>,
    pub lines: Vec<InventoryLine>,
    pub total_value: Money,
}

/// Value one member's inventory against a reference-data snapshot.
///
/// Entries belonging to other members are ignored, so callers can pass the
/// whole inventory collection. Pure over its inputs: no interior state, no
/// accumulation between calls — pricing the same snapshot twice yields
/// bit-identical views.
pub fn member_inventory(
    member: &Member,
    rank: Option<&Rank>,
    entries: &[InventoryEntry],
    catalog: &HashMap<ItemId, CatalogItem>,
) -> MemberInventoryView {
    let mut lines = Vec::new();
    let mut total_value = Money::ZERO;

    for entry in entries.iter().filter(|e| e.member == member.id) {
        let line = match catalog.get(&entry.item) {
            Some(item) => {
                let inputs = PayoutInputs::from(item);
                let pct_used = effective_percent(&inputs, member, rank);
                let unit_price = pct_used.of(inputs.base_value);
                InventoryLine {
                    item: entry.item.clone(),
                    name: item.name.clone(),
                    quantity: entry.quantity,
                    pct_used,
                    unit_price,
                    line_total: unit_price.times(entry.quantity),
                    orphaned: false,
                }
            }
            // Orphan tolerance: the catalog item was deleted after the loot
            // was granted. Keep the stored name, value at zero.
            None => InventoryLine {
                item: entry.item.clone(),
                name: entry.item_name.clone(),
                quantity: entry.quantity,
                pct_used: Percent::ZERO,
                unit_price: Money::ZERO,
                line_total: Money::ZERO,
                orphaned: true,
            },
        };
        total_value = total_value.saturating_add(line.line_total);
        lines.push(line);
    }

    // Stable presentation order regardless of snapshot iteration order.
    lines.sort_by(|a, b| a.item.cmp(&b.item));

    MemberInventoryView {
        member: member.id.clone(),
        member_name: member.name.clone(),
        rank: member.rank.clone(),
        lines,
        total_value,
    }
}

/// Ownership index: members currently holding at least one unit of `item`.
///
/// Recomputed from the snapshot passed in — never cached.
pub fn owners_of(item: &ItemId, entries: &[InventoryEntry]) -> Vec<MemberId> {
    let mut owners: Vec<MemberId> = entries
        .iter()
        .filter(|e| &e.item == item && e.quantity >= 1)
        .map(|e| e.member.clone())
        .collect();
    owners.sort();
    owners.dedup();
    owners
}

/// Search members by name OR by held item name (the inventory screen's
/// filter box): the union of members whose display name matches and members
/// whose inventory contains a matching item name.
pub fn search_holders<'a>(
    query: &str,
    members: &'a [Member],
    entries: &[InventoryEntry],
) -> Vec<&'a Member> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return members.iter().collect();
    }

    members
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&query)
                || entries.iter().any(|e| {
                    e.member == m.id && e.item_name.to_lowercase().contains(&query)
                })
        })
        .collect()
}
