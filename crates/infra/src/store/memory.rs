use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;

use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, MemberId, RankId, RegistryId, UserId};
use lootledger_inventory::InventoryEntry;
use lootledger_registry::Registry;
use lootledger_roster::{Member, Rank};

use super::{
    CascadeReport, ChangeEvent, ChangeOp, Collection, LootStore, RegistryStatus, StoreError,
    StoreResult,
};

const CHANGE_FEED_CAPACITY: usize = 256;

/// In-memory document store.
///
/// Intended for tests/dev; the production deployment would put the hosted
/// document database behind the same trait. Each method takes at most one
/// lock, so every call is atomic with respect to this store handle.
pub struct InMemoryLootStore {
    items: RwLock<HashMap<ItemId, CatalogItem>>,
    ranks: RwLock<HashMap<RankId, Rank>>,
    members: RwLock<HashMap<MemberId, Member>>,
    inventories: RwLock<HashMap<(MemberId, ItemId), InventoryEntry>>,
    registries: RwLock<HashMap<RegistryId, Registry>>,
    admins: RwLock<HashSet<UserId>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for InMemoryLootStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            items: RwLock::new(HashMap::new()),
            ranks: RwLock::new(HashMap::new()),
            members: RwLock::new(HashMap::new()),
            inventories: RwLock::new(HashMap::new()),
            registries: RwLock::new(HashMap::new()),
            admins: RwLock::new(HashSet::new()),
            changes,
        }
    }
}

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl InMemoryLootStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, collection: Collection, op: ChangeOp, doc_id: impl Into<String>) {
        // No receivers is fine; the feed is best-effort.
        let _ = self.changes.send(ChangeEvent {
            collection,
            op,
            doc_id: doc_id.into(),
            at: Utc::now(),
        });
    }
}

#[async_trait]
impl LootStore for InMemoryLootStore {
    async fn list_items(&self) -> StoreResult<Vec<CatalogItem>> {
        let items = self.items.read().map_err(poisoned)?;
        let mut all: Vec<CatalogItem> = items.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn get_item(&self, id: &ItemId) -> StoreResult<Option<CatalogItem>> {
        Ok(self.items.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn put_item(&self, item: CatalogItem) -> StoreResult<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        let op = if items.contains_key(&item.id) {
            ChangeOp::Updated
        } else {
            ChangeOp::Created
        };
        let id = item.id.clone();
        items.insert(id.clone(), item);
        drop(items);
        self.publish(Collection::Items, op, id.to_string());
        Ok(())
    }

    async fn delete_item(&self, id: &ItemId) -> StoreResult<()> {
        let removed = self.items.write().map_err(poisoned)?.remove(id).is_some();
        if removed {
            self.publish(Collection::Items, ChangeOp::Deleted, id.to_string());
        }
        Ok(())
    }

    async fn list_ranks(&self) -> StoreResult<Vec<Rank>> {
        let ranks = self.ranks.read().map_err(poisoned)?;
        let mut all: Vec<Rank> = ranks.values().cloned().collect();
        // Seniority first, then name for a stable tie-break.
        all.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_rank(&self, id: &RankId) -> StoreResult<Option<Rank>> {
        Ok(self.ranks.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn put_rank(&self, rank: Rank) -> StoreResult<()> {
        let mut ranks = self.ranks.write().map_err(poisoned)?;
        let op = if ranks.contains_key(&rank.id) {
            ChangeOp::Updated
        } else {
            ChangeOp::Created
        };
        let id = rank.id.clone();
        ranks.insert(id.clone(), rank);
        drop(ranks);
        self.publish(Collection::Ranks, op, id.to_string());
        Ok(())
    }

    async fn delete_rank(&self, id: &RankId) -> StoreResult<()> {
        let removed = self.ranks.write().map_err(poisoned)?.remove(id).is_some();
        if removed {
            self.publish(Collection::Ranks, ChangeOp::Deleted, id.to_string());
        }
        Ok(())
    }

    async fn list_members(&self) -> StoreResult<Vec<Member>> {
        let members = self.members.read().map_err(poisoned)?;
        let mut all: Vec<Member> = members.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn get_member(&self, id: &MemberId) -> StoreResult<Option<Member>> {
        Ok(self.members.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn put_member(&self, member: Member) -> StoreResult<()> {
        let mut members = self.members.write().map_err(poisoned)?;
        let op = if members.contains_key(&member.id) {
            ChangeOp::Updated
        } else {
            ChangeOp::Created
        };
        let id = member.id.clone();
        members.insert(id.clone(), member);
        drop(members);
        self.publish(Collection::Members, op, id.to_string());
        Ok(())
    }

    async fn delete_member_cascade(&self, id: &MemberId) -> StoreResult<CascadeReport> {
        // One batch: the member plus everything referencing them. Locks are
        // taken together so no reader observes a half-removed cascade
        // through this handle.
        let mut members = self.members.write().map_err(poisoned)?;
        let mut inventories = self.inventories.write().map_err(poisoned)?;
        let mut registries = self.registries.write().map_err(poisoned)?;

        let existed = members.remove(id).is_some();

        let inventory_keys: Vec<(MemberId, ItemId)> = inventories
            .keys()
            .filter(|(member, _)| member == id)
            .cloned()
            .collect();
        for key in &inventory_keys {
            inventories.remove(key);
        }

        let registry_keys: Vec<RegistryId> = registries
            .values()
            .filter(|r| &r.member_id == id)
            .map(|r| r.id)
            .collect();
        for key in &registry_keys {
            registries.remove(key);
        }

        drop(registries);
        drop(inventories);
        drop(members);

        if existed {
            self.publish(Collection::Members, ChangeOp::Deleted, id.to_string());
        }
        if !inventory_keys.is_empty() {
            self.publish(Collection::Inventories, ChangeOp::Deleted, id.to_string());
        }
        if !registry_keys.is_empty() {
            self.publish(Collection::Registries, ChangeOp::Deleted, id.to_string());
        }

        Ok(CascadeReport {
            inventories_removed: inventory_keys.len(),
            registries_removed: registry_keys.len(),
        })
    }

    async fn list_inventory(&self) -> StoreResult<Vec<InventoryEntry>> {
        let inventories = self.inventories.read().map_err(poisoned)?;
        let mut all: Vec<InventoryEntry> = inventories.values().cloned().collect();
        all.sort_by(|a, b| (&a.member, &a.item).cmp(&(&b.member, &b.item)));
        Ok(all)
    }

    async fn inventory_for_member(&self, member: &MemberId) -> StoreResult<Vec<InventoryEntry>> {
        let inventories = self.inventories.read().map_err(poisoned)?;
        let mut entries: Vec<InventoryEntry> = inventories
            .values()
            .filter(|e| &e.member == member)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.item.cmp(&b.item));
        Ok(entries)
    }

    async fn adjust_inventory(
        &self,
        member: &MemberId,
        item: &ItemId,
        item_name: &str,
        delta: i64,
    ) -> StoreResult<u32> {
        let now = Utc::now();
        let key = (member.clone(), item.clone());
        let doc_id = format!("{member}:{item}");

        let mut inventories = self.inventories.write().map_err(poisoned)?;
        let (quantity, op) = match inventories.get_mut(&key) {
            Some(entry) => {
                let next = i64::from(entry.quantity)
                    .saturating_add(delta)
                    .clamp(0, i64::from(u32::MAX)) as u32;
                if next == 0 {
                    inventories.remove(&key);
                    (0, Some(ChangeOp::Deleted))
                } else {
                    entry.quantity = next;
                    entry.updated_at = now;
                    (next, Some(ChangeOp::Updated))
                }
            }
            None => {
                let next = delta.clamp(0, i64::from(u32::MAX)) as u32;
                if next == 0 {
                    // Decrementing a missing entry is a no-op, not an error.
                    (0, None)
                } else {
                    inventories.insert(
                        key,
                        InventoryEntry::new(
                            member.clone(),
                            item.clone(),
                            item_name,
                            next,
                            now,
                        ),
                    );
                    (next, Some(ChangeOp::Created))
                }
            }
        };
        drop(inventories);

        if let Some(op) = op {
            self.publish(Collection::Inventories, op, doc_id);
        }
        Ok(quantity)
    }

    async fn create_registry(&self, registry: Registry) -> StoreResult<RegistryId> {
        let id = registry.id;
        self.registries
            .write()
            .map_err(poisoned)?
            .insert(id, registry);
        self.publish(Collection::Registries, ChangeOp::Created, id.to_string());
        Ok(id)
    }

    async fn get_registry(&self, id: &RegistryId) -> StoreResult<Option<Registry>> {
        Ok(self.registries.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn registries_for_member(&self, member: &MemberId) -> StoreResult<Vec<Registry>> {
        let registries = self.registries.read().map_err(poisoned)?;
        let mut all: Vec<Registry> = registries
            .values()
            .filter(|r| &r.member_id == member)
            .cloned()
            .collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(all)
    }

    async fn unprocessed_registries(&self, limit: usize) -> StoreResult<Vec<Registry>> {
        let registries = self.registries.read().map_err(poisoned)?;
        let mut pending: Vec<Registry> = registries
            .values()
            .filter(|r| !r.processed)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        pending.truncate(limit);
        Ok(pending)
    }

    async fn update_registry_status(
        &self,
        id: &RegistryId,
        status: RegistryStatus,
    ) -> StoreResult<()> {
        let mut registries = self.registries.write().map_err(poisoned)?;
        let registry = registries
            .get_mut(id)
            .ok_or_else(|| StoreError::Corrupt(format!("registry {id} vanished")))?;
        match status {
            RegistryStatus::Processed { at, response } => registry.mark_processed(at, response),
            RegistryStatus::Failed { error } => registry.record_error(error),
        }
        drop(registries);
        self.publish(Collection::Registries, ChangeOp::Updated, id.to_string());
        Ok(())
    }

    async fn is_admin(&self, user: &UserId) -> StoreResult<bool> {
        Ok(self.admins.read().map_err(poisoned)?.contains(user))
    }

    async fn grant_admin(&self, user: UserId) -> StoreResult<()> {
        self.admins.write().map_err(poisoned)?.insert(user);
        self.publish(Collection::Admins, ChangeOp::Created, user.to_string());
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lootledger_catalog::ItemDraft;
    use lootledger_core::Money;
    use lootledger_roster::MemberDraft;

    fn item(name: &str, base_value: u64) -> CatalogItem {
        CatalogItem::create(
            ItemDraft {
                name: name.to_string(),
                base_value: Money::new(base_value),
                payable: true,
                pct_override: None,
                image_url: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn member(name: &str) -> Member {
        Member::create(
            MemberDraft {
                name: name.to_string(),
                rank: None,
                bonus_tier: false,
                discord_id: None,
                avatar_url: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn registry_for(member: &Member) -> Registry {
        Registry::new(
            UserId::new(),
            "admin@guild.example",
            member,
            "heist",
            vec![],
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn adjust_creates_then_increments_one_entry() {
        let store = InMemoryLootStore::new();
        let vex = member("Vex");
        let ak = ItemId::new("ak").unwrap();

        assert_eq!(store.adjust_inventory(&vex.id, &ak, "AK", 3).await.unwrap(), 3);
        assert_eq!(store.adjust_inventory(&vex.id, &ak, "AK", 2).await.unwrap(), 5);

        let entries = store.inventory_for_member(&vex.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 5);
    }

    #[tokio::test]
    async fn adjust_to_zero_deletes_the_entry_and_clamps() {
        let store = InMemoryLootStore::new();
        let vex = member("Vex");
        let ak = ItemId::new("ak").unwrap();

        store.adjust_inventory(&vex.id, &ak, "AK", 2).await.unwrap();
        assert_eq!(store.adjust_inventory(&vex.id, &ak, "AK", -5).await.unwrap(), 0);
        assert!(store.inventory_for_member(&vex.id).await.unwrap().is_empty());

        // Decrementing an absent entry stays a no-op.
        assert_eq!(store.adjust_inventory(&vex.id, &ak, "AK", -1).await.unwrap(), 0);
        assert!(store.list_inventory().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cascade_removes_member_inventories_and_registries() {
        let store = InMemoryLootStore::new();
        let vex = member("Vex");
        let mara = member("Mara");
        store.put_member(vex.clone()).await.unwrap();
        store.put_member(mara.clone()).await.unwrap();

        let ak = ItemId::new("ak").unwrap();
        store.adjust_inventory(&vex.id, &ak, "AK", 2).await.unwrap();
        store.adjust_inventory(&mara.id, &ak, "AK", 1).await.unwrap();
        store.create_registry(registry_for(&vex)).await.unwrap();
        store.create_registry(registry_for(&vex)).await.unwrap();
        store.create_registry(registry_for(&mara)).await.unwrap();

        let report = store.delete_member_cascade(&vex.id).await.unwrap();
        assert_eq!(report.inventories_removed, 1);
        assert_eq!(report.registries_removed, 2);

        assert!(store.get_member(&vex.id).await.unwrap().is_none());
        assert!(store.inventory_for_member(&vex.id).await.unwrap().is_empty());
        assert!(store.registries_for_member(&vex.id).await.unwrap().is_empty());

        // Unrelated member untouched.
        assert_eq!(store.inventory_for_member(&mara.id).await.unwrap().len(), 1);
        assert_eq!(store.registries_for_member(&mara.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unprocessed_registries_come_back_oldest_first_and_bounded() {
        let store = InMemoryLootStore::new();
        let vex = member("Vex");
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(store.create_registry(registry_for(&vex)).await.unwrap());
        }

        store
            .update_registry_status(
                &ids[0],
                RegistryStatus::Processed {
                    at: Utc::now(),
                    response: "ok".to_string(),
                },
            )
            .await
            .unwrap();

        let pending = store.unprocessed_registries(10).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, ids[1]);
        assert_eq!(pending[1].id, ids[2]);

        assert_eq!(store.unprocessed_registries(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mutations_publish_change_events() {
        let store = InMemoryLootStore::new();
        let mut feed = store.watch();

        store.put_item(item("AK", 15_000)).await.unwrap();
        let event = feed.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Items);
        assert_eq!(event.op, ChangeOp::Created);
        assert_eq!(event.doc_id, "ak");

        store.put_item(item("AK", 16_000)).await.unwrap();
        let event = feed.recv().await.unwrap();
        assert_eq!(event.op, ChangeOp::Updated);
    }
}
