//! Reference-data snapshot cache.
//!
//! Reference data (catalog, ranks, members, inventories) is read once at
//! startup and kept fresh from the store's change feed. Consumers get an
//! immutable [`Arc<ReferenceSnapshot>`] and compute against *that* — a feed
//! update mid-computation swaps the cache's pointer but never mutates a
//! snapshot already handed out.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::error::RecvError;

use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, MemberId, RankId};
use lootledger_inventory::InventoryEntry;
use lootledger_roster::{Member, Rank};

use crate::store::{Collection, LootStore, StoreResult};

/// One consistent view of the reference collections.
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub items: HashMap<ItemId, CatalogItem>,
    pub ranks: HashMap<RankId, Rank>,
    pub members: HashMap<MemberId, Member>,
    pub inventories: Vec<InventoryEntry>,
    pub refreshed_at: DateTime<Utc>,
}

impl ReferenceSnapshot {
    pub fn item(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    /// Resolve a member's rank document; `None` for rankless members and
    /// for dangling rank references (both price as 0%).
    pub fn rank_of(&self, member: &Member) -> Option<&Rank> {
        member.rank.as_ref().and_then(|id| self.ranks.get(id))
    }

    pub fn members_sorted(&self) -> Vec<&Member> {
        let mut all: Vec<&Member> = self.members.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn items_sorted(&self) -> Vec<&CatalogItem> {
        let mut all: Vec<&CatalogItem> = self.items.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn ranks_sorted(&self) -> Vec<&Rank> {
        let mut all: Vec<&Rank> = self.ranks.values().collect();
        all.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.id.cmp(&b.id)));
        all
    }
}

/// Owns the subscription lifecycle for reference data.
///
/// `start_watching` is guarded to be idempotent: repeated login/logout
/// cycles (or double wiring) never stack duplicate feed consumers.
pub struct ReferenceCache {
    store: Arc<dyn LootStore>,
    snapshot: RwLock<Arc<ReferenceSnapshot>>,
    watching: AtomicBool,
}

impl ReferenceCache {
    /// Load all reference collections once and build the initial snapshot.
    pub async fn load(store: Arc<dyn LootStore>) -> StoreResult<Arc<Self>> {
        let snapshot = Self::build_snapshot(&*store).await?;
        Ok(Arc::new(Self {
            store,
            snapshot: RwLock::new(Arc::new(snapshot)),
            watching: AtomicBool::new(false),
        }))
    }

    async fn build_snapshot(store: &dyn LootStore) -> StoreResult<ReferenceSnapshot> {
        let items = store.list_items().await?;
        let ranks = store.list_ranks().await?;
        let members = store.list_members().await?;
        let inventories = store.list_inventory().await?;

        Ok(ReferenceSnapshot {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            ranks: ranks.into_iter().map(|r| (r.id.clone(), r)).collect(),
            members: members.into_iter().map(|m| (m.id.clone(), m)).collect(),
            inventories,
            refreshed_at: Utc::now(),
        })
    }

    /// The current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.snapshot
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Re-read everything from the store and swap the snapshot in one go.
    pub async fn refresh(&self) -> StoreResult<()> {
        let next = Arc::new(Self::build_snapshot(&*self.store).await?);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next,
            Err(mut poisoned) => **poisoned.get_mut() = next,
        }
        Ok(())
    }

    /// Start consuming the store's change feed, refreshing the snapshot on
    /// every reference-data change. Calling this again while a watcher is
    /// already running is a no-op.
    pub fn start_watching(self: &Arc<Self>) {
        if self
            .watching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("reference cache already watching; ignoring");
            return;
        }

        let cache = Arc::clone(self);
        let mut feed = self.store.watch();
        tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(event) => {
                        // Registries and admins are not reference data.
                        if matches!(event.collection, Collection::Registries | Collection::Admins)
                        {
                            continue;
                        }
                        if let Err(e) = cache.refresh().await {
                            tracing::warn!(error = %e, "reference cache refresh failed");
                        }
                    }
                    // Fell behind the feed: resynchronize with a full reload.
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "change feed lagged; resynchronizing");
                        if let Err(e) = cache.refresh().await {
                            tracing::warn!(error = %e, "reference cache refresh failed");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            cache.watching.store(false, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootledger_catalog::ItemDraft;
    use lootledger_core::Money;
    use lootledger_roster::MemberDraft;

    use crate::store::InMemoryLootStore;

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

    #[tokio::test]
    async fn load_builds_a_full_snapshot() {
        let store = Arc::new(InMemoryLootStore::new());
        store.put_item(item("AK", 15_000)).await.unwrap();
        store
            .put_member(
                Member::create(
                    MemberDraft {
                        name: "Vex".to_string(),
                        rank: None,
                        bonus_tier: false,
                        discord_id: None,
                        avatar_url: None,
                    },
                    Utc::now(),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let cache = ReferenceCache::load(store).await.unwrap();
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.members.len(), 1);
        assert!(snapshot.ranks.is_empty());
    }

    #[tokio::test]
    async fn refresh_swaps_but_never_mutates_an_issued_snapshot() {
        let store = Arc::new(InMemoryLootStore::new());
        let cache = ReferenceCache::load(store.clone()).await.unwrap();

        let before = cache.snapshot();
        store.put_item(item("AK", 15_000)).await.unwrap();
        cache.refresh().await.unwrap();

        // The old snapshot is untouched; the new one sees the item.
        assert!(before.items.is_empty());
        assert_eq!(cache.snapshot().items.len(), 1);
    }

    #[tokio::test]
    async fn start_watching_is_idempotent() {
        let store = Arc::new(InMemoryLootStore::new());
        let cache = ReferenceCache::load(store.clone()).await.unwrap();

        cache.start_watching();
        cache.start_watching();
        assert!(cache.watching.load(Ordering::SeqCst));

        // Watcher picks the change up without an explicit refresh.
        store.put_item(item("AK", 15_000)).await.unwrap();
        for _ in 0..100 {
            if !cache.snapshot().items.is_empty() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("watcher did not refresh the snapshot in time");
    }
}
