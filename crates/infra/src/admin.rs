//! Admin directory operations: catalog, ranks, roster, manual inventory
//! corrections. Every mutation is gated on the admins collection; reads are
//! open to any authenticated identity and served from the reference cache.

use std::sync::Arc;

use chrono::Utc;

use lootledger_auth::Identity;
use lootledger_catalog::{CatalogItem, ItemDraft};
use lootledger_core::{ItemId, MemberId, RankId};
use lootledger_inventory::{MemberInventoryView, member_inventory, owners_of, search_holders};
use lootledger_roster::{Member, MemberDraft, Rank, RankDraft, search_by_name};

use crate::authz::ensure_admin;
use crate::cache::ReferenceCache;
use crate::error::{AppError, AppResult};
use crate::store::{CascadeReport, LootStore};

/// How many autocomplete suggestions the member search returns.
const SEARCH_LIMIT: usize = 8;

pub struct AdminService {
    store: Arc<dyn LootStore>,
    cache: Arc<ReferenceCache>,
}

impl AdminService {
    pub fn new(store: Arc<dyn LootStore>, cache: Arc<ReferenceCache>) -> Self {
        Self { store, cache }
    }

    /// Read-your-writes for the admin screens: the store write already
    /// succeeded, so a failing refresh only leaves the cache stale until
    /// the change feed catches up.
    async fn refresh_cache(&self) {
        if let Err(e) = self.cache.refresh().await {
            tracing::warn!(error = %e, "cache refresh after admin write failed");
        }
    }

    // -- catalog ---------------------------------------------------------

    /// Create or replace a catalog item. The id derives from the display
    /// name, so re-submitting the same name edits the same document.
    pub async fn upsert_item(&self, actor: &Identity, draft: ItemDraft) -> AppResult<CatalogItem> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;

        let now = Utc::now();
        let fresh = CatalogItem::create(draft.clone(), now)?;
        let item = match self.store.get_item(&fresh.id).await? {
            Some(mut existing) => {
                existing.apply(draft, now)?;
                existing
            }
            None => fresh,
        };
        self.store.put_item(item.clone()).await?;
        self.refresh_cache().await;
        Ok(item)
    }

    pub async fn delete_item(&self, actor: &Identity, id: &ItemId) -> AppResult<()> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        self.store.delete_item(id).await?;
        self.refresh_cache().await;
        Ok(())
    }

    // -- ranks -----------------------------------------------------------

    pub async fn upsert_rank(
        &self,
        actor: &Identity,
        id: RankId,
        draft: RankDraft,
    ) -> AppResult<Rank> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        let rank = Rank::new(id, draft);
        self.store.put_rank(rank.clone()).await?;
        self.refresh_cache().await;
        Ok(rank)
    }

    pub async fn delete_rank(&self, actor: &Identity, id: &RankId) -> AppResult<()> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        self.store.delete_rank(id).await?;
        self.refresh_cache().await;
        Ok(())
    }

    // -- roster ----------------------------------------------------------

    pub async fn create_member(&self, actor: &Identity, draft: MemberDraft) -> AppResult<Member> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        let member = Member::create(draft, Utc::now())?;
        self.store.put_member(member.clone()).await?;
        self.refresh_cache().await;
        Ok(member)
    }

    pub async fn update_member(
        &self,
        actor: &Identity,
        id: &MemberId,
        draft: MemberDraft,
    ) -> AppResult<Member> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        let mut member = self
            .store
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("unknown member '{id}'")))?;
        member.apply(draft, Utc::now())?;
        self.store.put_member(member.clone()).await?;
        self.refresh_cache().await;
        Ok(member)
    }

    /// Assign (or clear, with `None`) a member's rank. Assigning a rank
    /// that does not exist yet creates it with placeholder percentages —
    /// the admin fixes the numbers on the ranks screen afterwards.
    pub async fn assign_rank(
        &self,
        actor: &Identity,
        member_id: &MemberId,
        rank: Option<RankId>,
    ) -> AppResult<Member> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;

        let mut member = self
            .store
            .get_member(member_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("unknown member '{member_id}'")))?;

        if let Some(rank_id) = &rank {
            if self.store.get_rank(rank_id).await?.is_none() {
                tracing::info!(rank = %rank_id, "creating placeholder rank on assignment");
                self.store.put_rank(Rank::default_for(rank_id.clone())).await?;
            }
        }

        member.set_rank(rank, Utc::now());
        self.store.put_member(member.clone()).await?;
        self.refresh_cache().await;
        Ok(member)
    }

    /// Delete a member and cascade to their inventory entries and
    /// registries (one store-side batch).
    pub async fn delete_member(
        &self,
        actor: &Identity,
        id: &MemberId,
    ) -> AppResult<CascadeReport> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;
        let report = self.store.delete_member_cascade(id).await?;
        tracing::info!(
            member = %id,
            inventories = report.inventories_removed,
            registries = report.registries_removed,
            "member deleted with cascade"
        );
        self.refresh_cache().await;
        Ok(report)
    }

    // -- manual inventory corrections ------------------------------------

    /// Signed manual correction on one (member, item) pair. Clamps at zero
    /// and deletes the entry when it reaches zero.
    pub async fn adjust_inventory(
        &self,
        actor: &Identity,
        member_id: &MemberId,
        item_id: &ItemId,
        delta: i64,
    ) -> AppResult<u32> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;

        if self.store.get_member(member_id).await?.is_none() {
            return Err(AppError::Validation(format!("unknown member '{member_id}'")));
        }

        // Prefer the live catalog name; fall back to the existing entry's
        // stored name so orphaned entries stay correctable.
        let item_name = match self.store.get_item(item_id).await? {
            Some(item) => item.name,
            None => {
                let entries = self.store.inventory_for_member(member_id).await?;
                match entries.into_iter().find(|e| &e.item == item_id) {
                    Some(entry) => entry.item_name,
                    None => {
                        return Err(AppError::Validation(format!(
                            "unknown item '{item_id}'"
                        )));
                    }
                }
            }
        };

        let quantity = self
            .store
            .adjust_inventory(member_id, item_id, &item_name, delta)
            .await?;
        self.refresh_cache().await;
        Ok(quantity)
    }

    // -- reads (cache-backed, open to any authenticated identity) --------

    /// A member's inventory valued against their current rank.
    pub async fn member_inventory(&self, id: &MemberId) -> AppResult<MemberInventoryView> {
        let snapshot = self.cache.snapshot();
        let member = snapshot
            .member(id)
            .ok_or_else(|| AppError::Validation(format!("unknown member '{id}'")))?;
        Ok(member_inventory(
            member,
            snapshot.rank_of(member),
            &snapshot.inventories,
            &snapshot.items,
        ))
    }

    /// Ownership index: who currently holds at least one unit of an item.
    pub async fn item_owners(&self, item: &ItemId) -> Vec<MemberId> {
        let snapshot = self.cache.snapshot();
        owners_of(item, &snapshot.inventories)
    }

    /// Autocomplete over member names (capped).
    pub async fn search_roster(&self, query: &str) -> Vec<Member> {
        let snapshot = self.cache.snapshot();
        let members = snapshot.members_sorted();
        let owned: Vec<Member> = members.into_iter().cloned().collect();
        search_by_name(&owned, query, SEARCH_LIMIT)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Inventory screen filter: members matched by name or by held item
    /// name, each returned as a valued inventory view.
    pub async fn search_inventories(&self, query: &str) -> Vec<MemberInventoryView> {
        let snapshot = self.cache.snapshot();
        let members: Vec<Member> = snapshot.members_sorted().into_iter().cloned().collect();
        search_holders(query, &members, &snapshot.inventories)
            .into_iter()
            .map(|m| {
                member_inventory(
                    m,
                    snapshot.rank_of(m),
                    &snapshot.inventories,
                    &snapshot.items,
                )
            })
            .collect()
    }
}
