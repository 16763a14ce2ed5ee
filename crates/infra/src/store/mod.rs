//! Persistence boundary: the document store the rest of the system talks to.
//!
//! The hosted document database is an external collaborator; this module
//! defines the typed interface the application needs from it, plus an
//! in-memory implementation used for tests/dev. Implementations must treat
//! each method as one round-trip: no cross-method transactions are assumed
//! anywhere (the accepted consequence is spelled out on
//! [`LootStore::adjust_inventory`]).

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, MemberId, RankId, RegistryId, UserId};
use lootledger_inventory::InventoryEntry;
use lootledger_registry::Registry;
use lootledger_roster::{Member, Rank};

pub use memory::InMemoryLootStore;

/// Collections managed by the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Items,
    Ranks,
    Members,
    Inventories,
    Registries,
    Admins,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Created,
    Updated,
    Deleted,
}

/// One document change, as published on the store's change feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub op: ChangeOp,
    pub doc_id: String,
    pub at: DateTime<Utc>,
}

/// Result of a member-deletion cascade.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub inventories_removed: usize,
    pub registries_removed: usize,
}

/// Processing-status update applied to a registry after the notification
/// attempt. Everything else on a registry is append-only.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryStatus {
    Processed {
        at: DateTime<Utc>,
        response: String,
    },
    Failed {
        error: String,
    },
}

/// Store operation error.
///
/// Infrastructure failures only; "document absent" is `Ok(None)` on reads,
/// not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or an internal invariant broke.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store itself refused the operation (rules, quota, permissions).
    #[error("store denied the operation: {0}")]
    Denied(String),

    /// A stored document could not be decoded into its domain type.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed access to the loot collections.
///
/// ## Semantics implementations must provide
///
/// - `put_*` is create-or-replace keyed by the document id (the admin
///   screens re-submit whole documents).
/// - [`adjust_inventory`](Self::adjust_inventory) is an **atomic signed
///   increment on one (member, item) pair**: read-modify-write of that one
///   document must be all-or-nothing against this store handle. Nothing is
///   promised across *concurrent writers* — two admins granting loot to the
///   same member at once may lose one increment. Accepted limitation.
/// - [`delete_member_cascade`](Self::delete_member_cascade) removes the
///   member and every inventory entry and registry referencing them as one
///   store-side batch, so a failure cannot strand half a cascade.
/// - [`watch`](Self::watch) returns a broadcast receiver of change events.
///   Delivery is best-effort (slow consumers may observe a lag error and
///   should resynchronize by re-reading).
#[async_trait]
pub trait LootStore: Send + Sync {
    // -- catalog ---------------------------------------------------------
    async fn list_items(&self) -> StoreResult<Vec<CatalogItem>>;
    async fn get_item(&self, id: &ItemId) -> StoreResult<Option<CatalogItem>>;
    async fn put_item(&self, item: CatalogItem) -> StoreResult<()>;
    async fn delete_item(&self, id: &ItemId) -> StoreResult<()>;

    // -- ranks -----------------------------------------------------------
    async fn list_ranks(&self) -> StoreResult<Vec<Rank>>;
    async fn get_rank(&self, id: &RankId) -> StoreResult<Option<Rank>>;
    async fn put_rank(&self, rank: Rank) -> StoreResult<()>;
    async fn delete_rank(&self, id: &RankId) -> StoreResult<()>;

    // -- members ---------------------------------------------------------
    async fn list_members(&self) -> StoreResult<Vec<Member>>;
    async fn get_member(&self, id: &MemberId) -> StoreResult<Option<Member>>;
    async fn put_member(&self, member: Member) -> StoreResult<()>;
    async fn delete_member_cascade(&self, id: &MemberId) -> StoreResult<CascadeReport>;

    // -- inventories -----------------------------------------------------
    async fn list_inventory(&self) -> StoreResult<Vec<InventoryEntry>>;
    async fn inventory_for_member(&self, member: &MemberId) -> StoreResult<Vec<InventoryEntry>>;

    /// Atomically add `delta` to the (member, item) entry, creating it when
    /// absent and deleting it when the result reaches zero (clamped — the
    /// quantity never goes negative). Returns the resulting quantity.
    async fn adjust_inventory(
        &self,
        member: &MemberId,
        item: &ItemId,
        item_name: &str,
        delta: i64,
    ) -> StoreResult<u32>;

    // -- registries ------------------------------------------------------
    async fn create_registry(&self, registry: Registry) -> StoreResult<RegistryId>;
    async fn get_registry(&self, id: &RegistryId) -> StoreResult<Option<Registry>>;
    async fn registries_for_member(&self, member: &MemberId) -> StoreResult<Vec<Registry>>;

    /// Unprocessed registries, oldest first, at most `limit`.
    async fn unprocessed_registries(&self, limit: usize) -> StoreResult<Vec<Registry>>;
    async fn update_registry_status(
        &self,
        id: &RegistryId,
        status: RegistryStatus,
    ) -> StoreResult<()>;

    // -- admins ----------------------------------------------------------
    async fn is_admin(&self, user: &UserId) -> StoreResult<bool>;
    async fn grant_admin(&self, user: UserId) -> StoreResult<()>;

    // -- change feed -----------------------------------------------------
    fn watch(&self) -> broadcast::Receiver<ChangeEvent>;
}
