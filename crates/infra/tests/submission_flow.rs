//! End-to-end submission workflow tests against the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;

use lootledger_auth::Identity;
use lootledger_catalog::{CatalogItem, ItemDraft};
use lootledger_core::{ItemId, MemberId, Money, Percent, RankId, RegistryId, UserId};
use lootledger_infra::{
    AppError, CascadeReport, ChangeEvent, InMemoryLootStore, LootStore, NotifyError,
    RecordingNotifier, RegistryStatus, StoreError, StoreResult, SubmissionService,
};
use lootledger_inventory::InventoryEntry;
use lootledger_registry::{Registry, SubmissionInput, SubmissionLine};
use lootledger_roster::{Member, MemberDraft, Rank, RankDraft};

struct Fixture {
    store: Arc<InMemoryLootStore>,
    notifier: Arc<RecordingNotifier>,
    service: SubmissionService,
    admin: Identity,
    member: Member,
}

/// Catalog item `ak` at 15_000, rank `Enforcer` 35%/45%, bonus-tier member
/// `vex` — the worked example the payout sheet is calibrated against.
async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryLootStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let admin = Identity {
        user_id: UserId::new(),
        email: "admin@guild.example".to_string(),
    };
    store.grant_admin(admin.user_id).await.unwrap();

    store
        .put_item(
            CatalogItem::create(
                ItemDraft {
                    name: "AK".to_string(),
                    base_value: Money::new(15_000),
                    payable: true,
                    pct_override: None,
                    image_url: None,
                },
                Utc::now(),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    store
        .put_rank(Rank::new(
            RankId::new("Enforcer").unwrap(),
            RankDraft {
                level: 3,
                base_pct: Percent::new(0.35).unwrap(),
                bonus_pct: Some(Percent::new(0.45).unwrap()),
                color: None,
            },
        ))
        .await
        .unwrap();

    let member = Member::create(
        MemberDraft {
            name: "Vex".to_string(),
            rank: Some(RankId::new("Enforcer").unwrap()),
            bonus_tier: true,
            discord_id: None,
            avatar_url: None,
        },
        Utc::now(),
    )
    .unwrap();
    store.put_member(member.clone()).await.unwrap();

    let service = SubmissionService::new(store.clone(), notifier.clone());

    Fixture {
        store,
        notifier,
        service,
        admin,
        member,
    }
}

fn input(f: &Fixture, item: &str, quantity: u32) -> SubmissionInput {
    SubmissionInput {
        author_id: f.admin.user_id,
        author_name: f.admin.email.clone(),
        member_id: f.member.id.clone(),
        activity: "heist".to_string(),
        lines: vec![SubmissionLine {
            item_id: ItemId::new(item).unwrap(),
            quantity,
        }],
    }
}

#[tokio::test]
async fn submission_prices_grants_and_notifies() {
    let f = fixture().await;

    let outcome = f.service.submit(input(&f, "ak", 2)).await.unwrap();
    assert!(outcome.notified);
    // round(15_000 × 0.45) = 6_750 each, ×2 = 13_500.
    assert_eq!(outcome.total_value, Money::new(13_500));

    let entries = f.store.inventory_for_member(&f.member.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 2);

    let registry = f.store.get_registry(&outcome.registry_id).await.unwrap().unwrap();
    assert!(registry.processed);
    assert_eq!(registry.lines[0].base_value, Money::new(15_000));

    let sent = f.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].member_name, "Vex");
    assert_eq!(sent[0].activity, "heist");
    assert_eq!(sent[0].author_name, "admin@guild.example");
    assert_eq!(sent[0].lines[0].unit_price, Money::new(6_750));
    assert_eq!(sent[0].total_value, Money::new(13_500));
}

#[tokio::test]
async fn repeat_submissions_increment_one_inventory_entry() {
    let f = fixture().await;

    f.service.submit(input(&f, "ak", 3)).await.unwrap();
    f.service.submit(input(&f, "ak", 2)).await.unwrap();

    let entries = f.store.inventory_for_member(&f.member.id).await.unwrap();
    assert_eq!(entries.len(), 1, "second grant must not create a sibling entry");
    assert_eq!(entries[0].quantity, 5);
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let f = fixture().await;

    let mut bad = input(&f, "ak", 2);
    bad.activity = "  ".to_string();
    assert!(matches!(
        f.service.submit(bad).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(matches!(
        f.service.submit(input(&f, "ak", 0)).await.unwrap_err(),
        AppError::Validation(_)
    ));

    // Unknown item fails during snapshot resolution, still pre-write.
    assert!(matches!(
        f.service.submit(input(&f, "ghost-gun", 1)).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(f.store.registries_for_member(&f.member.id).await.unwrap().is_empty());
    assert!(f.store.inventory_for_member(&f.member.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_admin_author_is_rejected_before_any_write() {
    let f = fixture().await;

    let mut unauthorized = input(&f, "ak", 2);
    unauthorized.author_id = UserId::new();
    assert!(matches!(
        f.service.submit(unauthorized).await.unwrap_err(),
        AppError::Authorization(_)
    ));
    assert!(f.store.registries_for_member(&f.member.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn notifier_failure_degrades_but_never_fails_the_submission() {
    let f = fixture().await;
    f.notifier
        .fail_with(NotifyError::Timeout(Duration::from_secs(10)));

    let outcome = f.service.submit(input(&f, "ak", 2)).await.unwrap();
    assert!(!outcome.notified);
    assert_eq!(outcome.total_value, Money::new(13_500));

    // Loot granted regardless.
    let entries = f.store.inventory_for_member(&f.member.id).await.unwrap();
    assert_eq!(entries[0].quantity, 2);

    // Registry kept, unprocessed, with the error detail recorded.
    let registry = f.store.get_registry(&outcome.registry_id).await.unwrap().unwrap();
    assert!(!registry.processed);
    assert!(registry.error.as_deref().unwrap().contains("timed out"));
}

#[tokio::test]
async fn registry_survives_an_inventory_write_failure() {
    let f = fixture().await;
    let flaky = Arc::new(FlakyStore::new(f.store.clone()));
    let service = SubmissionService::new(flaky.clone(), f.notifier.clone());

    flaky.fail_inventory_writes(true);
    let err = service.submit(input(&f, "ak", 2)).await.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    // Registry-first ordering: the audit record exists, unprocessed, and
    // was never rolled back; no notification went out.
    let registries = f.store.registries_for_member(&f.member.id).await.unwrap();
    assert_eq!(registries.len(), 1);
    assert!(!registries[0].processed);
    assert!(f.notifier.sent().is_empty());
}

#[tokio::test]
async fn pending_sweep_redelivers_and_marks_processed() {
    let f = fixture().await;

    // First attempt fails; the registry stays pending.
    f.notifier
        .fail_with(NotifyError::Rejected {
            status: 429,
            body: "rate limited".to_string(),
        });
    let outcome = f.service.submit(input(&f, "ak", 2)).await.unwrap();
    assert!(!outcome.notified);

    // Webhook recovers; an admin sweeps.
    f.notifier.clear_failure();
    let report = f.service.process_pending(&f.admin, 20).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    let registry = f.store.get_registry(&outcome.registry_id).await.unwrap().unwrap();
    assert!(registry.processed);
    assert!(registry.error.is_none());

    // The sweep priced from the frozen snapshots.
    let sent = f.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].total_value, Money::new(13_500));

    // Nothing left to sweep.
    let report = f.service.process_pending(&f.admin, 20).await.unwrap();
    assert_eq!(report.processed + report.failed, 0);
}

/// Store wrapper that can be told to fail inventory writes, for exercising
/// the registry-first ordering guarantee.
struct FlakyStore {
    inner: Arc<InMemoryLootStore>,
    fail_inventory: AtomicBool,
}

impl FlakyStore {
    fn new(inner: Arc<InMemoryLootStore>) -> Self {
        Self {
            inner,
            fail_inventory: AtomicBool::new(false),
        }
    }

    fn fail_inventory_writes(&self, fail: bool) {
        self.fail_inventory.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LootStore for FlakyStore {
    async fn list_items(&self) -> StoreResult<Vec<CatalogItem>> {
        self.inner.list_items().await
    }
    async fn get_item(&self, id: &ItemId) -> StoreResult<Option<CatalogItem>> {
        self.inner.get_item(id).await
    }
    async fn put_item(&self, item: CatalogItem) -> StoreResult<()> {
        self.inner.put_item(item).await
    }
    async fn delete_item(&self, id: &ItemId) -> StoreResult<()> {
        self.inner.delete_item(id).await
    }
    async fn list_ranks(&self) -> StoreResult<Vec<Rank>> {
        self.inner.list_ranks().await
    }
    async fn get_rank(&self, id: &RankId) -> StoreResult<Option<Rank>> {
        self.inner.get_rank(id).await
    }
    async fn put_rank(&self, rank: Rank) -> StoreResult<()> {
        self.inner.put_rank(rank).await
    }
    async fn delete_rank(&self, id: &RankId) -> StoreResult<()> {
        self.inner.delete_rank(id).await
    }
    async fn list_members(&self) -> StoreResult<Vec<Member>> {
        self.inner.list_members().await
    }
    async fn get_member(&self, id: &MemberId) -> StoreResult<Option<Member>> {
        self.inner.get_member(id).await
    }
    async fn put_member(&self, member: Member) -> StoreResult<()> {
        self.inner.put_member(member).await
    }
    async fn delete_member_cascade(&self, id: &MemberId) -> StoreResult<CascadeReport> {
        self.inner.delete_member_cascade(id).await
    }
    async fn list_inventory(&self) -> StoreResult<Vec<InventoryEntry>> {
        self.inner.list_inventory().await
    }
    async fn inventory_for_member(&self, member: &MemberId) -> StoreResult<Vec<InventoryEntry>> {
        self.inner.inventory_for_member(member).await
    }
    async fn adjust_inventory(
        &self,
        member: &MemberId,
        item: &ItemId,
        item_name: &str,
        delta: i64,
    ) -> StoreResult<u32> {
        if self.fail_inventory.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected fault".to_string()));
        }
        self.inner.adjust_inventory(member, item, item_name, delta).await
    }
    async fn create_registry(&self, registry: Registry) -> StoreResult<RegistryId> {
        self.inner.create_registry(registry).await
    }
    async fn get_registry(&self, id: &RegistryId) -> StoreResult<Option<Registry>> {
        self.inner.get_registry(id).await
    }
    async fn registries_for_member(&self, member: &MemberId) -> StoreResult<Vec<Registry>> {
        self.inner.registries_for_member(member).await
    }
    async fn unprocessed_registries(&self, limit: usize) -> StoreResult<Vec<Registry>> {
        self.inner.unprocessed_registries(limit).await
    }
    async fn update_registry_status(
        &self,
        id: &RegistryId,
        status: RegistryStatus,
    ) -> StoreResult<()> {
        self.inner.update_registry_status(id, status).await
    }
    async fn is_admin(&self, user: &UserId) -> StoreResult<bool> {
        self.inner.is_admin(user).await
    }
    async fn grant_admin(&self, user: UserId) -> StoreResult<()> {
        self.inner.grant_admin(user).await
    }
    fn watch(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.watch()
    }
}
