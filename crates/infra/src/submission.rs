//! The registry submission workflow.
//!
//! Ordering inside one submission is an invariant, not an implementation
//! detail: the registry is persisted before any inventory changes, and
//! inventory changes land before the notification attempt. Whatever fails
//! later, the registry already exists as the audit trail.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use lootledger_auth::Identity;
use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, Money, RegistryId};
use lootledger_registry::{LineSnapshot, Registry, SubmissionInput};

use crate::authz::ensure_admin;
use crate::error::{AppError, AppResult};
use crate::notify::{LootNotification, Notifier};
use crate::store::{LootStore, RegistryStatus};

/// What a submission call hands back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub registry_id: RegistryId,
    /// Whether the channel announcement went out. `false` is a warning for
    /// the caller to surface, never a failure — the loot is granted either
    /// way.
    pub notified: bool,
    pub total_value: Money,
}

/// Outcome of one pending-registry sweep.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub processed: usize,
    pub failed: usize,
}

pub struct SubmissionService {
    store: Arc<dyn LootStore>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn LootStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Submit a loot registry.
    ///
    /// 1. validate the input (pure; nothing is written for invalid input);
    /// 2. gate on the admins directory;
    /// 3. resolve the member and freeze line snapshots from the catalog;
    /// 4. persist the registry (`processed = false`);
    /// 5. upsert inventory per line — each line is its own atomic
    ///    increment, and a failure part-way leaves earlier lines applied;
    /// 6. price the summary and make exactly one notification attempt,
    ///    best-effort: its outcome only moves the registry's processing
    ///    status and the returned `notified` flag.
    pub async fn submit(&self, input: SubmissionInput) -> AppResult<SubmissionOutcome> {
        input.validate()?;
        ensure_admin(&*self.store, &input.author_id, &input.author_name).await?;

        // Read-only and unrelated: fetch concurrently.
        let (member, items) = tokio::join!(
            self.store.get_member(&input.member_id),
            self.store.list_items()
        );
        let member = member?.ok_or_else(|| {
            AppError::Validation(format!("unknown member '{}'", input.member_id))
        })?;
        let catalog: HashMap<ItemId, CatalogItem> =
            items?.into_iter().map(|i| (i.id.clone(), i)).collect();

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let item = catalog.get(&line.item_id).ok_or_else(|| {
                AppError::Validation(format!("unknown item '{}'", line.item_id))
            })?;
            lines.push(LineSnapshot::capture(item, line.quantity));
        }

        let rank = match &member.rank {
            Some(id) => self.store.get_rank(id).await?,
            None => None,
        };

        // Registry first. If this write fails nothing else happens; if a
        // later step fails the record stays behind with processed = false.
        let registry = Registry::new(
            input.author_id,
            input.author_name.clone(),
            &member,
            input.activity.trim(),
            lines,
            Utc::now(),
        );
        let registry_id = self.store.create_registry(registry.clone()).await?;
        tracing::info!(registry = %registry_id, member = %member.id, activity = %registry.activity, "registry persisted");

        for line in &registry.lines {
            self.store
                .adjust_inventory(&member.id, &line.item_id, &line.name, i64::from(line.quantity))
                .await?;
        }

        let summary = registry.summarize(&member, rank.as_ref());
        let note = LootNotification::from_summary(
            &registry.member_name,
            &registry.activity,
            &summary,
            &registry.author_name,
            registry.created_at,
        );
        let notified = self.announce(&registry_id, &note).await;

        Ok(SubmissionOutcome {
            registry_id,
            notified,
            total_value: summary.total,
        })
    }

    /// One notification attempt; records the outcome on the registry.
    ///
    /// Status bookkeeping is itself best-effort: by this point the loot is
    /// granted, so a failing status write is logged, not surfaced.
    async fn announce(&self, registry_id: &RegistryId, note: &LootNotification) -> bool {
        match self.notifier.notify(note).await {
            Ok(response) => {
                let status = RegistryStatus::Processed {
                    at: Utc::now(),
                    response: response.body,
                };
                if let Err(e) = self.store.update_registry_status(registry_id, status).await {
                    tracing::warn!(registry = %registry_id, error = %e, "failed to mark registry processed");
                }
                true
            }
            Err(error) => {
                tracing::warn!(registry = %registry_id, error = %error, "notification failed; loot already granted");
                let status = RegistryStatus::Failed {
                    error: error.to_string(),
                };
                if let Err(e) = self.store.update_registry_status(registry_id, status).await {
                    tracing::warn!(registry = %registry_id, error = %e, "failed to record notification error");
                }
                false
            }
        }
    }

    /// Re-drive announcements for registries that never got one.
    ///
    /// This is the manual sweep an admin triggers after webhook trouble; it
    /// is never scheduled, so the submission path itself still makes at
    /// most one attempt. Summaries are recomputed from each registry's own
    /// frozen snapshots against the member's *current* rank.
    pub async fn process_pending(&self, actor: &Identity, limit: usize) -> AppResult<SweepReport> {
        ensure_admin(&*self.store, &actor.user_id, &actor.email).await?;

        let pending = self.store.unprocessed_registries(limit).await?;
        let mut report = SweepReport::default();

        for registry in pending {
            let member = match self.store.get_member(&registry.member_id).await? {
                Some(member) => member,
                None => {
                    // Cascades delete a member's registries, so this only
                    // happens on data imported from elsewhere. Record and
                    // move on.
                    let status = RegistryStatus::Failed {
                        error: format!("member '{}' no longer exists", registry.member_id),
                    };
                    self.store.update_registry_status(&registry.id, status).await?;
                    report.failed += 1;
                    continue;
                }
            };
            let rank = match &member.rank {
                Some(id) => self.store.get_rank(id).await?,
                None => None,
            };

            let summary = registry.summarize(&member, rank.as_ref());
            let note = LootNotification::from_summary(
                &registry.member_name,
                &registry.activity,
                &summary,
                &registry.author_name,
                registry.created_at,
            );
            if self.announce(&registry.id, &note).await {
                report.processed += 1;
            } else {
                report.failed += 1;
            }
        }

        Ok(report)
    }
}
