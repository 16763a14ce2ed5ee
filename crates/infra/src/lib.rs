//! `lootledger-infra` — storage, notification, and application services.
//!
//! This crate owns the trait seams to the external collaborators (the
//! document store and the chat notifier) plus the orchestration built on
//! top of them: the registry submission workflow, the admin directory
//! operations, and the reference-data snapshot cache.

pub mod admin;
pub mod authz;
pub mod cache;
pub mod error;
pub mod notify;
pub mod store;
pub mod submission;

pub use admin::AdminService;
pub use authz::ensure_admin;
pub use cache::{ReferenceCache, ReferenceSnapshot};
pub use error::{AppError, AppResult};
pub use notify::{
    DisabledNotifier, DiscordWebhookNotifier, LootNotification, NotificationLine, Notifier,
    NotifierResponse, NotifyError, RecordingNotifier,
};
pub use store::{
    CascadeReport, ChangeEvent, ChangeOp, Collection, InMemoryLootStore, LootStore,
    RegistryStatus, StoreError, StoreResult,
};
pub use submission::{SubmissionOutcome, SubmissionService, SweepReport};
