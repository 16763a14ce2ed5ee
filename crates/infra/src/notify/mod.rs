//! Outbound notification boundary (the Discord webhook).
//!
//! The notifier is strictly best-effort from the caller's point of view:
//! loot is granted whether or not the announcement goes out, and nothing in
//! this module is ever allowed to fail a submission.

pub mod discord;
pub mod recording;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use lootledger_core::Money;
use lootledger_pricing::PricedLines;

pub use discord::DiscordWebhookNotifier;
pub use recording::RecordingNotifier;

/// One priced line of a notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything a channel announcement needs to carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LootNotification {
    pub member_name: String,
    pub activity: String,
    pub lines: Vec<NotificationLine>,
    pub total_value: Money,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
}

impl LootNotification {
    pub fn from_summary(
        member_name: impl Into<String>,
        activity: impl Into<String>,
        summary: &PricedLines,
        author_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            member_name: member_name.into(),
            activity: activity.into(),
            lines: summary
                .lines
                .iter()
                .map(|l| NotificationLine {
                    name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    line_total: l.line_total,
                })
                .collect(),
            total_value: summary.total,
            author_name: author_name.into(),
            timestamp,
        }
    }
}

/// What the external channel answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error, Clone)]
pub enum NotifyError {
    #[error("notifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("notifier rejected the payload: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("notifier transport failure: {0}")]
    Transport(String),

    #[error("no notifier configured")]
    Disabled,
}

/// Outbound announcement channel.
///
/// Implementations must bound their own latency (the webhook implementation
/// wraps the call in a timeout); callers make exactly one attempt per
/// submission and record the outcome on the registry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, note: &LootNotification) -> Result<NotifierResponse, NotifyError>;
}

/// Notifier used when no webhook is configured: always reports
/// [`NotifyError::Disabled`], so registries are recorded but never announced.
#[derive(Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, note: &LootNotification) -> Result<NotifierResponse, NotifyError> {
        tracing::debug!(member = %note.member_name, "notifier disabled; skipping announcement");
        Err(NotifyError::Disabled)
    }
}
