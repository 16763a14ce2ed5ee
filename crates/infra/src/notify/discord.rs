use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use super::{LootNotification, Notifier, NotifierResponse, NotifyError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const EMBED_COLOR: u32 = 5_814_783;

/// Posts loot announcements to a Discord webhook as a rich embed.
pub struct DiscordWebhookNotifier {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl DiscordWebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the webhook body for a notification.
    ///
    /// Field layout mirrors what the channel's readers are used to: one
    /// field per line ("2× AK — $6750 each → $13500"), then the total.
    pub fn embed_payload(note: &LootNotification) -> JsonValue {
        let mut fields = vec![
            json!({ "name": "Member", "value": note.member_name, "inline": true }),
            json!({ "name": "Activity", "value": note.activity, "inline": true }),
            json!({ "name": "Submitted by", "value": note.author_name, "inline": true }),
        ];
        for line in &note.lines {
            fields.push(json!({
                "name": format!("{}× {}", line.quantity, line.name),
                "value": format!("${} each → ${}", line.unit_price, line.line_total),
                "inline": false,
            }));
        }
        fields.push(json!({
            "name": "Total payout",
            "value": format!("${}", note.total_value),
            "inline": true,
        }));

        json!({
            "username": "Loot registry",
            "embeds": [{
                "title": format!("📜 New loot registry — {}", note.member_name),
                "color": EMBED_COLOR,
                "fields": fields,
                "timestamp": note.timestamp.to_rfc3339(),
            }],
        })
    }
}

#[async_trait]
impl Notifier for DiscordWebhookNotifier {
    async fn notify(&self, note: &LootNotification) -> Result<NotifierResponse, NotifyError> {
        let payload = Self::embed_payload(note);
        let request = self.client.post(&self.url).json(&payload).send();

        let response = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => return Err(NotifyError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(NotifyError::Transport(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if (200..300).contains(&status) {
            Ok(NotifierResponse { status, body })
        } else {
            Err(NotifyError::Rejected { status, body })
        }
    }
}
