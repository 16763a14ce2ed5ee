use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lootledger_catalog::CatalogItem;
use lootledger_core::{ItemId, MemberId, Money, Percent, RegistryId, UserId};
use lootledger_pricing::{PayoutInputs, PricedLines, PricingLine, price_lines};
use lootledger_roster::{Member, Rank};

/// One line of a registry: a frozen snapshot of the catalog item's pricing
/// fields at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub base_value: Money,
    pub payable: bool,
    pub pct_override: Option<Percent>,
}

impl LineSnapshot {
    /// Freeze a catalog item at submission time.
    pub fn capture(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            base_value: item.base_value,
            payable: item.payable,
            pct_override: item.pct_override,
        }
    }

    pub fn payout_inputs(&self) -> PayoutInputs {
        PayoutInputs {
            base_value: self.base_value,
            payable: self.payable,
            pct_override: self.pct_override,
        }
    }
}

/// One loot-grant audit record.
///
/// Line snapshots are append-only: nothing mutates them after creation.
/// The processing fields track the (single) notification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub id: RegistryId,
    pub author_id: UserId,
    pub author_name: String,
    pub member_id: MemberId,
    pub member_name: String,
    pub activity: String,
    pub lines: Vec<LineSnapshot>,
    pub created_at: DateTime<Utc>,

    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub notifier_response: Option<String>,
    pub error: Option<String>,
}

impl Registry {
    pub fn new(
        author_id: UserId,
        author_name: impl Into<String>,
        member: &Member,
        activity: impl Into<String>,
        lines: Vec<LineSnapshot>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RegistryId::new(),
            author_id,
            author_name: author_name.into(),
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            activity: activity.into(),
            lines,
            created_at,
            processed: false,
            processed_at: None,
            notifier_response: None,
            error: None,
        }
    }

    /// Price this registry's snapshots against the member's current rank.
    pub fn summarize(&self, member: &Member, rank: Option<&Rank>) -> PricedLines {
        let lines: Vec<PricingLine> = self
            .lines
            .iter()
            .map(|l| PricingLine {
                name: l.name.clone(),
                quantity: l.quantity,
                inputs: l.payout_inputs(),
            })
            .collect();
        price_lines(&lines, member, rank)
    }

    /// The notification went out; record the notifier's response.
    pub fn mark_processed(&mut self, at: DateTime<Utc>, response: impl Into<String>) {
        self.processed = true;
        self.processed_at = Some(at);
        self.notifier_response = Some(response.into());
        self.error = None;
    }

    /// The notification attempt failed; the registry stays unprocessed and
    /// keeps the error detail for later sweeps.
    pub fn record_error(&mut self, error: impl Into<String>) {
        self.processed = false;
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootledger_catalog::ItemDraft;
    use lootledger_core::RankId;
    use lootledger_roster::{MemberDraft, RankDraft};

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

    fn member_with_rank() -> (Member, Rank) {
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
        let rank = Rank::new(
            RankId::new("Enforcer").unwrap(),
            RankDraft {
                level: 3,
                base_pct: Percent::new(0.35).unwrap(),
                bonus_pct: Some(Percent::new(0.45).unwrap()),
                color: None,
            },
        );
        (member, rank)
    }

    #[test]
    fn snapshots_freeze_pricing_against_later_catalog_edits() {
        let (member, rank) = member_with_rank();
        let mut ak = item("AK", 15_000);
        let snapshot = LineSnapshot::capture(&ak, 2);
        let registry = Registry::new(
            UserId::new(),
            "admin@guild.example",
            &member,
            "heist",
            vec![snapshot],
            Utc::now(),
        );

        // Catalog item changes after submission...
        ak.apply(
            ItemDraft {
                name: "AK".to_string(),
                base_value: Money::new(1),
                payable: true,
                pct_override: None,
                image_url: None,
            },
            Utc::now(),
        )
        .unwrap();

        // ...the registry still prices from its own snapshot.
        let summary = registry.summarize(&member, Some(&rank));
        assert_eq!(summary.lines[0].unit_price, Money::new(6_750));
        assert_eq!(summary.total, Money::new(13_500));
    }

    #[test]
    fn new_registries_start_unprocessed() {
        let (member, _) = member_with_rank();
        let registry = Registry::new(
            UserId::new(),
            "admin@guild.example",
            &member,
            "heist",
            vec![],
            Utc::now(),
        );
        assert!(!registry.processed);
        assert!(registry.error.is_none());
        assert!(registry.notifier_response.is_none());
    }

    #[test]
    fn processing_status_transitions() {
        let (member, _) = member_with_rank();
        let mut registry = Registry::new(
            UserId::new(),
            "admin@guild.example",
            &member,
            "heist",
            vec![],
            Utc::now(),
        );

        registry.record_error("HTTP 429: rate limited");
        assert!(!registry.processed);
        assert_eq!(registry.error.as_deref(), Some("HTTP 429: rate limited"));

        registry.mark_processed(Utc::now(), "ok");
        assert!(registry.processed);
        assert!(registry.processed_at.is_some());
        assert_eq!(registry.notifier_response.as_deref(), Some("ok"));
        assert!(registry.error.is_none());
    }
}
