use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use lootledger_catalog::CatalogItem;
use lootledger_infra::{CascadeReport, SubmissionOutcome, SweepReport};
use lootledger_inventory::MemberInventoryView;
use lootledger_registry::Registry;
use lootledger_roster::{Member, Rank, RankDraft};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertRankRequest {
    pub id: String,
    #[serde(flatten)]
    pub draft: RankDraft,
}

#[derive(Debug, Deserialize)]
pub struct AssignRankRequest {
    /// `null` clears the member's rank.
    pub rank_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustInventoryRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitLineRequest {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRegistryRequest {
    pub member_id: String,
    pub activity: String,
    pub lines: Vec<SubmitLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SweepRequest {
    #[serde(default = "default_sweep_limit")]
    pub limit: usize,
}

fn default_sweep_limit() -> usize {
    20
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: &CatalogItem) -> JsonValue {
    json!({
        "id": item.id.to_string(),
        "name": item.name,
        "base_value": item.base_value.amount(),
        "payable": item.payable,
        "pct_override": item.pct_override.map(|p| p.fraction()),
        "image_url": item.image_url,
    })
}

pub fn rank_to_json(rank: &Rank) -> JsonValue {
    json!({
        "id": rank.id.to_string(),
        "level": rank.level,
        "base_pct": rank.base_pct.fraction(),
        "bonus_pct": rank.bonus_pct.map(|p| p.fraction()),
        "color": rank.color,
    })
}

pub fn member_to_json(member: &Member) -> JsonValue {
    json!({
        "id": member.id.to_string(),
        "name": member.name,
        "rank": member.rank.as_ref().map(|r| r.to_string()),
        "bonus_tier": member.bonus_tier,
        "discord_id": member.discord_id,
        "avatar_url": member.avatar_url,
    })
}

pub fn inventory_view_to_json(view: &MemberInventoryView) -> JsonValue {
    json!({
        "member": view.member.to_string(),
        "member_name": view.member_name,
        "rank": view.rank.as_ref().map(|r| r.to_string()),
        "total_value": view.total_value.amount(),
        "lines": view.lines.iter().map(|l| json!({
            "item": l.item.to_string(),
            "name": l.name,
            "quantity": l.quantity,
            "pct_used": l.pct_used.fraction(),
            "unit_price": l.unit_price.amount(),
            "line_total": l.line_total.amount(),
            "orphaned": l.orphaned,
        })).collect::<Vec<_>>(),
    })
}

pub fn registry_to_json(registry: &Registry) -> JsonValue {
    json!({
        "id": registry.id.to_string(),
        "author_id": registry.author_id.to_string(),
        "author_name": registry.author_name,
        "member_id": registry.member_id.to_string(),
        "member_name": registry.member_name,
        "activity": registry.activity,
        "created_at": registry.created_at.to_rfc3339(),
        "processed": registry.processed,
        "processed_at": registry.processed_at.map(|t| t.to_rfc3339()),
        "notifier_response": registry.notifier_response,
        "error": registry.error,
        "lines": registry.lines.iter().map(|l| json!({
            "item_id": l.item_id.to_string(),
            "name": l.name,
            "quantity": l.quantity,
            "base_value": l.base_value.amount(),
            "payable": l.payable,
            "pct_override": l.pct_override.map(|p| p.fraction()),
        })).collect::<Vec<_>>(),
    })
}

pub fn outcome_to_json(outcome: &SubmissionOutcome) -> JsonValue {
    json!({
        "registry_id": outcome.registry_id.to_string(),
        "notified": outcome.notified,
        "total_value": outcome.total_value.amount(),
    })
}

pub fn cascade_to_json(report: &CascadeReport) -> JsonValue {
    json!({
        "inventories_removed": report.inventories_removed,
        "registries_removed": report.registries_removed,
    })
}

pub fn sweep_to_json(report: &SweepReport) -> JsonValue {
    json!({
        "processed": report.processed,
        "failed": report.failed,
    })
}
