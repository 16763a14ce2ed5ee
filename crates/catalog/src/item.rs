use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lootledger_core::{DomainResult, DomainError, ItemId, Money, Percent};

/// A lootable item type in the catalog.
///
/// Catalog entries are live reference data: editing or deleting one never
/// changes past registries, because registry lines snapshot the pricing
/// fields at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,

    /// Base monetary value before any payout percentage is applied.
    pub base_value: Money,

    /// Non-payable items always resolve to a zero payout, regardless of
    /// rank or override percentages.
    pub payable: bool,

    /// Item-level payout override. Wins over any rank-derived percentage.
    pub pct_override: Option<Percent>,

    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin input for creating or replacing a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub base_value: Money,
    #[serde(default = "default_payable")]
    pub payable: bool,
    #[serde(default)]
    pub pct_override: Option<Percent>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_payable() -> bool {
    true
}

impl CatalogItem {
    /// Create a catalog item from an admin draft.
    ///
    /// The id is derived from the display name, so re-submitting the same
    /// name replaces the same document rather than creating a sibling.
    pub fn create(draft: ItemDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if draft.base_value == Money::ZERO {
            return Err(DomainError::validation("item base value must be positive"));
        }

        let id = ItemId::from_display_name(&name)?;
        Ok(Self {
            id,
            name,
            base_value: draft.base_value,
            payable: draft.payable,
            pct_override: draft.pct_override,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields, keeping identity and creation time.
    pub fn apply(&mut self, draft: ItemDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if draft.base_value == Money::ZERO {
            return Err(DomainError::validation("item base value must be positive"));
        }

        self.name = name;
        self.base_value = draft.base_value;
        self.payable = draft.payable;
        self.pct_override = draft.pct_override;
        self.image_url = draft.image_url;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, base_value: u64) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            base_value: Money::new(base_value),
            payable: true,
            pct_override: None,
            image_url: None,
        }
    }

    #[test]
    fn create_derives_slug_from_name() {
        let item = CatalogItem::create(draft("Gold Bar", 25_000), Utc::now()).unwrap();
        assert_eq!(item.id.as_str(), "gold-bar");
        assert_eq!(item.name, "Gold Bar");
        assert!(item.payable);
        assert!(item.pct_override.is_none());
    }

    #[test]
    fn create_rejects_empty_name_and_zero_value() {
        assert!(CatalogItem::create(draft("   ", 100), Utc::now()).is_err());
        assert!(CatalogItem::create(draft("Gold Bar", 0), Utc::now()).is_err());
    }

    #[test]
    fn payable_defaults_to_true_when_absent_in_json() {
        let draft: ItemDraft =
            serde_json::from_str(r#"{"name": "Watch", "base_value": 500}"#).unwrap();
        assert!(draft.payable);
        assert!(draft.pct_override.is_none());
    }

    #[test]
    fn apply_keeps_id_and_created_at() {
        let created = Utc::now();
        let mut item = CatalogItem::create(draft("Gold Bar", 25_000), created).unwrap();
        let id = item.id.clone();

        let mut edit = draft("Gold Bar", 30_000);
        edit.payable = false;
        item.apply(edit, Utc::now()).unwrap();

        assert_eq!(item.id, id);
        assert_eq!(item.created_at, created);
        assert_eq!(item.base_value, Money::new(30_000));
        assert!(!item.payable);
    }
}
