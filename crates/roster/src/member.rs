use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lootledger_core::{DomainError, DomainResult, MemberId, RankId};

/// A guild member profile.
///
/// A member with no rank resolves to a 0% payout for every line that has no
/// item-level override; `bonus_tier` unlocks the rank's bonus percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub rank: Option<RankId>,
    pub bonus_tier: bool,
    pub discord_id: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin input for creating or editing a member profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    #[serde(default)]
    pub rank: Option<RankId>,
    #[serde(default)]
    pub bonus_tier: bool,
    #[serde(default)]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Member {
    /// Create a member from an admin draft; the id is derived from the
    /// display name.
    pub fn create(draft: MemberDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("member name cannot be empty"));
        }
        let id = MemberId::from_display_name(&name)?;
        Ok(Self {
            id,
            name,
            rank: draft.rank,
            bonus_tier: draft.bonus_tier,
            discord_id: draft.discord_id,
            avatar_url: draft.avatar_url,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields, keeping identity and creation time.
    ///
    /// Renames keep the original id: past registries and inventory entries
    /// reference the member by id, and the id is the document key.
    pub fn apply(&mut self, draft: MemberDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("member name cannot be empty"));
        }
        self.name = name;
        self.rank = draft.rank;
        self.bonus_tier = draft.bonus_tier;
        self.discord_id = draft.discord_id;
        self.avatar_url = draft.avatar_url;
        self.updated_at = now;
        Ok(())
    }

    /// Assign (or clear) a rank.
    pub fn set_rank(&mut self, rank: Option<RankId>, now: DateTime<Utc>) {
        self.rank = rank;
        self.updated_at = now;
    }
}

/// Case-insensitive substring search over member display names, capped at
/// `limit` results (the autocomplete behind the submission form).
pub fn search_by_name<'a>(members: &'a [Member], query: &str, limit: usize) -> Vec<&'a Member> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    members
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&query))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> MemberDraft {
        MemberDraft {
            name: name.to_string(),
            rank: None,
            bonus_tier: false,
            discord_id: None,
            avatar_url: None,
        }
    }

    fn member(name: &str) -> Member {
        Member::create(draft(name), Utc::now()).unwrap()
    }

    #[test]
    fn create_derives_slug_and_defaults() {
        let m = member("Vex Carter");
        assert_eq!(m.id.as_str(), "vex-carter");
        assert!(m.rank.is_none());
        assert!(!m.bonus_tier);
    }

    #[test]
    fn create_rejects_blank_name() {
        assert!(Member::create(draft("  "), Utc::now()).is_err());
    }

    #[test]
    fn rename_keeps_id() {
        let mut m = member("Vex Carter");
        let id = m.id.clone();
        m.apply(draft("Vex C."), Utc::now()).unwrap();
        assert_eq!(m.id, id);
        assert_eq!(m.name, "Vex C.");
    }

    #[test]
    fn search_matches_case_insensitively_and_caps_results() {
        let members: Vec<Member> = (0..12).map(|i| member(&format!("Vex {i}"))).collect();
        let hits = search_by_name(&members, "VEX", 8);
        assert_eq!(hits.len(), 8);

        let none = search_by_name(&members, "   ", 8);
        assert!(none.is_empty());

        let one = search_by_name(&members, "vex 3", 8);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "Vex 3");
    }
}
