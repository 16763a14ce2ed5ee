use serde::{Deserialize, Serialize};

use lootledger_core::{Percent, RankId};

/// A member tier carrying payout percentages.
///
/// `level` is sort/display ordering only (higher is more senior); it has no
/// effect on pricing. `bonus_pct` is used instead of `base_pct` for
/// bonus-tier members; when absent the base percentage applies to everyone.
/// Nothing requires `bonus_pct >= base_pct` — a rank configured the other
/// way around simply pays bonus-tier members less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    pub id: RankId,
    pub level: u32,
    pub base_pct: Percent,
    pub bonus_pct: Option<Percent>,
    pub color: Option<String>,
}

/// Admin input for creating or replacing a rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDraft {
    #[serde(default)]
    pub level: u32,
    pub base_pct: Percent,
    #[serde(default)]
    pub bonus_pct: Option<Percent>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Rank {
    pub fn new(id: RankId, draft: RankDraft) -> Self {
        Self {
            id,
            level: draft.level,
            base_pct: draft.base_pct,
            bonus_pct: draft.bonus_pct,
            color: draft.color,
        }
    }

    /// Placeholder rank created when an admin assigns a rank name that does
    /// not exist yet (level 1, 10% base, 20% bonus).
    pub fn default_for(id: RankId) -> Self {
        Self {
            id,
            level: 1,
            base_pct: Percent::new(0.1).expect("literal in range"),
            bonus_pct: Some(Percent::new(0.2).expect("literal in range")),
            color: Some("#999".to_string()),
        }
    }

    /// The percentage this rank pays a member, honoring bonus-tier status.
    ///
    /// Bonus-tier members get `bonus_pct` when it is defined and fall back
    /// to `base_pct` when it is not.
    pub fn payout_percent(&self, bonus_tier: bool) -> Percent {
        if bonus_tier {
            self.bonus_pct.unwrap_or(self.base_pct)
        } else {
            self.base_pct
        }
    }
}
