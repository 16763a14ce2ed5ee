use serde::Serialize;

use lootledger_catalog::CatalogItem;
use lootledger_core::{Money, Percent};
use lootledger_roster::{Member, Rank};

/// The pricing-relevant slice of an item.
///
/// Both live catalog entries and frozen registry line snapshots reduce to
/// this, so historical registries and current views price identically.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PayoutInputs {
    pub base_value: Money,
    pub payable: bool,
    pub pct_override: Option<Percent>,
}

impl From<&CatalogItem> for PayoutInputs {
    fn from(item: &CatalogItem) -> Self {
        Self {
            base_value: item.base_value,
            payable: item.payable,
            pct_override: item.pct_override,
        }
    }
}

/// Resolve the percentage actually applied to a line.
///
/// Strict precedence:
/// 1. non-payable items pay zero, full stop;
/// 2. an item-level override wins over anything rank-derived;
/// 3. otherwise the member's rank decides, bonus-aware
///    ([`Rank::payout_percent`]);
/// 4. a member with no (resolvable) rank pays zero.
///
/// `rank` is the member's already-resolved rank document; callers pass
/// `None` both for rankless members and for members whose rank was deleted.
pub fn effective_percent(inputs: &PayoutInputs, member: &Member, rank: Option<&Rank>) -> Percent {
    if !inputs.payable {
        return Percent::ZERO;
    }
    if let Some(pct) = inputs.pct_override {
        return pct;
    }
    match rank {
        Some(rank) => rank.payout_percent(member.bonus_tier),
        None => Percent::ZERO,
    }
}

/// Unit price for one item: base value × effective percentage, rounded half
/// away from zero. The rounded unit price — not the exact product — is what
/// line totals multiply by quantity.
pub fn resolve_unit_price(inputs: &PayoutInputs, member: &Member, rank: Option<&Rank>) -> Money {
    effective_percent(inputs, member, rank).of(inputs.base_value)
}

/// One line of work for [`price_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct PricingLine {
    pub name: String,
    pub quantity: u32,
    pub inputs: PayoutInputs,
}

/// A priced line, ready for display or notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub name: String,
    pub quantity: u32,
    pub pct_used: Percent,
    pub unit_price: Money,
    pub line_total: Money,
}

/// All lines priced for one member, plus the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLines {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

/// Price a batch of lines against one member's rank.
///
/// Pure over its inputs: the same snapshot in, the same totals out.
pub fn price_lines(lines: &[PricingLine], member: &Member, rank: Option<&Rank>) -> PricedLines {
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Money::ZERO;

    for line in lines {
        let pct_used = effective_percent(&line.inputs, member, rank);
        let unit_price = pct_used.of(line.inputs.base_value);
        let line_total = unit_price.times(line.quantity);
        total = total.saturating_add(line_total);
        priced.push(PricedLine {
            name: line.name.clone(),
            quantity: line.quantity,
            pct_used,
            unit_price,
            line_total,
        });
    }

    PricedLines {
        lines: priced,
        total,
    }
}
