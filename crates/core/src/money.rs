//! Money and payout-percentage value objects.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Monetary amount in whole in-game dollars (non-negative).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Multiply a unit price by a line quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Payout percentage as a fraction in `0.0..=1.0`.
///
/// Construction rejects NaN/out-of-range values, so a `Percent` in hand is
/// always applicable. An absent percentage is `Option<Percent>` at the call
/// site, never a sentinel value.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(f64);

impl Percent {
    pub const ZERO: Percent = Percent(0.0);

    pub fn new(fraction: f64) -> Result<Self, DomainError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(DomainError::validation(format!(
                "payout percentage must be a fraction in 0.0..=1.0, got {fraction}"
            )));
        }
        Ok(Self(fraction))
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Apply the percentage to a monetary value.
    ///
    /// Rounds half away from zero, which on non-negative input matches the
    /// payout sheets this system replaces. The rounded unit price — not the
    /// exact product — is what gets multiplied by a quantity downstream.
    pub fn of(&self, value: Money) -> Money {
        Money((value.0 as f64 * self.0).round() as u64)
    }
}

impl TryFrom<f64> for Percent {
    type Error = DomainError;

    fn try_from(fraction: f64) -> Result<Self, Self::Error> {
        Self::new(fraction)
    }
}

impl From<Percent> for f64 {
    fn from(p: Percent) -> f64 {
        p.0
    }
}
