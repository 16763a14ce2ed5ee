//! Strongly-typed identifiers used across the domain.
//!
//! Catalog items, members and ranks are keyed by human-derived slugs (the
//! document id the admin screens create); registries and authenticated
//! users are keyed by UUIDs.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a catalog item (slug).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a roster member (slug).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

macro_rules! impl_slug_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Validate an existing slug.
            ///
            /// Slugs are non-empty, lowercase ASCII alphanumerics and `-`,
            /// with no leading/trailing dash.
            pub fn new(slug: impl Into<String>) -> Result<Self, DomainError> {
                let slug = slug.into();
                let valid = !slug.is_empty()
                    && !slug.starts_with('-')
                    && !slug.ends_with('-')
                    && slug
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
                if valid {
                    Ok(Self(slug))
                } else {
                    Err(DomainError::invalid_id(format!("{}: '{}'", $name, slug)))
                }
            }

            /// Derive a slug from a display name: lowercase, whitespace
            /// runs become a single `-`, anything else non-alphanumeric is
            /// dropped.
            pub fn from_display_name(name: &str) -> Result<Self, DomainError> {
                let slug = name
                    .to_lowercase()
                    .split_whitespace()
                    .map(|word| {
                        word.chars()
                            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                            .collect::<String>()
                    })
                    .filter(|w| !w.is_empty())
                    .collect::<Vec<_>>()
                    .join("-");
                Self::new(slug)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_slug_id!(ItemId, "ItemId");
impl_slug_id!(MemberId, "MemberId");

/// Identifier of a rank.
///
/// The rank's display name doubles as its document id (the admin types it
/// once), so this is only trimmed and required non-empty, not slugged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankId(String);

impl RankId {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::invalid_id("RankId: empty name"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RankId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RankId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of a loot registry (audit record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryId(Uuid);

/// Identifier of an authenticated user (registry author, admin directory key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

macro_rules! impl_uuid_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier (UUIDv7, time-ordered). Prefer
            /// passing ids explicitly in tests for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_id!(RegistryId, "RegistryId");
impl_uuid_id!(UserId, "UserId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_slug_accepts_lowercase_dashed() {
        let id = ItemId::new("ak-47").unwrap();
        assert_eq!(id.as_str(), "ak-47");
    }

    #[test]
    fn item_slug_rejects_uppercase_and_spaces() {
        assert!(ItemId::new("AK").is_err());
        assert!(ItemId::new("ak 47").is_err());
        assert!(ItemId::new("").is_err());
        assert!(ItemId::new("-ak").is_err());
        assert!(ItemId::new("ak-").is_err());
    }

    #[test]
    fn slug_is_derived_from_display_name() {
        let id = ItemId::from_display_name("Bolsa  de Dinero").unwrap();
        assert_eq!(id.as_str(), "bolsa-de-dinero");
    }

    #[test]
    fn slug_derivation_drops_punctuation() {
        let id = MemberId::from_display_name("O'Neil Jr.").unwrap();
        assert_eq!(id.as_str(), "oneil-jr");
    }

    #[test]
    fn slug_derivation_fails_on_nothing_usable() {
        assert!(ItemId::from_display_name("¡¡¡").is_err());
    }

    #[test]
    fn rank_id_trims_and_keeps_display_name() {
        let id = RankId::new("  Sangre Nueva ").unwrap();
        assert_eq!(id.as_str(), "Sangre Nueva");
        assert!(RankId::new("   ").is_err());
    }

    #[test]
    fn registry_id_roundtrips_through_string() {
        let id = RegistryId::new();
        let parsed: RegistryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
