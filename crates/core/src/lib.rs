//! `lootledger-core` — domain foundation building blocks.
//!
//! Pure domain primitives shared by every other crate: typed identifiers,
//! the domain error model, and money/percentage value objects. No
//! infrastructure concerns live here.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, MemberId, RankId, RegistryId, UserId};
pub use money::{Money, Percent};
