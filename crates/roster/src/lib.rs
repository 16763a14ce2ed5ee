//! `lootledger-roster` — ranks and member profiles (pure domain).

pub mod member;
pub mod rank;

pub use member::{Member, MemberDraft, search_by_name};
pub use rank::{Rank, RankDraft};
