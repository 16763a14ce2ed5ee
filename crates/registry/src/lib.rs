//! `lootledger-registry` — loot-grant audit records (pure domain).
//!
//! A registry freezes its line items as snapshots at submission time, so
//! later catalog edits never change what a past grant was worth. After
//! creation only the processing-status fields move.

pub mod record;
pub mod submission;

pub use record::{LineSnapshot, Registry};
pub use submission::{SubmissionInput, SubmissionLine};
