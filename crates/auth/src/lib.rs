//! `lootledger-auth` — pure authentication boundary.
//!
//! Session claims, their time-window validation, and the HS256 token codec.
//! Intentionally decoupled from HTTP and storage; whether an identity may
//! *mutate* anything is a store-side admins-directory check, not a token
//! claim.

pub mod claims;
pub mod identity;
pub mod token;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use identity::Identity;
pub use token::{Hs256TokenCodec, TokenError};
