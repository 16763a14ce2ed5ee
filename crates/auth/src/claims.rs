use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lootledger_core::UserId;

/// Claims carried by a session token.
///
/// Deliberately minimal: identity only. Admin-ness is resolved against the
/// admins collection on every mutating call, so revoking an admin takes
/// effect immediately instead of at token expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Email the user signed in with.
    pub email: String,

    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a session's time window.
///
/// Claims only — signature verification lives in the token codec.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_offset_min: i64, ttl_min: i64) -> (SessionClaims, DateTime<Utc>) {
        let now = Utc::now();
        let issued_at = now + Duration::minutes(issued_offset_min);
        (
            SessionClaims {
                sub: UserId::new(),
                email: "admin@guild.example".to_string(),
                issued_at,
                expires_at: issued_at + Duration::minutes(ttl_min),
            },
            now,
        )
    }

    #[test]
    fn live_session_validates() {
        let (c, now) = claims(-5, 60);
        assert!(validate_claims(&c, now).is_ok());
    }

    #[test]
    fn expired_session_is_rejected() {
        let (c, now) = claims(-120, 60);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn future_session_is_rejected() {
        let (c, now) = claims(5, 60);
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (c, now) = claims(0, -10);
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
