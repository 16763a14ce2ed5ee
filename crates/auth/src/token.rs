use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token could not be encoded: {0}")]
    Encode(String),

    #[error("token rejected: {0}")]
    Invalid(String),

    #[error(transparent)]
    Window(#[from] TokenValidationError),
}

/// HS256 session-token codec.
///
/// The library's built-in `exp` handling is disabled because
/// [`SessionClaims`] carries RFC3339 timestamps; the time window is checked
/// by [`validate_claims`] against a caller-supplied clock instead.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn mint(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify signature and time window; returns the embedded claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lootledger_core::UserId;

    fn claims(ttl_min: i64) -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            sub: UserId::new(),
            email: "admin@guild.example".to_string(),
            issued_at: now,
            expires_at: now + Duration::minutes(ttl_min),
        }
    }

    #[test]
    fn mint_verify_roundtrip() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let claims = claims(30);
        let token = codec.mint(&claims).unwrap();
        let verified = codec.verify(&token, Utc::now()).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let other = Hs256TokenCodec::new(b"other-secret");
        let token = codec.mint(&claims(30)).unwrap();
        assert!(matches!(
            other.verify(&token, Utc::now()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected_by_window_check() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let token = codec.mint(&claims(30)).unwrap();
        let later = Utc::now() + Duration::hours(2);
        assert!(matches!(
            codec.verify(&token, later),
            Err(TokenError::Window(TokenValidationError::Expired))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        assert!(matches!(
            codec.verify("not-a-token", Utc::now()),
            Err(TokenError::Invalid(_))
        ));
    }
}
