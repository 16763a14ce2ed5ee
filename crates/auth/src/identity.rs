use serde::{Deserialize, Serialize};

use lootledger_core::UserId;

use crate::claims::SessionClaims;

/// An authenticated identity, as derived from verified session claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

impl From<&SessionClaims> for Identity {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
        }
    }
}
