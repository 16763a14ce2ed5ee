//! Admin gate for mutating operations.
//!
//! Write access is a live directory lookup, not a token claim: removing a
//! user from the admins collection locks them out on their very next call.

use lootledger_core::UserId;

use crate::error::{AppError, AppResult};
use crate::store::LootStore;

/// Reject the call unless `user` is listed in the admins collection.
pub async fn ensure_admin(store: &dyn LootStore, user: &UserId, label: &str) -> AppResult<()> {
    if store.is_admin(user).await? {
        Ok(())
    } else {
        Err(AppError::Authorization(format!(
            "{label} is not an administrator"
        )))
    }
}
