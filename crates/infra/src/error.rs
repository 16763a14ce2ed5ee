use thiserror::Error;

use lootledger_core::DomainError;

use crate::notify::NotifyError;
use crate::store::StoreError;

/// Service-level error taxonomy.
///
/// Propagation policy: pure computations never produce these (they degrade
/// to zero values instead); I/O-boundary services reject with one of these
/// and the API maps them to user-facing responses. `Notification` never
/// fails a submission — notifier outcomes there only move the registry's
/// processing status; the variant exists so callers map notifier failures
/// uniformly wherever one does surface.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete input. Raised before any persistence, so an
    /// invalid request never leaves partial writes behind.
    #[error("validation error: {0}")]
    Validation(String),

    /// An authenticated identity that is not in the admins directory tried
    /// to mutate something. Callers should also drop the session.
    #[error("authorization error: {0}")]
    Authorization(String),

    /// The persistence collaborator failed. Fatal for the write path that
    /// hit it; the session as a whole survives.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The external notifier failed.
    #[error("notification error: {0}")]
    Notification(#[from] NotifyError),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
