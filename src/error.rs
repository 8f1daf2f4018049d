use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    /// Connect, wipe, insert or read-back failed.
    #[error("storage failure: {0}")]
    Storage(#[from] DbErr),

    #[error("invalid seed plan: {0}")]
    InvalidPlan(String),

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

impl SeedError {
    pub fn is_storage(&self) -> bool {
        matches!(self, SeedError::Storage(_))
    }
}
