use tracing::error;

use super::auth::{CallContext, CallerIdentity};
use crate::{database::UserStore, error::AppError};

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("caller is not authenticated")]
    Unauthenticated,
    #[error("caller has no user record")]
    NotFound,
    #[error("user lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),
}

impl GuardError {
    /// Maps to the caller-facing error; lookup failures become `internal`.
    pub fn into_app_error(self, internal: &'static str) -> AppError {
        match self {
            GuardError::Unauthenticated => AppError::Unauthenticated("User must be authenticated"),
            GuardError::NotFound => AppError::NotFound("User not found in database"),
            GuardError::Lookup(e) => {
                error!("User lookup failed: {}", e);
                AppError::Internal(internal)
            }
        }
    }
}

impl CallContext {
    pub fn caller(&self) -> Result<&CallerIdentity, GuardError> {
        self.auth.as_ref().ok_or(GuardError::Unauthenticated)
    }
}

/// Requires a verified caller with a user record and returns the caller's
/// normalized id.
pub async fn authorize(ctx: &CallContext, users: &dyn UserStore) -> Result<String, GuardError> {
    let caller = ctx.caller()?;
    ensure_registered(caller, users).await
}

/// Existence half of [`authorize`]. The record is looked up by the raw caller id.
pub async fn ensure_registered(
    caller: &CallerIdentity,
    users: &dyn UserStore,
) -> Result<String, GuardError> {
    if !users.exists(&caller.uid).await? {
        return Err(GuardError::NotFound);
    }
    Ok(caller.normalized())
}
