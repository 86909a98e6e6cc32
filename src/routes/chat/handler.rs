use axum::{Json, extract::State};
use tracing::{error, info};

use super::model::ChatTokenResponse;
use crate::{
    AppState,
    error::AppError,
    middleware::{CallContext, authorize},
    result::ApiResult,
    routes::TOKEN_TTL_SECS,
    utils::now_secs,
};

const INTERNAL: &str = "Failed to generate chat token";

/// `generateAgoraChatToken` and `testAuth`: user-scoped chat token for the caller.
pub async fn generate_chat_token(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<ApiResult<ChatTokenResponse>>, AppError> {
    let user_id = authorize(&ctx, state.users.as_ref())
        .await
        .map_err(|e| e.into_app_error(INTERNAL))?;

    let token = state
        .signer
        .user_token(&user_id, TOKEN_TTL_SECS)
        .map_err(|e| {
            error!("Error generating Agora Chat token for {}: {}", user_id, e);
            AppError::Internal(INTERNAL)
        })?;

    let expiration_time = now_secs() + i64::from(TOKEN_TTL_SECS);
    info!("Issued chat token for {}", user_id);

    Ok(ApiResult::success(ChatTokenResponse {
        token,
        expiration_time,
        user_id,
    }))
}
