use axum::{Json, body::Bytes, extract::State};
use tracing::{error, info};

use super::model::{RtcTokenRequest, RtcTokenResponse};
use crate::{
    AppState,
    agora::RtcRole,
    error::AppError,
    middleware::{CallContext, ensure_registered},
    result::{ApiResult, CallableRequest},
    routes::TOKEN_TTL_SECS,
    utils::now_secs,
};

const INTERNAL: &str = "Failed to generate RTC token";

/// Platform assigns the numeric uid on join.
const AUTO_ASSIGN_UID: u32 = 0;

/// `getRtcToken`: broadcaster token for one channel.
pub async fn get_rtc_token(
    State(state): State<AppState>,
    ctx: CallContext,
    body: Bytes,
) -> Result<Json<ApiResult<RtcTokenResponse>>, AppError> {
    let caller = ctx.caller().map_err(|e| e.into_app_error(INTERNAL))?;

    let channel_name = CallableRequest::<RtcTokenRequest>::from_body(&body)
        .and_then(|req| req.channel_name)
        .filter(|name| !name.is_empty())
        .ok_or(AppError::InvalidArgument("channelName is required"))?;

    ensure_registered(caller, state.users.as_ref())
        .await
        .map_err(|e| e.into_app_error(INTERNAL))?;

    let expiration_time = now_secs() + i64::from(TOKEN_TTL_SECS);
    let token = state
        .signer
        .rtc_token_with_uid(
            &channel_name,
            AUTO_ASSIGN_UID,
            RtcRole::Publisher,
            TOKEN_TTL_SECS,
            TOKEN_TTL_SECS,
        )
        .map_err(|e| {
            error!("Error generating Agora RTC token for {}: {}", channel_name, e);
            AppError::Internal(INTERNAL)
        })?;

    info!("Issued RTC token for channel {}", channel_name);

    Ok(ApiResult::success(RtcTokenResponse {
        token,
        expiration_time,
        channel_name,
        uid: AUTO_ASSIGN_UID,
    }))
}
