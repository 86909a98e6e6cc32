use axum::{Json, extract::State};
use tracing::{error, info};

use super::model::{MESSAGE_CREATED, MESSAGE_EXISTING, ProvisionResponse};
use crate::{
    AppState,
    agora::{ProvisionOutcome, UsersEndpoint},
    error::AppError,
    middleware::CallContext,
    result::ApiResult,
    utils::now_secs,
};

const INTERNAL: &str = "Failed to create Agora user";

/// `addAgoraUser`: registers the caller on the app-level users endpoint.
pub async fn add_agora_user(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<ApiResult<ProvisionResponse>>, AppError> {
    provision(&state, &ctx, UsersEndpoint::Legacy).await
}

/// `addUser`: registers the caller on the org-scoped users endpoint.
pub async fn add_user(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<ApiResult<ProvisionResponse>>, AppError> {
    provision(&state, &ctx, UsersEndpoint::OrgScoped).await
}

async fn provision(
    state: &AppState,
    ctx: &CallContext,
    endpoint: UsersEndpoint,
) -> Result<Json<ApiResult<ProvisionResponse>>, AppError> {
    let caller = ctx.caller().map_err(|e| e.into_app_error(INTERNAL))?;
    let user_id = caller.normalized();
    info!("Adding Agora user {} via {:?} endpoint", user_id, endpoint);

    let app_token = state.app_tokens.get_or_refresh(now_secs()).map_err(|e| {
        error!("Error creating Agora user {}: app token: {}", user_id, e);
        AppError::Internal(INTERNAL)
    })?;

    let outcome = state
        .agora
        .register_user(endpoint, &app_token, &user_id)
        .await
        .map_err(|e| {
            error!("Error creating Agora user {}: {}", user_id, e);
            AppError::Internal(INTERNAL)
        })?;

    // The legacy endpoint never reported whether the account pre-existed.
    let report_existing = endpoint == UsersEndpoint::OrgScoped;

    let response = match outcome {
        ProvisionOutcome::Created(body) => {
            info!("Agora user {} created successfully", user_id);
            ProvisionResponse {
                success: true,
                message: MESSAGE_CREATED.to_string(),
                user_id,
                is_existing: report_existing.then_some(false),
                agora_response: Some(body),
            }
        }
        ProvisionOutcome::AlreadyExists => {
            info!("Agora user {} already exists", user_id);
            ProvisionResponse {
                success: true,
                message: MESSAGE_EXISTING.to_string(),
                user_id,
                is_existing: report_existing.then_some(true),
                agora_response: None,
            }
        }
        ProvisionOutcome::Failed { status, body } => {
            error!(
                "Error creating Agora user {}: Agora API error: {} - {}",
                user_id, status, body
            );
            return Err(AppError::Internal(INTERNAL));
        }
    };

    Ok(ApiResult::success(response))
}
