use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{result::ApiResult, utils::now_secs};

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub timestamp: i64,
}

/// Liveness probe.
pub async fn ping() -> Json<ApiResult<PingResponse>> {
    ApiResult::success(PingResponse {
        status: "ok".to_string(),
        timestamp: now_secs(),
    })
}
