use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcTokenRequest {
    #[serde(default)]
    pub channel_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcTokenResponse {
    pub token: String,
    pub expiration_time: i64,
    pub channel_name: String,
    pub uid: u32,
}
