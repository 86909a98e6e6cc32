use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MESSAGE_CREATED: &str = "User created successfully";
pub const MESSAGE_EXISTING: &str = "User already exists";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_existing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agora_response: Option<Value>,
}
