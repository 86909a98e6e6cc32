use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;

/// Error code the chat REST API returns for a taken username.
pub const DUPLICATE_USERNAME_CODE: &str = "duplicate_unique_property_exists";

#[derive(Debug, thiserror::Error)]
pub enum AgoraError {
    #[error("request to Agora failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Agora returned an unreadable body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// The two user-registration endpoints, each with its own way of spotting a
/// username that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersEndpoint {
    /// `{base}/users`
    Legacy,
    /// `{base}/{org}/{app}/users`
    OrgScoped,
}

impl UsersEndpoint {
    fn is_duplicate(self, body: &str) -> bool {
        match self {
            UsersEndpoint::Legacy => body.contains("username already exists"),
            UsersEndpoint::OrgScoped => match serde_json::from_str::<Value>(body) {
                Ok(decoded) => {
                    decoded.get("error").and_then(Value::as_str) == Some(DUPLICATE_USERNAME_CODE)
                        || body.contains("username")
                        || body.contains("exists")
                }
                // Only a body that is not JSON at all gets the looser text match.
                Err(_) => {
                    body.contains("duplicate") || body.contains("exists") || body.contains("username")
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    Created(Value),
    AlreadyExists,
    Failed { status: u16, body: String },
}

#[derive(Serialize)]
struct NewUser<'a> {
    username: &'a str,
    password: &'a str,
    nickname: &'a str,
}

/// Client for the chat platform's user administration API.
#[derive(Clone)]
pub struct AgoraClient {
    http: reqwest::Client,
    base_url: String,
    org_name: String,
    app_name: String,
}

impl AgoraClient {
    pub fn new(base_url: &str, org_name: &str, app_name: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            org_name: org_name.to_string(),
            app_name: app_name.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.agora_base_url,
            &config.agora_org_name,
            &config.agora_app_name,
        )
    }

    pub fn users_url(&self, endpoint: UsersEndpoint) -> String {
        match endpoint {
            UsersEndpoint::Legacy => format!("{}/users", self.base_url),
            UsersEndpoint::OrgScoped => format!(
                "{}/{}/{}/users",
                self.base_url, self.org_name, self.app_name
            ),
        }
    }

    /// Registers `username` with a throwaway password. The nickname is the username.
    pub async fn register_user(
        &self,
        endpoint: UsersEndpoint,
        app_token: &str,
        username: &str,
    ) -> Result<ProvisionOutcome, AgoraError> {
        let password = format!("pwd_{}_{}", username, Uuid::new_v4().simple());
        let users = [NewUser {
            username,
            password: &password,
            nickname: username,
        }];

        let response = self
            .http
            .post(self.users_url(endpoint))
            .bearer_auth(app_token)
            .json(&users)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Agora users endpoint answered {}: {}", status, body);

        if status.is_success() {
            return Ok(ProvisionOutcome::Created(serde_json::from_str(&body)?));
        }

        if status == StatusCode::BAD_REQUEST && endpoint.is_duplicate(&body) {
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        Ok(ProvisionOutcome::Failed {
            status: status.as_u16(),
            body,
        })
    }
}
