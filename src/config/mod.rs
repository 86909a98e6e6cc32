use std::env;
use std::time::Duration;

pub const DEFAULT_AGORA_BASE_URL: &str = "https://a71.chat.agora.io";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub agora_app_id: String,
    pub agora_app_certificate: String,
    pub agora_org_name: String,
    pub agora_app_name: String,
    pub agora_base_url: String,
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            agora_app_id: env::var("AGORA_APP_ID")?,
            agora_app_certificate: env::var("AGORA_APP_CERTIFICATE")?,
            agora_org_name: env::var("AGORA_ORG_NAME")?,
            agora_app_name: env::var("AGORA_APP_NAME")?,
            agora_base_url: env::var("AGORA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_AGORA_BASE_URL.to_string()),
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: env_or("SERVER_PORT", 3000),
            rate_limit_window_secs: env_or("RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: env_or("RATE_LIMIT_REQUESTS", 100),
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("TOKEN_BACKEND_TEST_UNSET_VAR", 42u16), 42);

        // SAFETY: test-local variable name, not read by any other test.
        unsafe { env::set_var("TOKEN_BACKEND_TEST_GARBAGE_VAR", "not-a-number") };
        assert_eq!(env_or("TOKEN_BACKEND_TEST_GARBAGE_VAR", 7u32), 7);

        unsafe { env::set_var("TOKEN_BACKEND_TEST_GARBAGE_VAR", " 15 ") };
        assert_eq!(env_or("TOKEN_BACKEND_TEST_GARBAGE_VAR", 7u32), 15);
    }

    #[test]
    fn rate_limit_window_is_in_seconds() {
        let config = Config {
            agora_app_id: String::new(),
            agora_app_certificate: String::new(),
            agora_org_name: String::new(),
            agora_app_name: String::new(),
            agora_base_url: DEFAULT_AGORA_BASE_URL.into(),
            database_url: String::new(),
            redis_url: String::new(),
            jwt_secret: String::new(),
            rate_limit_window_secs: 90,
            rate_limit_requests: 10,
            server_host: "::".into(),
            server_port: 3000,
        };
        assert_eq!(config.rate_limit_window(), Duration::from_secs(90));
    }
}
