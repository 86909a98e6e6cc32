use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Claims of a caller's identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // caller id
    pub exp: i64,
    pub iat: i64,
}

/// Current time in epoch seconds.
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_AGORA_BASE_URL;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn sign(user_id: &str, ttl: Duration, config: &Config) -> (String, i64) {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();
        (token, claims.exp)
    }

    fn config(secret: &str) -> Config {
        Config {
            agora_app_id: String::new(),
            agora_app_certificate: String::new(),
            agora_org_name: String::new(),
            agora_app_name: String::new(),
            agora_base_url: DEFAULT_AGORA_BASE_URL.into(),
            database_url: String::new(),
            redis_url: String::new(),
            jwt_secret: secret.into(),
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            server_host: "::".into(),
            server_port: 3000,
        }
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let config = config("secret");
        let (token, exp) = sign("AbC123", Duration::hours(1), &config);

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "AbC123");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn rejects_other_secret_and_expired_tokens() {
        let (token, _) = sign("u1", Duration::hours(1), &config("secret"));
        assert!(verify_token(&token, &config("other")).is_err());

        let (expired, _) = sign("u1", Duration::hours(-2), &config("secret"));
        assert!(verify_token(&expired, &config("secret")).is_err());
    }
}
