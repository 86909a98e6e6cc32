use super::access_token::SigningError;
use super::builder::{ChatTokenBuilder, RtcRole, RtcTokenBuilder};
use crate::config::Config;

/// Mints platform tokens. Lifetimes are in seconds from the moment of signing.
pub trait TokenSigner: Send + Sync {
    fn app_token(&self, expire: u32) -> Result<String, SigningError>;

    fn user_token(&self, user_id: &str, expire: u32) -> Result<String, SigningError>;

    fn rtc_token_with_uid(
        &self,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        token_expire: u32,
        privilege_expire: u32,
    ) -> Result<String, SigningError>;
}

/// Signs AccessToken2 tokens with the configured app id and certificate.
#[derive(Clone)]
pub struct AgoraSigner {
    app_id: String,
    app_certificate: String,
}

impl AgoraSigner {
    pub fn new(config: &Config) -> Self {
        Self {
            app_id: config.agora_app_id.clone(),
            app_certificate: config.agora_app_certificate.clone(),
        }
    }
}

impl TokenSigner for AgoraSigner {
    fn app_token(&self, expire: u32) -> Result<String, SigningError> {
        ChatTokenBuilder::build_app_token(&self.app_id, &self.app_certificate, expire)
    }

    fn user_token(&self, user_id: &str, expire: u32) -> Result<String, SigningError> {
        ChatTokenBuilder::build_user_token(&self.app_id, &self.app_certificate, user_id, expire)
    }

    fn rtc_token_with_uid(
        &self,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        token_expire: u32,
        privilege_expire: u32,
    ) -> Result<String, SigningError> {
        RtcTokenBuilder::build_token_with_uid(
            &self.app_id,
            &self.app_certificate,
            channel_name,
            uid,
            role,
            token_expire,
            privilege_expire,
        )
    }
}
