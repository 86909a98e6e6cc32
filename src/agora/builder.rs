use super::access_token::{
    AccessToken, PRIVILEGE_CHAT_APP, PRIVILEGE_CHAT_USER, PRIVILEGE_JOIN_CHANNEL,
    PRIVILEGE_PUBLISH_AUDIO, PRIVILEGE_PUBLISH_DATA, PRIVILEGE_PUBLISH_VIDEO, Service,
    SigningError,
};

/// Channel role of an RTC token holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcRole {
    /// May join, speak and listen.
    Publisher,
    /// May only join and listen.
    Subscriber,
}

pub struct ChatTokenBuilder;

impl ChatTokenBuilder {
    /// Application-level token for the chat admin REST API.
    pub fn build_app_token(
        app_id: &str,
        app_certificate: &str,
        expire: u32,
    ) -> Result<String, SigningError> {
        let mut token = AccessToken::new(app_id, expire);
        let mut chat = Service::chat("");
        chat.add_privilege(PRIVILEGE_CHAT_APP, expire);
        token.add_service(chat);
        token.build(app_certificate)
    }

    pub fn build_user_token(
        app_id: &str,
        app_certificate: &str,
        user_id: &str,
        expire: u32,
    ) -> Result<String, SigningError> {
        let mut token = AccessToken::new(app_id, expire);
        let mut chat = Service::chat(user_id);
        chat.add_privilege(PRIVILEGE_CHAT_USER, expire);
        token.add_service(chat);
        token.build(app_certificate)
    }
}

pub struct RtcTokenBuilder;

impl RtcTokenBuilder {
    /// Channel-scoped token. `token_expire` and `privilege_expire` are lifetimes
    /// in seconds from now; `uid` 0 lets the platform assign one on join.
    pub fn build_token_with_uid(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        token_expire: u32,
        privilege_expire: u32,
    ) -> Result<String, SigningError> {
        let mut token = AccessToken::new(app_id, token_expire);
        let mut rtc = Service::rtc(channel_name, uid);
        rtc.add_privilege(PRIVILEGE_JOIN_CHANNEL, privilege_expire);
        if role == RtcRole::Publisher {
            rtc.add_privilege(PRIVILEGE_PUBLISH_AUDIO, privilege_expire);
            rtc.add_privilege(PRIVILEGE_PUBLISH_VIDEO, privilege_expire);
            rtc.add_privilege(PRIVILEGE_PUBLISH_DATA, privilege_expire);
        }
        token.add_service(rtc);
        token.build(app_certificate)
    }
}
