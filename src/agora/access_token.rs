//! AccessToken2 (`007`) encoding and decoding.
//!
//! A token is `"007" + base64(zlib(signature ++ signing_info))` where
//! `signing_info` carries the app id, issue time, lifetime, salt and the
//! services the token grants. All integers are little-endian.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

pub const VERSION: &str = "007";

pub const SERVICE_RTC: u16 = 1;
pub const SERVICE_CHAT: u16 = 5;

pub const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
pub const PRIVILEGE_PUBLISH_AUDIO: u16 = 2;
pub const PRIVILEGE_PUBLISH_VIDEO: u16 = 3;
pub const PRIVILEGE_PUBLISH_DATA: u16 = 4;

pub const PRIVILEGE_CHAT_USER: u16 = 1;
pub const PRIVILEGE_CHAT_APP: u16 = 2;

const SALT_MAX: u32 = 99_999_999;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("app id and app certificate must be 32 hex characters")]
    InvalidCredentials,
    #[error("token grants no service")]
    NoService,
    #[error("field exceeds {} bytes", u16::MAX)]
    FieldTooLong,
    #[error("invalid signing key length")]
    KeyLength,
    #[error("unsupported token version")]
    UnsupportedVersion,
    #[error("malformed token: {0}")]
    Malformed(&'static str),
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token compression failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// `uid` is the decimal user id, empty when the platform assigns one.
    Rtc { channel_name: String, uid: String },
    Chat { user_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub kind: ServiceKind,
    /// privilege id -> lifetime in seconds from issue time
    pub privileges: BTreeMap<u16, u32>,
}

impl Service {
    pub fn rtc(channel_name: &str, uid: u32) -> Self {
        let uid = if uid == 0 {
            String::new()
        } else {
            uid.to_string()
        };
        Self {
            kind: ServiceKind::Rtc {
                channel_name: channel_name.to_string(),
                uid,
            },
            privileges: BTreeMap::new(),
        }
    }

    pub fn chat(user_id: &str) -> Self {
        Self {
            kind: ServiceKind::Chat {
                user_id: user_id.to_string(),
            },
            privileges: BTreeMap::new(),
        }
    }

    pub fn service_type(&self) -> u16 {
        match self.kind {
            ServiceKind::Rtc { .. } => SERVICE_RTC,
            ServiceKind::Chat { .. } => SERVICE_CHAT,
        }
    }

    pub fn add_privilege(&mut self, privilege: u16, expire: u32) {
        self.privileges.insert(privilege, expire);
    }

    fn pack(&self, buf: &mut Vec<u8>) -> Result<(), SigningError> {
        pack_u16(buf, self.service_type());
        pack_map(buf, &self.privileges)?;
        match &self.kind {
            ServiceKind::Rtc { channel_name, uid } => {
                pack_bytes(buf, channel_name.as_bytes())?;
                pack_bytes(buf, uid.as_bytes())
            }
            ServiceKind::Chat { user_id } => pack_bytes(buf, user_id.as_bytes()),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self, SigningError> {
        let service_type = reader.u16()?;
        let privileges = reader.map()?;
        let kind = match service_type {
            SERVICE_RTC => ServiceKind::Rtc {
                channel_name: reader.string()?,
                uid: reader.string()?,
            },
            SERVICE_CHAT => ServiceKind::Chat {
                user_id: reader.string()?,
            },
            _ => return Err(SigningError::Malformed("unknown service type")),
        };
        Ok(Self { kind, privileges })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub app_id: String,
    pub issue_ts: u32,
    /// Token lifetime in seconds from `issue_ts`.
    pub expire: u32,
    pub salt: u32,
    pub services: BTreeMap<u16, Service>,
}

impl AccessToken {
    pub fn new(app_id: &str, expire: u32) -> Self {
        let issue_ts = chrono::Utc::now().timestamp() as u32;
        let salt = rand::thread_rng().gen_range(1..=SALT_MAX);
        Self::with_issue_ts_and_salt(app_id, expire, issue_ts, salt)
    }

    pub fn with_issue_ts_and_salt(app_id: &str, expire: u32, issue_ts: u32, salt: u32) -> Self {
        Self {
            app_id: app_id.to_string(),
            issue_ts,
            expire,
            salt,
            services: BTreeMap::new(),
        }
    }

    /// Adds a service, replacing any previous service of the same type.
    pub fn add_service(&mut self, service: Service) {
        self.services.insert(service.service_type(), service);
    }

    pub fn build(&self, app_certificate: &str) -> Result<String, SigningError> {
        if !is_uuid(&self.app_id) || !is_uuid(app_certificate) {
            return Err(SigningError::InvalidCredentials);
        }
        if self.services.is_empty() {
            return Err(SigningError::NoService);
        }

        let signing_info = self.signing_info()?;
        let key = signing_key(app_certificate, self.issue_ts, self.salt)?;
        let signature = hmac_sha256(&key, &signing_info)?;

        let mut content = Vec::with_capacity(signature.len() + 2 + signing_info.len());
        pack_bytes(&mut content, &signature)?;
        content.extend_from_slice(&signing_info);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content)?;
        let compressed = encoder.finish()?;

        Ok(format!("{VERSION}{}", STANDARD.encode(compressed)))
    }

    /// Decodes a token without checking its signature.
    pub fn parse(token: &str) -> Result<Self, SigningError> {
        Ok(Self::decode(token)?.0)
    }

    /// Decodes a token and checks its signature against `app_certificate`.
    pub fn verify(token: &str, app_certificate: &str) -> Result<Self, SigningError> {
        let (parsed, signature, signing_info) = Self::decode(token)?;
        let key = signing_key(app_certificate, parsed.issue_ts, parsed.salt)?;
        let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| SigningError::KeyLength)?;
        mac.update(&signing_info);
        mac.verify_slice(&signature)
            .map_err(|_| SigningError::Malformed("signature mismatch"))?;
        Ok(parsed)
    }

    /// Absolute expiry of the token in epoch seconds.
    pub fn expires_at(&self) -> u64 {
        u64::from(self.issue_ts) + u64::from(self.expire)
    }

    fn signing_info(&self) -> Result<Vec<u8>, SigningError> {
        let mut buf = Vec::new();
        pack_bytes(&mut buf, self.app_id.as_bytes())?;
        pack_u32(&mut buf, self.issue_ts);
        pack_u32(&mut buf, self.expire);
        pack_u32(&mut buf, self.salt);
        pack_u16(&mut buf, self.services.len() as u16);
        for service in self.services.values() {
            service.pack(&mut buf)?;
        }
        Ok(buf)
    }

    fn decode(token: &str) -> Result<(Self, Vec<u8>, Vec<u8>), SigningError> {
        let encoded = token
            .strip_prefix(VERSION)
            .ok_or(SigningError::UnsupportedVersion)?;
        let compressed = STANDARD.decode(encoded)?;
        let mut content = Vec::new();
        ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut content)?;

        let mut reader = Reader::new(&content);
        let signature = reader.bytes()?.to_vec();
        let signing_info = reader.rest().to_vec();

        let mut reader = Reader::new(&signing_info);
        let app_id = reader.string()?;
        let issue_ts = reader.u32()?;
        let expire = reader.u32()?;
        let salt = reader.u32()?;
        let count = reader.u16()?;

        let mut token = Self::with_issue_ts_and_salt(&app_id, expire, issue_ts, salt);
        for _ in 0..count {
            token.add_service(Service::unpack(&mut reader)?);
        }
        if !reader.rest().is_empty() {
            return Err(SigningError::Malformed("trailing bytes"));
        }

        Ok((token, signature, signing_info))
    }
}

fn is_uuid(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn signing_key(app_certificate: &str, issue_ts: u32, salt: u32) -> Result<Vec<u8>, SigningError> {
    let key = hmac_sha256(&issue_ts.to_le_bytes(), app_certificate.as_bytes())?;
    hmac_sha256(&salt.to_le_bytes(), &key)
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SigningError::KeyLength)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn pack_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_bytes(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<(), SigningError> {
    let len = u16::try_from(bytes.len()).map_err(|_| SigningError::FieldTooLong)?;
    pack_u16(buf, len);
    buf.extend_from_slice(bytes);
    Ok(())
}

fn pack_map(buf: &mut Vec<u8>, map: &BTreeMap<u16, u32>) -> Result<(), SigningError> {
    let len = u16::try_from(map.len()).map_err(|_| SigningError::FieldTooLong)?;
    pack_u16(buf, len);
    for (key, value) in map {
        pack_u16(buf, *key);
        pack_u32(buf, *value);
    }
    Ok(())
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SigningError> {
        if self.buf.len() < n {
            return Err(SigningError::Malformed("unexpected end of token"));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u16(&mut self) -> Result<u16, SigningError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32, SigningError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn bytes(&mut self) -> Result<&'a [u8], SigningError> {
        let len = self.u16()? as usize;
        self.take(len)
    }

    fn string(&mut self) -> Result<String, SigningError> {
        String::from_utf8(self.bytes()?.to_vec())
            .map_err(|_| SigningError::Malformed("string is not utf-8"))
    }

    fn map(&mut self) -> Result<BTreeMap<u16, u32>, SigningError> {
        let count = self.u16()?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = self.u16()?;
            let value = self.u32()?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_ID: &str = "970ca35de60c44645bbae8a215061b33";
    const APP_CERT: &str = "5cfd2fd1755d40ecb72977518be15d3b";

    fn sample_token() -> AccessToken {
        let mut token = AccessToken::with_issue_ts_and_salt(APP_ID, 900, 1_111_111, 1);
        let mut rtc = Service::rtc("7d72365eb983485397e3e3f9d460bdda", 2_882_341_273);
        rtc.add_privilege(PRIVILEGE_JOIN_CHANNEL, 900);
        token.add_service(rtc);
        token
    }

    #[test]
    fn built_token_has_version_prefix_and_verifies() {
        let built = sample_token().build(APP_CERT).unwrap();
        assert!(built.starts_with(VERSION));

        let parsed = AccessToken::verify(&built, APP_CERT).unwrap();
        assert_eq!(parsed, sample_token());
    }

    #[test]
    fn signing_info_layout_is_little_endian() {
        let info = sample_token().signing_info().unwrap();

        assert_eq!(&info[0..2], &32u16.to_le_bytes());
        assert_eq!(&info[2..34], APP_ID.as_bytes());
        assert_eq!(&info[34..38], &1_111_111u32.to_le_bytes());
        assert_eq!(&info[38..42], &900u32.to_le_bytes());
        assert_eq!(&info[42..46], &1u32.to_le_bytes());
        assert_eq!(&info[46..48], &1u16.to_le_bytes());
        // service type, then one privilege entry
        assert_eq!(&info[48..50], &SERVICE_RTC.to_le_bytes());
        assert_eq!(&info[50..52], &1u16.to_le_bytes());
        assert_eq!(&info[52..54], &PRIVILEGE_JOIN_CHANNEL.to_le_bytes());
        assert_eq!(&info[54..58], &900u32.to_le_bytes());
    }

    #[test]
    fn wrong_certificate_fails_verification() {
        let built = sample_token().build(APP_CERT).unwrap();
        let other = "00000000000000000000000000000000";
        assert!(matches!(
            AccessToken::verify(&built, other),
            Err(SigningError::Malformed("signature mismatch"))
        ));
    }

    #[test]
    fn zero_uid_is_encoded_as_empty_string() {
        let service = Service::rtc("room", 0);
        assert_eq!(
            service.kind,
            ServiceKind::Rtc {
                channel_name: "room".into(),
                uid: String::new()
            }
        );
    }

    #[test]
    fn rejects_non_hex_credentials() {
        let mut token = AccessToken::with_issue_ts_and_salt("not-an-app-id", 600, 1, 1);
        token.add_service(Service::chat("alice"));
        assert!(matches!(
            token.build(APP_CERT),
            Err(SigningError::InvalidCredentials)
        ));

        let token = sample_token();
        assert!(matches!(
            token.build("short"),
            Err(SigningError::InvalidCredentials)
        ));
    }

    #[test]
    fn rejects_token_without_service() {
        let token = AccessToken::with_issue_ts_and_salt(APP_ID, 600, 1, 1);
        assert!(matches!(token.build(APP_CERT), Err(SigningError::NoService)));
    }

    #[test]
    fn parse_rejects_other_versions_and_garbage() {
        assert!(matches!(
            AccessToken::parse("006abc"),
            Err(SigningError::UnsupportedVersion)
        ));
        assert!(matches!(
            AccessToken::parse("007!!!"),
            Err(SigningError::Base64(_))
        ));
    }

    #[test]
    fn services_are_keyed_by_type() {
        let mut token = AccessToken::with_issue_ts_and_salt(APP_ID, 600, 10, 20);
        token.add_service(Service::chat("first"));
        token.add_service(Service::chat("second"));
        token.add_service(Service::rtc("room", 7));

        let keys: Vec<u16> = token.services.keys().copied().collect();
        assert_eq!(keys, vec![SERVICE_RTC, SERVICE_CHAT]);

        let parsed = AccessToken::parse(&token.build(APP_CERT).unwrap()).unwrap();
        assert_eq!(
            parsed.services[&SERVICE_CHAT].kind,
            ServiceKind::Chat {
                user_id: "second".into()
            }
        );
        assert_eq!(parsed.expires_at(), 610);
    }

    #[test]
    fn fresh_tokens_get_a_salt_in_range() {
        let token = AccessToken::new(APP_ID, 60);
        assert!((1..=SALT_MAX).contains(&token.salt));
        assert!(token.issue_ts > 0);
    }
}
