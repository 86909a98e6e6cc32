use std::convert::Infallible;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{AppState, utils::verify_token};

/// Verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

impl CallerIdentity {
    /// Platform user id / username form of the caller id.
    pub fn normalized(&self) -> String {
        self.uid.to_lowercase()
    }
}

/// Per-request context of a callable endpoint.
///
/// Extraction never fails: a missing, malformed or unverifiable bearer token
/// leaves `auth` empty and handlers report `Unauthenticated` themselves.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub auth: Option<CallerIdentity>,
}

impl CallContext {
    pub fn authenticated(uid: &str) -> Self {
        Self {
            auth: Some(CallerIdentity {
                uid: uid.to_string(),
            }),
        }
    }
}

impl FromRequestParts<AppState> for CallContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(Authorization(bearer))) =
            parts.extract::<TypedHeader<Authorization<Bearer>>>().await
        else {
            return Ok(Self::default());
        };

        match verify_token(bearer.token(), &state.config) {
            Ok(claims) if !claims.sub.is_empty() => Ok(Self::authenticated(&claims.sub)),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                debug!("Rejected identity token: {}", e);
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_lower_case() {
        let caller = CallerIdentity {
            uid: "AbC123".into(),
        };
        assert_eq!(caller.normalized(), "abc123");
        assert_eq!(caller.uid, "AbC123");
    }
}
