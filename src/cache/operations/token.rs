use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::agora::{SigningError, TokenSigner};
use crate::cache::models::token::CachedToken;

/// Lifetime of a minted app token.
pub const APP_TOKEN_TTL_SECS: u32 = 3600;
/// A cached app token is replaced once this little validity is left.
pub const APP_TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// Source of the application-level token used for admin API calls.
pub trait TokenCache: Send + Sync {
    /// Returns the cached token, minting a new one when it is missing or
    /// about to expire at `now` (epoch seconds).
    fn get_or_refresh(&self, now: i64) -> Result<String, SigningError>;
}

/// Single-slot app token cache.
pub struct AppTokenCache {
    signer: Arc<dyn TokenSigner>,
    slot: Mutex<Option<CachedToken>>,
}

impl AppTokenCache {
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            signer,
            slot: Mutex::new(None),
        }
    }

    /// Current cache entry, if any.
    pub fn cached(&self) -> Option<CachedToken> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenCache for AppTokenCache {
    fn get_or_refresh(&self, now: i64) -> Result<String, SigningError> {
        // Held across check and mint so concurrent callers share one token.
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = slot.as_ref() {
            if cached.is_fresh(now, APP_TOKEN_REFRESH_MARGIN_SECS) {
                return Ok(cached.token.clone());
            }
        }

        debug!("Minting new app token");
        let token = self.signer.app_token(APP_TOKEN_TTL_SECS)?;
        *slot = Some(CachedToken {
            token: token.clone(),
            expires_at: now + i64::from(APP_TOKEN_TTL_SECS),
        });

        Ok(token)
    }
}
