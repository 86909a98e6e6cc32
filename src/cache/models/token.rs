use serde::{Deserialize, Serialize};

/// Cached application token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: i64, // Unix timestamp
}

impl CachedToken {
    /// Whether more than `margin_secs` of validity remain at `now`.
    pub fn is_fresh(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at > now + margin_secs
    }
}
