pub mod chat;
pub mod health;
pub mod provision;
pub mod rtc;

/// Lifetime of user and RTC tokens, in seconds.
pub const TOKEN_TTL_SECS: u32 = 3600;
