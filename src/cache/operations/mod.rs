pub mod token;

pub use token::{APP_TOKEN_REFRESH_MARGIN_SECS, APP_TOKEN_TTL_SECS, AppTokenCache, TokenCache};
