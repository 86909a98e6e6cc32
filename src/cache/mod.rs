// In-process caches

pub mod models;
pub mod operations;

pub use models::CachedToken;
pub use operations::{AppTokenCache, TokenCache};
