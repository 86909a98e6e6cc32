mod auth;
mod error_handler;
mod guard;
mod rate_limit;

pub use auth::{CallContext, CallerIdentity};
pub use error_handler::log_errors;
pub use guard::{GuardError, authorize, ensure_registered};
pub use rate_limit::{RateLimiter, client_ip, rate_limit};
