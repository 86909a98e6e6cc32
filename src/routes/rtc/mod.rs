mod handler;
mod model;

pub use handler::get_rtc_token;
pub use model::{RtcTokenRequest, RtcTokenResponse};
