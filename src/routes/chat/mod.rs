mod handler;
mod model;

pub use handler::generate_chat_token;
pub use model::ChatTokenResponse;
