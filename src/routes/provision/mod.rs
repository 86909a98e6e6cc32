mod handler;
mod model;

pub use handler::{add_agora_user, add_user};
pub use model::ProvisionResponse;
