use std::sync::Arc;

use agora::{AgoraClient, TokenSigner};
use cache::TokenCache;
use config::Config;
use database::UserStore;

pub mod agora;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub signer: Arc<dyn TokenSigner>,
    pub app_tokens: Arc<dyn TokenCache>,
    pub agora: AgoraClient,
}
