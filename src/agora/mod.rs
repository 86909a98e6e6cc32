// Agora platform integration: token signing and the user administration API.

pub mod access_token;
pub mod builder;
pub mod rest;
pub mod signer;

pub use access_token::{AccessToken, SigningError};
pub use builder::{ChatTokenBuilder, RtcRole, RtcTokenBuilder};
pub use rest::{AgoraClient, AgoraError, ProvisionOutcome, UsersEndpoint};
pub use signer::{AgoraSigner, TokenSigner};
