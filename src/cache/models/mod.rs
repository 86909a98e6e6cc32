pub mod token;

pub use token::CachedToken;
