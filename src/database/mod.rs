// User datastore access

pub mod operations;

pub use operations::user::{PgUserStore, UserStore};
