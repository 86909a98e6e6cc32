use async_trait::async_trait;
use sqlx::PgPool;

/// Read access to application user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether a user record exists for `user_id`, matched exactly.
    async fn exists(&self, user_id: &str) -> Result<bool, sqlx::Error>;
}

/// `users` table in Postgres.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists(&self, user_id: &str) -> Result<bool, sqlx::Error> {
        tracing::debug!("Looking up user: {}", user_id);

        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }
}
