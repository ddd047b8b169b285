use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::Registrar;
use super::RegistrationError;
use crate::domain::SubscriberEmail;

/// Inserts the address straight into the `subscribers` table.
///
/// `PgPool` is used over `PgConnection` as the former has a `Mutex`
/// 'built-in', so a single registrar can be shared by every worker.
pub struct PgRegistrar {
    pool: PgPool,
}

impl PgRegistrar {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl Registrar for PgRegistrar {
    /// Registering an address twice is not an error; the second insert is a
    /// no-op.
    #[tracing::instrument(name = "INSERTing new subscriber into db", skip(self, email))]
    async fn register(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), RegistrationError> {
        // `query` rather than `query!`: the latter needs a live db (or
        // `.sqlx` metadata) at compile time
        sqlx::query(
            r#"
            INSERT INTO subscribers (id, email, subscribed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("bad query: {e:?}");
            e
        })?;
        Ok(())
    }
}
