use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::StoreError;
use crate::ecg::repo_types::EcgSample;

#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Persists the whole batch or nothing.
    async fn insert_batch(&self, user_id: &str, samples: &[EcgSample]) -> Result<(), StoreError>;

    /// Samples for `user_id` with `timestamp >= cutoff`, newest first.
    async fn list_since(
        &self,
        user_id: &str,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<EcgSample>, StoreError>;
}

#[derive(Clone)]
pub struct PgSignalStore {
    db: PgPool,
}

impl PgSignalStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SignalStore for PgSignalStore {
    async fn insert_batch(&self, user_id: &str, samples: &[EcgSample]) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;
        for sample in samples {
            sqlx::query(
                r#"
                INSERT INTO ecg_data (user_id, ecg_signal, "timestamp")
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(user_id)
            .bind(sample.ecg_signal)
            .bind(sample.timestamp)
            .execute(&mut *tx)
            .await?;
        }
        // Dropping `tx` on an early return rolls the batch back.
        tx.commit().await?;
        Ok(())
    }

    async fn list_since(
        &self,
        user_id: &str,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<EcgSample>, StoreError> {
        let rows = sqlx::query_as::<_, EcgSample>(
            r#"
            SELECT ecg_signal, "timestamp"
              FROM ecg_data
             WHERE user_id = $1 AND "timestamp" >= $2
             ORDER BY "timestamp" DESC
            "#,
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
