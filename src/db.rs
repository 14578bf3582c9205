use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Failures coming out of the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("no free user_id after {attempts} attempts")]
    IdAllocation { attempts: usize },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Database(e)
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let options = config.database.connect_options(config.request_timeout);
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.request_timeout)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id   CHAR(6) PRIMARY KEY,
        login     TEXT NOT NULL UNIQUE,
        pass_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ecg_data (
        id          BIGSERIAL PRIMARY KEY,
        user_id     CHAR(6) NOT NULL,
        ecg_signal  DOUBLE PRECISION NOT NULL,
        "timestamp" TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS ecg_data_user_time_idx
        ON ecg_data (user_id, "timestamp" DESC)
    "#,
];

/// Creates the two tables if they are missing. Safe to run on every start.
pub async fn bootstrap_schema(db: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(db)
            .await
            .context("bootstrap schema")?;
    }
    Ok(())
}
