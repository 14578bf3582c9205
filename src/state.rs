use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::ecg::repo::{PgSignalStore, SignalStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub signals: Arc<dyn SignalStore>,
}

impl AppState {
    /// Postgres-backed state. The pool is owned by the caller, which closes it
    /// on shutdown.
    pub fn from_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self {
            config,
            users: Arc::new(PgUserStore::new(db.clone())),
            signals: Arc::new(PgSignalStore::new(db)),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::DatabaseConfig;
        use crate::memory::{MemorySignalStore, MemoryUserStore};
        use std::time::Duration;

        let config = Arc::new(AppConfig {
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                user: "test".into(),
                password: "test".into(),
                name: "test".into(),
                max_connections: 1,
            },
            cors_origin: None,
            host: "127.0.0.1".into(),
            port: 0,
            signal_window: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
        });

        Self {
            config,
            users: Arc::new(MemoryUserStore::default()),
            signals: Arc::new(MemorySignalStore::default()),
        }
    }
}
