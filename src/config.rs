use std::fmt;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Longest accepted retrieval window (7 days).
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Connection options for the pool. `statement_timeout` bounds every query
    /// server-side so an abandoned request cannot pin a connection.
    pub fn connect_options(&self, statement_timeout: Duration) -> PgConnectOptions {
        let timeout_ms = statement_timeout.as_millis().to_string();
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .options([("statement_timeout", timeout_ms.as_str())])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cors_origin: Option<String>,
    pub host: String,
    pub port: u16,
    pub signal_window: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: required("DB_USER")?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: required("DB_NAME")?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        let window_secs: u64 = parse_or(&lookup, "ECG_WINDOW_SECS", 300)?;
        anyhow::ensure!(
            (1..=MAX_WINDOW_SECS).contains(&window_secs),
            "ECG_WINDOW_SECS must be between 1 and {MAX_WINDOW_SECS}"
        );
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;
        anyhow::ensure!(timeout_secs > 0, "REQUEST_TIMEOUT_SECS must be positive");

        Ok(Self {
            database,
            cors_origin: lookup("CORS_ORIGIN").filter(|v| !v.trim().is_empty()),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 3000)?,
            signal_window: Duration::from_secs(window_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_defaults_with_required_keys() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("DB_USER", "ecg"), ("DB_NAME", "ecgdb")]))
            .expect("config loads");
        assert_eq!(cfg.database.host, "localhost");
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.database.password, "");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.signal_window, Duration::from_secs(300));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(cfg.cors_origin.is_none());
    }

    #[test]
    fn reads_every_recognized_option() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "ecg"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "ecgdb"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("CORS_ORIGIN", "http://localhost:5173"),
            ("APP_HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("ECG_WINDOW_SECS", "15"),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .expect("config loads");
        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.port, 6543);
        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.signal_window, Duration::from_secs(15));
        assert_eq!(cfg.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("DB_USER", "ecg")])).unwrap_err();
        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn malformed_number_names_the_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DB_USER", "ecg"),
            ("DB_NAME", "ecgdb"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn oversized_window_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DB_USER", "ecg"),
            ("DB_NAME", "ecgdb"),
            ("ECG_WINDOW_SECS", "1000000000000"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ECG_WINDOW_SECS"));

        let max = MAX_WINDOW_SECS.to_string();
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DB_USER", "ecg"),
            ("DB_NAME", "ecgdb"),
            ("ECG_WINDOW_SECS", max.as_str()),
        ]))
        .expect("upper bound is inclusive");
        assert_eq!(cfg.signal_window, Duration::from_secs(MAX_WINDOW_SECS));
    }

    #[test]
    fn debug_output_hides_db_password() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DB_USER", "ecg"),
            ("DB_NAME", "ecgdb"),
            ("DB_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DB_USER", "ecg"),
            ("DB_NAME", "ecgdb"),
            ("ECG_WINDOW_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ECG_WINDOW_SECS"));
    }
}
