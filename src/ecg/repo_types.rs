use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// One ECG reading. Also the wire shape: `{ecg_signal, timestamp}` with an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EcgSample {
    pub ecg_signal: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime, // caller-supplied, not server time
}
