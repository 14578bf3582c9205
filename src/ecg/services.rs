use std::time::Duration;

use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::debug;

use crate::auth::services::is_valid_user_id;
use crate::ecg::repo::SignalStore;
use crate::ecg::repo_types::EcgSample;
use crate::error::{AppError, AppResult};

fn require_user_id(user_id: Option<&str>) -> AppResult<&str> {
    match user_id.map(str::trim) {
        Some(id) if is_valid_user_id(id) => Ok(id),
        Some(id) if !id.is_empty() => Err(AppError::invalid(
            "user_id must be a 6-character uppercase hex code",
        )),
        _ => Err(AppError::invalid("user_id is required")),
    }
}

/// Start of the trailing retrieval window. Saturates at the earliest
/// representable instant instead of overflowing.
pub fn window_start(now: OffsetDateTime, window: Duration) -> OffsetDateTime {
    time::Duration::try_from(window)
        .ok()
        .and_then(|w| now.checked_sub(w))
        .unwrap_or_else(|| PrimitiveDateTime::MIN.assume_utc())
}

/// Validates and stores a batch, echoing it back on success.
///
/// The batch is written in one transaction: on failure nothing is kept.
pub async fn ingest(
    signals: &dyn SignalStore,
    user_id: Option<&str>,
    samples: Vec<EcgSample>,
) -> AppResult<Vec<EcgSample>> {
    let user_id = require_user_id(user_id)?;
    if samples.is_empty() {
        return Err(AppError::invalid("data must be a non-empty array"));
    }

    signals.insert_batch(user_id, &samples).await?;
    debug!(user_id = %user_id, count = samples.len(), "ecg batch stored");
    Ok(samples)
}

/// Samples for `user_id` no older than `window` before `now`, newest first.
/// An empty result is a success.
pub async fn recent_samples(
    signals: &dyn SignalStore,
    user_id: Option<&str>,
    now: OffsetDateTime,
    window: Duration,
) -> AppResult<Vec<EcgSample>> {
    let user_id = require_user_id(user_id)?;
    let cutoff = window_start(now, window);
    let samples = signals.list_since(user_id, cutoff).await?;
    debug!(user_id = %user_id, %cutoff, count = samples.len(), "ecg samples fetched");
    Ok(samples)
}
