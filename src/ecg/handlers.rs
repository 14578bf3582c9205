use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    ecg::{
        dto::{IngestRequest, IngestResponse, SignalQuery, SignalsResponse},
        services::{ingest, recent_samples},
    },
    error::AppResult,
    extractors::{ApiJson, ApiQuery},
    state::AppState,
};

pub fn ecg_routes() -> Router<AppState> {
    Router::new().route("/api/ecg-data", get(list_recent).post(ingest_batch))
}

#[instrument(skip(state, payload))]
pub async fn ingest_batch(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<IngestRequest>,
) -> AppResult<Json<IngestResponse>> {
    let user_id = payload.user_id.as_deref();
    let received_data = ingest(state.signals.as_ref(), user_id, payload.data).await?;

    info!(
        user_id = user_id.unwrap_or_default(),
        count = received_data.len(),
        "ecg batch received"
    );
    Ok(Json(IngestResponse {
        message: "Data received successfully!".into(),
        received_data,
    }))
}

#[instrument(skip(state))]
pub async fn list_recent(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SignalQuery>,
) -> AppResult<Json<SignalsResponse>> {
    let data = recent_samples(
        state.signals.as_ref(),
        query.user_id.as_deref(),
        OffsetDateTime::now_utc(),
        state.config.signal_window,
    )
    .await?;

    Ok(Json(SignalsResponse {
        message: "Data retrieved successfully".into(),
        data,
    }))
}
