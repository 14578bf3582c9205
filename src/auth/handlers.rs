use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, UserIdResponse},
        services::{authenticate, generate_user_id, register_user},
    },
    error::{AppError, AppResult},
    extractors::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> AppResult<Json<UserIdResponse>> {
    let login = payload.login.trim();

    let user_id = register_user(state.users.as_ref(), login, &payload.password, generate_user_id)
        .await
        .inspect_err(|e| match e {
            AppError::DuplicateUser => warn!(login = %login, "login already registered"),
            other => warn!(error = %other, "registration failed"),
        })?;

    info!(user_id = %user_id, "user registered");
    Ok(Json(UserIdResponse {
        message: "User registered successfully".into(),
        user_id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> AppResult<Json<UserIdResponse>> {
    let login = payload.login.trim();

    let user_id = authenticate(state.users.as_ref(), login, &payload.password)
        .await
        .inspect_err(|e| warn!(error = %e, "login failed"))?;

    info!(user_id = %user_id, "user logged in");
    Ok(Json(UserIdResponse {
        message: "Login successful".into(),
        user_id,
    }))
}
