use serde::{Deserialize, Serialize};

/// Request body for both registration and login. Missing fields deserialize
/// to empty strings so the handler can answer with a specific message.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after register or login. Carries the public code only.
#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub message: String,
    pub user_id: String,
}
