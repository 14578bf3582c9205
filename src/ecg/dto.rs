use serde::{Deserialize, Serialize};

use crate::ecg::repo_types::EcgSample;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub data: Vec<EcgSample>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: String,
    #[serde(rename = "receivedData")]
    pub received_data: Vec<EcgSample>,
}

#[derive(Debug, Deserialize)]
pub struct SignalQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignalsResponse {
    pub message: String,
    pub data: Vec<EcgSample>,
}
