//! Wire types exchanged with the classification backend.

use serde::{Deserialize, Serialize};

/// Body of `POST /preprocess_logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessRequest {
    pub logs: String,
}

/// Response of `POST /preprocess_logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessResponse {
    pub processed_logs: String,
}

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub description: String,
}

/// Response of `POST /predict`
///
/// `root_cause` and `summary` must be present; their contents are shown
/// verbatim. `similar_cases` is opaque and may be omitted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub root_cause: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_cases: Vec<serde_json::Value>,
}

/// Body of `POST /feedback`; sent once, never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub description: String,
    pub predicted: String,
    pub true_label: String,
}

/// Error body the backend may attach to a non-2xx response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
