//! Backend client - talks to the root-cause classification service
//!
//! The service is opaque: three JSON endpoints plus a liveness route.
//! `TriageBackend` is the seam the analyze workflow depends on, so tests
//! can substitute an in-memory fake for `HttpBackend`.

use crate::config::BackendConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use triage_shared::prediction::{
    ErrorBody, FeedbackRecord, PredictRequest, PredictionResult, PreprocessRequest,
    PreprocessResponse,
};

pub const PREPROCESS_PATH: &str = "/preprocess_logs";
pub const PREDICT_PATH: &str = "/predict";
pub const FEEDBACK_PATH: &str = "/feedback";
pub const HEALTH_PATH: &str = "/";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Cannot reach backend at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl BackendError {
    /// Error message supplied by the backend itself, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Unreachable { .. })
    }
}

/// Operations the dashboard needs from the classification service
#[async_trait]
pub trait TriageBackend: Send + Sync {
    /// Normalize raw log text into a description
    async fn preprocess_logs(&self, logs: &str) -> Result<String, BackendError>;

    /// Predict root cause and summary for a description
    async fn predict(&self, description: &str) -> Result<PredictionResult, BackendError>;

    /// Send a corrected label for a prediction
    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), BackendError>;

    /// Check that the service answers at all
    async fn ping(&self) -> Result<(), BackendError>;
}

/// HTTP implementation of `TriageBackend`
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::with_timeout(
            &config.base_url,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(BackendError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body, returning the raw body of a 2xx response
    async fn post(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<String, BackendError> {
        let url = self.url(path);
        debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Unreachable {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|source| BackendError::Unreachable {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.error);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    async fn post_json<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<R, BackendError> {
        let text = self.post(path, body).await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Decode {
            url: self.url(path),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl TriageBackend for HttpBackend {
    async fn preprocess_logs(&self, logs: &str) -> Result<String, BackendError> {
        let request = PreprocessRequest {
            logs: logs.to_string(),
        };
        let response: PreprocessResponse = self.post_json(PREPROCESS_PATH, &request).await?;
        Ok(response.processed_logs)
    }

    async fn predict(&self, description: &str) -> Result<PredictionResult, BackendError> {
        let request = PredictRequest {
            description: description.to_string(),
        };
        self.post_json(PREDICT_PATH, &request).await
    }

    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), BackendError> {
        // Any 2xx body counts as success
        self.post(FEEDBACK_PATH, record).await.map(|_| ())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let url = self.url(HEALTH_PATH);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| BackendError::Unreachable {
                url: url.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(BackendError::Status {
                status: resp.status().as_u16(),
                message: None,
            });
        }
        Ok(())
    }
}
