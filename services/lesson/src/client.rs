//! HTTP submission of opinions to the lesson API.

use async_trait::async_trait;
use lesson_core::{
    OpinionSubmission,
    lesson::{OpinionSubmitter, SubmitError},
};
use serde::Deserialize;
use tracing::{debug, instrument};

const PROCESS_OPINION_PATH: &str = "/api/process-opinion";

/// Posts opinions to `<server>/api/process-opinion`.
///
/// A single attempt per submission; the learner retries from the opinion stage.
pub struct HttpOpinionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpOpinionClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}{}", server.trim_end_matches('/'), PROCESS_OPINION_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OpinionSubmitter for HttpOpinionClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, language = %submission.language))]
    async fn submit(&self, submission: &OpinionSubmission) -> Result<String, SubmitError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        debug!(status, bytes = body.len(), "Received submission response");

        interpret_response(status, body)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Maps an HTTP response to the payload handed to the feedback stage, or to a
/// displayable error.
pub fn interpret_response(status: u16, body: String) -> Result<String, SubmitError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Request failed with status {status}"));
    Err(SubmitError::Rejected { status, message })
}
