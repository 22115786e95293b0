//! Analyze workflow - submit an incident for root-cause prediction
//!
//! Phases: Idle -> Submitting -> ResultDisplayed -> FeedbackSubmitted.
//!
//! The workflow owns the form and the current result. Network work is
//! done by `run_analysis` / `TriageBackend::submit_feedback`; the
//! workflow only hands out requests (`begin_*`) and absorbs their
//! outcomes (`finish_*`), so it never holds a borrow across an await.

use crate::attachment::AttachedFile;
use crate::backend::{BackendError, TriageBackend};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};
use triage_shared::upload::FILE_UPLOAD_TITLE_PREFIX;
use triage_shared::{validate_file, FeedbackRecord, NewTicket, PredictionResult};

/// Notice shown for any failure while analyzing
pub const ANALYZE_FAILED_NOTICE: &str = "Failed to analyze the ticket. Please try again.";

/// Notice shown when feedback was rejected without a message
pub const FEEDBACK_REJECTED_NOTICE: &str = "Failed to submit feedback.";

/// Notice shown when feedback could not be delivered
pub const FEEDBACK_FAILED_NOTICE: &str = "Failed to submit feedback. Please try again.";

/// Notice shown after feedback was accepted
pub const FEEDBACK_THANKS_NOTICE: &str = "Thank you! Your feedback has been submitted.";

#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// File failed type or size validation
    #[error("{0}")]
    FileRejected(String),

    #[error("Cannot attach {path}: {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to analyze: enter a description or attach a file")]
    NothingToAnalyze,

    #[error("Backend request failed: {0}")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for AnalyzeError {
    fn from(e: BackendError) -> Self {
        AnalyzeError::Backend(e)
    }
}

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzePhase {
    Idle,
    Submitting,
    ResultDisplayed,
    FeedbackSubmitted,
}

/// Form fields on the analyze page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeForm {
    pub title: String,
    pub description: String,
    pub file: Option<AttachedFile>,
}

impl AnalyzeForm {
    /// Title present and either a description or a file
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
            && (!self.description.trim().is_empty() || self.file.is_some())
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot of the form handed to `run_analysis`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub title: String,
    /// Manual description; `None` means derive it from the file
    pub description: Option<String>,
    pub file: Option<AttachedFile>,
}

/// A completed analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub title: String,
    /// Description actually sent to `/predict`
    pub description: String,
    pub result: PredictionResult,
    pub analyzed_at: NaiveDateTime,
}

impl Analysis {
    /// Ticket fields for recording this analysis on the dashboard
    pub fn new_ticket(&self) -> NewTicket {
        NewTicket::from_analysis(&self.title, &self.description, &self.result.root_cause)
    }
}

/// Analyze page state machine
#[derive(Debug, Clone)]
pub struct AnalyzeWorkflow {
    form: AnalyzeForm,
    phase: AnalyzePhase,
    analysis: Option<Analysis>,
    true_label: String,
    feedback_in_flight: bool,
    max_upload_mb: u64,
}

impl AnalyzeWorkflow {
    pub fn new(max_upload_mb: u64) -> Self {
        Self {
            form: AnalyzeForm::default(),
            phase: AnalyzePhase::Idle,
            analysis: None,
            true_label: String::new(),
            feedback_in_flight: false,
            max_upload_mb,
        }
    }

    pub fn form(&self) -> &AnalyzeForm {
        &self.form
    }

    pub fn phase(&self) -> AnalyzePhase {
        self.phase
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn true_label(&self) -> &str {
        &self.true_label
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    pub fn set_true_label(&mut self, label: impl Into<String>) {
        self.true_label = label.into();
    }

    /// Attach a file after validating it; a rejected file is not attached
    pub fn attach_file(&mut self, file: AttachedFile) -> Result<(), AnalyzeError> {
        let validation = validate_file(&file.meta, self.max_upload_mb);
        if !validation.valid {
            let reason = validation.error.unwrap_or_default();
            warn!(file = %file.name(), %reason, "Upload rejected");
            return Err(AnalyzeError::FileRejected(reason));
        }

        if self.form.title.trim().is_empty() {
            self.form.title = file.meta.suggested_title();
        }
        self.form.file = Some(file);
        Ok(())
    }

    /// Drop the attached file, and its generated title
    pub fn remove_file(&mut self) {
        self.form.file = None;
        if self.form.title.starts_with(FILE_UPLOAD_TITLE_PREFIX) {
            self.form.title.clear();
        }
    }

    /// Disabled while an analysis or a feedback submission is in flight
    pub fn can_submit(&self) -> bool {
        self.phase != AnalyzePhase::Submitting
            && !self.feedback_in_flight
            && self.form.is_submittable()
    }

    /// Start a submission; `None` when submission is disabled
    pub fn begin_submit(&mut self) -> Option<AnalysisRequest> {
        if !self.can_submit() {
            return None;
        }
        self.phase = AnalyzePhase::Submitting;

        let description = self.form.description.trim();
        Some(AnalysisRequest {
            title: self.form.title.trim().to_string(),
            description: (!description.is_empty()).then(|| self.form.description.clone()),
            file: self.form.file.clone(),
        })
    }

    /// Absorb the outcome of `run_analysis`
    ///
    /// The form is cleared either way. A failure discards any previous
    /// result and returns the workflow to `Idle`.
    pub fn finish_submit(
        &mut self,
        outcome: Result<Analysis, AnalyzeError>,
    ) -> Result<&Analysis, AnalyzeError> {
        self.form.clear();
        self.true_label.clear();
        self.feedback_in_flight = false;

        match outcome {
            Ok(analysis) => {
                self.phase = AnalyzePhase::ResultDisplayed;
                Ok(&*self.analysis.insert(analysis))
            }
            Err(e) => {
                self.phase = AnalyzePhase::Idle;
                self.analysis = None;
                Err(e)
            }
        }
    }

    /// Feedback is possible for a displayed result not yet fed back
    pub fn can_send_feedback(&self) -> bool {
        self.phase == AnalyzePhase::ResultDisplayed
            && self.analysis.is_some()
            && !self.feedback_in_flight
    }

    /// Build the feedback record; `None` when disabled or the label is blank
    ///
    /// The description sent is the one the prediction was made from, which
    /// for an uploaded file is the preprocessed text. The form itself has
    /// already been cleared by `finish_submit`.
    pub fn begin_feedback(&mut self) -> Option<FeedbackRecord> {
        if !self.can_send_feedback() {
            return None;
        }
        let label = self.true_label.trim();
        if label.is_empty() {
            return None;
        }
        let analysis = self.analysis.as_ref()?;

        self.feedback_in_flight = true;
        Some(FeedbackRecord {
            description: analysis.description.clone(),
            predicted: analysis.result.root_cause.clone(),
            true_label: label.to_string(),
        })
    }

    /// Absorb the feedback outcome, returning the notice to show
    pub fn finish_feedback(&mut self, outcome: Result<(), BackendError>) -> Result<&'static str, String> {
        self.feedback_in_flight = false;
        match outcome {
            Ok(()) => {
                if self.phase == AnalyzePhase::ResultDisplayed {
                    self.phase = AnalyzePhase::FeedbackSubmitted;
                }
                Ok(FEEDBACK_THANKS_NOTICE)
            }
            Err(e) => Err(feedback_failure_notice(&e)),
        }
    }
}

/// User-facing text for a failed feedback submission
pub fn feedback_failure_notice(err: &BackendError) -> String {
    match err {
        BackendError::Status { message, .. } => message
            .clone()
            .unwrap_or_else(|| FEEDBACK_REJECTED_NOTICE.to_string()),
        _ => FEEDBACK_FAILED_NOTICE.to_string(),
    }
}

/// Run one analysis: preprocess the file if needed, then predict
pub async fn run_analysis(
    backend: &dyn TriageBackend,
    request: AnalysisRequest,
) -> Result<Analysis, AnalyzeError> {
    let request_id = uuid::Uuid::new_v4();

    let description = match request.description {
        Some(text) => text,
        None => {
            let file = request.file.ok_or(AnalyzeError::NothingToAnalyze)?;
            let logs = file
                .read_text()
                .await
                .map_err(|source| AnalyzeError::FileRead {
                    path: file.path.clone(),
                    source,
                })?;
            info!(%request_id, file = %file.name(), bytes = logs.len(), "Preprocessing attached file");
            backend.preprocess_logs(&logs).await?
        }
    };

    let result = backend.predict(&description).await?;
    info!(
        %request_id,
        root_cause = %result.root_cause,
        similar_cases = result.similar_cases.len(),
        "Prediction result"
    );

    Ok(Analysis {
        title: request.title,
        description,
        result,
        analyzed_at: chrono::Local::now().naive_local(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_shared::UploadedFile;

    fn text_file(name: &str, size: u64) -> AttachedFile {
        AttachedFile {
            path: PathBuf::from(format!("/tmp/{}", name)),
            meta: UploadedFile::new(name, "text/plain", size),
        }
    }

    fn analysis(root_cause: &str) -> Analysis {
        Analysis {
            title: "DB down".to_string(),
            description: "timeout errors".to_string(),
            result: PredictionResult {
                root_cause: root_cause.to_string(),
                summary: "Connection pool exhausted".to_string(),
                similar_cases: Vec::new(),
            },
            analyzed_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn test_submit_requires_title_and_content() {
        let mut wf = AnalyzeWorkflow::new(10);
        assert!(!wf.can_submit());

        wf.set_description("timeout errors");
        assert!(!wf.can_submit());

        wf.set_title("DB down");
        assert!(wf.can_submit());

        wf.set_description("");
        assert!(!wf.can_submit());
        assert!(wf.begin_submit().is_none());
        assert_eq!(wf.phase(), AnalyzePhase::Idle);
    }

    #[test]
    fn test_file_alone_enables_submit_and_sets_title() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.attach_file(text_file("app.log", 10)).unwrap();

        assert_eq!(wf.form().title, "File Upload: app.log");
        assert!(wf.can_submit());

        let request = wf.begin_submit().unwrap();
        assert!(request.description.is_none());
        assert!(request.file.is_some());
    }

    #[test]
    fn test_attach_replaces_blank_title() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("   ");
        wf.attach_file(text_file("app.log", 10)).unwrap();
        assert_eq!(wf.form().title, "File Upload: app.log");
    }

    #[test]
    fn test_attach_keeps_existing_title() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("Checkout errors");
        wf.attach_file(text_file("app.log", 10)).unwrap();
        assert_eq!(wf.form().title, "Checkout errors");

        wf.remove_file();
        assert_eq!(wf.form().title, "Checkout errors");
    }

    #[test]
    fn test_remove_file_clears_generated_title() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.attach_file(text_file("app.log", 10)).unwrap();
        wf.remove_file();
        assert!(wf.form().file.is_none());
        assert!(wf.form().title.is_empty());
    }

    #[test]
    fn test_oversize_file_not_attached() {
        let mut wf = AnalyzeWorkflow::new(1);
        let err = wf.attach_file(text_file("big.txt", 2 * 1024 * 1024)).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 1MB limit.");
        assert!(wf.form().file.is_none());
        assert!(wf.form().title.is_empty());
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        assert!(wf.begin_submit().is_some());
        assert_eq!(wf.phase(), AnalyzePhase::Submitting);
        assert!(wf.begin_submit().is_none());
    }

    #[test]
    fn test_submit_waits_for_feedback() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();
        wf.finish_submit(Ok(analysis("Database"))).unwrap();
        wf.set_true_label("Network");
        wf.begin_feedback().unwrap();

        wf.set_title("API slow");
        wf.set_description("p99 latency");
        assert!(!wf.can_submit());
        assert!(wf.begin_submit().is_none());

        wf.finish_feedback(Ok(())).unwrap();
        assert_eq!(wf.phase(), AnalyzePhase::FeedbackSubmitted);
        assert!(wf.begin_submit().is_some());
    }

    #[test]
    fn test_feedback_outcome_never_leaves_submitting() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();

        assert_eq!(wf.finish_feedback(Ok(())), Ok(FEEDBACK_THANKS_NOTICE));
        assert_eq!(wf.phase(), AnalyzePhase::Submitting);
        assert!(wf.begin_submit().is_none());
    }

    #[test]
    fn test_finish_clears_form_on_success() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();

        let shown = wf.finish_submit(Ok(analysis("Database"))).unwrap();
        assert_eq!(shown.result.root_cause, "Database");
        assert_eq!(wf.phase(), AnalyzePhase::ResultDisplayed);
        assert_eq!(wf.form(), &AnalyzeForm::default());
    }

    #[test]
    fn test_finish_clears_form_on_failure() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.attach_file(text_file("app.log", 10)).unwrap();
        wf.begin_submit().unwrap();

        assert!(wf.finish_submit(Err(AnalyzeError::NothingToAnalyze)).is_err());
        assert_eq!(wf.phase(), AnalyzePhase::Idle);
        assert!(wf.analysis().is_none());
        assert_eq!(wf.form(), &AnalyzeForm::default());
    }

    #[test]
    fn test_blank_label_sends_nothing() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();
        wf.finish_submit(Ok(analysis("Database"))).unwrap();

        wf.set_true_label("   ");
        assert!(wf.begin_feedback().is_none());
        assert!(wf.can_send_feedback());
    }

    #[test]
    fn test_feedback_uses_sent_description() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();
        wf.finish_submit(Ok(analysis("Database"))).unwrap();

        wf.set_true_label(" Network ");
        let record = wf.begin_feedback().unwrap();
        assert_eq!(record.description, "timeout errors");
        assert_eq!(record.predicted, "Database");
        assert_eq!(record.true_label, "Network");

        // In flight: a second press does nothing
        assert!(wf.begin_feedback().is_none());

        assert_eq!(wf.finish_feedback(Ok(())), Ok(FEEDBACK_THANKS_NOTICE));
        assert_eq!(wf.phase(), AnalyzePhase::FeedbackSubmitted);
        assert!(!wf.can_send_feedback());
        assert!(wf.begin_feedback().is_none());
    }

    #[test]
    fn test_feedback_failure_keeps_result() {
        let mut wf = AnalyzeWorkflow::new(10);
        wf.set_title("DB down");
        wf.set_description("timeout errors");
        wf.begin_submit().unwrap();
        wf.finish_submit(Ok(analysis("Database"))).unwrap();
        wf.set_true_label("Network");
        wf.begin_feedback().unwrap();

        let notice = wf
            .finish_feedback(Err(BackendError::Status {
                status: 500,
                message: Some("Model update failed: boom".to_string()),
            }))
            .unwrap_err();
        assert_eq!(notice, "Model update failed: boom");
        assert_eq!(wf.phase(), AnalyzePhase::ResultDisplayed);
        assert!(wf.can_send_feedback());
    }

    #[test]
    fn test_feedback_notice_fallbacks() {
        let rejected = BackendError::Status {
            status: 400,
            message: None,
        };
        assert_eq!(feedback_failure_notice(&rejected), FEEDBACK_REJECTED_NOTICE);

        let undecodable = BackendError::Decode {
            url: "http://localhost:5001/feedback".to_string(),
            reason: "eof".to_string(),
        };
        assert_eq!(feedback_failure_notice(&undecodable), FEEDBACK_FAILED_NOTICE);
    }

    #[test]
    fn test_new_ticket_from_analysis() {
        let ticket = analysis("Database").new_ticket();
        assert_eq!(ticket.title, "DB down");
        assert_eq!(ticket.description, "timeout errors");
        assert_eq!(ticket.category, "Database");
    }
}
