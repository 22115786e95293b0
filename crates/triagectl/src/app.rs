//! Application state and message dispatch
//!
//! Every change to what the user sees goes through `AppState::update`.
//! Network work is returned as an `Effect`; the runtime executes it and
//! feeds the outcome back as `AnalysisFinished` / `FeedbackFinished`.

use crate::analyze::{
    Analysis, AnalysisRequest, AnalyzeError, AnalyzeWorkflow, ANALYZE_FAILED_NOTICE,
};
use crate::attachment::AttachedFile;
use crate::backend::BackendError;
use crate::config::TriageConfig;
use crate::dashboard::DashboardView;
use crate::prefs::{Preferences, KEY_PAGE, KEY_SEARCH_TERM, KEY_STATUS_FILTER};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use triage_shared::{FeedbackRecord, StatusFilter, TicketStore};

/// Top-level pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Dashboard,
    Analyze,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Dashboard, Page::Analyze];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Analyze => "Analyze",
        }
    }

    pub fn next(&self) -> Page {
        match self {
            Page::Dashboard => Page::Analyze,
            Page::Analyze => Page::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line message shown under the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Everything that can happen to the application
#[derive(Debug)]
pub enum Message {
    Navigate(Page),
    NextPage,

    // Dashboard
    SearchChanged(String),
    StatusFilterChanged(StatusFilter),
    CycleStatusFilter,

    // Analyze form
    TitleChanged(String),
    DescriptionChanged(String),
    AttachFile(PathBuf),
    RemoveFile,
    Submit,
    TrueLabelChanged(String),
    SubmitFeedback,

    DismissNotice,
    /// Clock tick from the event loop
    Tick(Instant),
    Quit,

    // Completions
    AnalysisFinished(Result<Analysis, AnalyzeError>),
    FeedbackFinished(Result<(), BackendError>),
}

/// Network work requested by `update`
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Analyze(AnalysisRequest),
    SendFeedback(FeedbackRecord),
}

/// Root application state
pub struct AppState {
    page: Page,
    store: TicketStore,
    dashboard: DashboardView,
    analyze: AnalyzeWorkflow,
    notice: Option<Notice>,
    prefs: Option<Preferences>,
    should_quit: bool,
}

impl AppState {
    /// Build state from config, restoring cached preferences when present
    pub fn new(config: &TriageConfig, store: TicketStore, prefs: Option<Preferences>) -> Self {
        let (page, search_term, status_filter) = match &prefs {
            Some(p) => (
                p.load(KEY_PAGE, Page::default()),
                p.load(KEY_SEARCH_TERM, String::new()),
                p.load(KEY_STATUS_FILTER, config.dashboard.default_status_filter),
            ),
            None => (
                Page::default(),
                String::new(),
                config.dashboard.default_status_filter,
            ),
        };

        Self {
            page,
            store,
            dashboard: DashboardView::new(
                search_term,
                status_filter,
                Duration::from_millis(config.dashboard.search_debounce_ms),
            ),
            analyze: AnalyzeWorkflow::new(config.analyze.max_upload_mb),
            notice: None,
            prefs,
            should_quit: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    pub fn dashboard(&self) -> &DashboardView {
        &self.dashboard
    }

    pub fn analyze(&self) -> &AnalyzeWorkflow {
        &self.analyze
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one message, returning network work to run, if any
    pub fn update(&mut self, msg: Message) -> Option<Effect> {
        match msg {
            Message::Navigate(page) => self.set_page(page),
            Message::NextPage => self.set_page(self.page.next()),

            Message::SearchChanged(text) => {
                self.dashboard.set_search_input(text, Instant::now());
            }
            Message::StatusFilterChanged(filter) => {
                self.dashboard.set_status_filter(filter);
                self.save_pref(KEY_STATUS_FILTER, &filter);
            }
            Message::CycleStatusFilter => {
                let filter = self.dashboard.cycle_status_filter();
                self.save_pref(KEY_STATUS_FILTER, &filter);
            }

            Message::TitleChanged(title) => self.analyze.set_title(title),
            Message::DescriptionChanged(text) => self.analyze.set_description(text),
            Message::AttachFile(path) => self.attach_file(path),
            Message::RemoveFile => self.analyze.remove_file(),
            Message::TrueLabelChanged(label) => self.analyze.set_true_label(label),

            Message::Submit => {
                let request = self.analyze.begin_submit()?;
                self.notice = None;
                info!(title = %request.title, has_file = request.file.is_some(), "Submitting analysis");
                return Some(Effect::Analyze(request));
            }
            Message::SubmitFeedback => {
                let record = self.analyze.begin_feedback()?;
                self.notice = None;
                return Some(Effect::SendFeedback(record));
            }

            Message::AnalysisFinished(outcome) => self.finish_analysis(outcome),
            Message::FeedbackFinished(outcome) => {
                self.notice = Some(match self.analyze.finish_feedback(outcome) {
                    Ok(text) => Notice::info(text),
                    Err(text) => {
                        warn!(notice = %text, "Feedback not accepted");
                        Notice::error(text)
                    }
                });
            }

            Message::DismissNotice => self.notice = None,
            Message::Tick(now) => {
                if self.dashboard.tick(now) {
                    let term = self.dashboard.search_term().to_string();
                    self.save_pref(KEY_SEARCH_TERM, &term);
                }
            }
            Message::Quit => {
                if self.dashboard.flush_search() {
                    let term = self.dashboard.search_term().to_string();
                    self.save_pref(KEY_SEARCH_TERM, &term);
                }
                self.should_quit = true;
            }
        }
        None
    }

    fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.save_pref(KEY_PAGE, &page);
        }
    }

    fn attach_file(&mut self, path: PathBuf) {
        let result = AttachedFile::inspect(&path)
            .map_err(|source| AnalyzeError::FileUnavailable { path, source })
            .and_then(|file| self.analyze.attach_file(file));

        self.notice = match result {
            Ok(()) => None,
            Err(e) => Some(Notice::error(e.to_string())),
        };
    }

    fn finish_analysis(&mut self, outcome: Result<Analysis, AnalyzeError>) {
        let new_ticket = match self.analyze.finish_submit(outcome) {
            Ok(analysis) => analysis.new_ticket(),
            Err(e) => {
                error!(error = %e, "Analysis failed");
                self.notice = Some(Notice::error(ANALYZE_FAILED_NOTICE));
                return;
            }
        };

        let today = chrono::Local::now().date_naive();
        match self.store.append(new_ticket, today) {
            Ok(ticket) => info!(id = ticket.id(), category = ticket.category(), "Ticket recorded"),
            Err(e) => warn!(error = %e, "Analyzed ticket not recorded"),
        }
    }

    fn save_pref<T: Serialize>(&self, key: &str, value: &T) {
        if let Some(prefs) = &self.prefs {
            prefs.save(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{AnalyzePhase, FEEDBACK_THANKS_NOTICE};
    use chrono::Local;
    use triage_shared::{PredictionResult, TicketStatus};

    fn state() -> AppState {
        AppState::new(
            &TriageConfig::default(),
            TicketStore::seeded().unwrap(),
            None,
        )
    }

    fn analysis() -> Analysis {
        Analysis {
            title: "DB down".to_string(),
            description: "timeout errors".to_string(),
            result: PredictionResult {
                root_cause: "Database".to_string(),
                summary: "Connection pool exhausted".to_string(),
                similar_cases: Vec::new(),
            },
            analyzed_at: Local::now().naive_local(),
        }
    }

    fn fill_form(app: &mut AppState) {
        app.update(Message::TitleChanged("DB down".to_string()));
        app.update(Message::DescriptionChanged("timeout errors".to_string()));
    }

    #[test]
    fn test_navigation() {
        let mut app = state();
        assert_eq!(app.page(), Page::Dashboard);
        app.update(Message::NextPage);
        assert_eq!(app.page(), Page::Analyze);
        app.update(Message::Navigate(Page::Dashboard));
        assert_eq!(app.page(), Page::Dashboard);
    }

    #[test]
    fn test_submit_emits_analyze_effect() {
        let mut app = state();
        fill_form(&mut app);

        let effect = app.update(Message::Submit);
        match effect {
            Some(Effect::Analyze(request)) => {
                assert_eq!(request.title, "DB down");
                assert_eq!(request.description.as_deref(), Some("timeout errors"));
            }
            other => panic!("expected analyze effect, got {:?}", other),
        }
        assert!(app.update(Message::Submit).is_none());
    }

    #[test]
    fn test_empty_form_submits_nothing() {
        let mut app = state();
        assert!(app.update(Message::Submit).is_none());
        assert_eq!(app.analyze().phase(), AnalyzePhase::Idle);
    }

    #[test]
    fn test_successful_analysis_appends_ticket() {
        let mut app = state();
        fill_form(&mut app);
        app.update(Message::Submit);
        app.update(Message::AnalysisFinished(Ok(analysis())));

        assert_eq!(app.analyze().phase(), AnalyzePhase::ResultDisplayed);
        assert_eq!(app.store().len(), 6);
        let ticket = &app.store().tickets()[5];
        assert_eq!(ticket.title(), "DB down");
        assert_eq!(ticket.status(), TicketStatus::Open);
        assert_eq!(ticket.category(), "Database");
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_failed_analysis_shows_notice() {
        let mut app = state();
        fill_form(&mut app);
        app.update(Message::Submit);
        app.update(Message::AnalysisFinished(Err(AnalyzeError::Backend(
            BackendError::Status {
                status: 500,
                message: None,
            },
        ))));

        assert_eq!(app.analyze().phase(), AnalyzePhase::Idle);
        assert_eq!(app.store().len(), 5);
        assert_eq!(app.notice(), Some(&Notice::error(ANALYZE_FAILED_NOTICE)));
        assert!(app.analyze().form().title.is_empty());

        app.update(Message::DismissNotice);
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_feedback_round_trip() {
        let mut app = state();
        fill_form(&mut app);
        app.update(Message::Submit);
        app.update(Message::AnalysisFinished(Ok(analysis())));

        assert!(app.update(Message::SubmitFeedback).is_none());

        app.update(Message::TrueLabelChanged("Network".to_string()));
        let effect = app.update(Message::SubmitFeedback);
        assert_eq!(
            effect,
            Some(Effect::SendFeedback(FeedbackRecord {
                description: "timeout errors".to_string(),
                predicted: "Database".to_string(),
                true_label: "Network".to_string(),
            }))
        );

        app.update(Message::FeedbackFinished(Ok(())));
        assert_eq!(app.notice(), Some(&Notice::info(FEEDBACK_THANKS_NOTICE)));
        assert_eq!(app.analyze().phase(), AnalyzePhase::FeedbackSubmitted);
    }

    #[test]
    fn test_attach_missing_file_reports_error() {
        let mut app = state();
        app.update(Message::AttachFile(PathBuf::from("/nonexistent/app.log")));
        assert_eq!(app.notice().map(|n| n.kind), Some(NoticeKind::Error));
        assert!(app.analyze().form().file.is_none());
    }

    #[test]
    fn test_attach_unsupported_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot.png");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let mut app = state();
        app.update(Message::AttachFile(path));
        let notice = app.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, triage_shared::upload::UNSUPPORTED_TYPE_ERROR);
    }

    #[test]
    fn test_search_applies_on_tick() {
        let mut app = state();
        app.update(Message::SearchChanged("zzz-no-match".to_string()));
        assert_eq!(app.dashboard().search_term(), "");

        app.update(Message::Tick(Instant::now() + Duration::from_secs(1)));
        assert_eq!(app.dashboard().search_term(), "zzz-no-match");
        assert!(app.dashboard().visible(app.store().tickets()).is_empty());
    }

    #[test]
    fn test_preferences_restored() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("prefs.json"));

        let mut app = AppState::new(
            &TriageConfig::default(),
            TicketStore::seeded().unwrap(),
            Some(prefs.clone()),
        );
        app.update(Message::CycleStatusFilter);
        app.update(Message::SearchChanged("login".to_string()));
        app.update(Message::Navigate(Page::Analyze));
        app.update(Message::Quit);
        assert!(app.should_quit());

        let restored =
            AppState::new(&TriageConfig::default(), TicketStore::seeded().unwrap(), Some(prefs));
        assert_eq!(restored.page(), Page::Analyze);
        assert_eq!(restored.dashboard().search_term(), "login");
        assert_eq!(
            restored.dashboard().status_filter(),
            StatusFilter::Only(TicketStatus::Open)
        );
    }
}
