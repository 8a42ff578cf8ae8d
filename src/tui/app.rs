//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Session history and statistics refresh
//! - Background request workers and the periodic health probe

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::HttpApi;
use crate::application::{AssessmentService, SessionHistory};
use crate::domain::PredictionRecord;
use crate::ports::{ApiHealth, ModelInfo, PredictionApi};

use super::ui::{
    self,
    form::{render_form, FormState},
    history::{render_history, HistoryState},
    stats::{render_stats, StatsState},
};
use super::worker::{
    HealthMonitor, HealthMonitorHandle, ModelInfoWorker, PredictOutcome, PredictWorker,
    RequestHandle, StatsMessage, StatsWorker, HEALTH_PROBE_INTERVAL,
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Predict,
    History,
    Stats,
}

/// Main application state
pub struct App<A>
where
    A: PredictionApi + 'static,
{
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Assessment service shared with worker threads
    service: Arc<AssessmentService<A>>,

    /// Intake form state
    form: FormState,

    /// Session history of completed assessments (newest first)
    history: SessionHistory,

    /// History screen scroll state
    history_state: HistoryState,

    /// Statistics screen state
    stats: StatsState,

    /// Latest health probe outcome
    api_health: ApiHealth,

    /// Sequence number of the latest issued statistics fetch
    stats_seq: u64,

    /// Pending prediction request (if running)
    pending_predict: Option<RequestHandle<PredictOutcome>>,

    /// Pending statistics fetch (if running)
    pending_stats: Option<RequestHandle<StatsMessage>>,

    /// Pending one-time model metadata fetch (if running)
    pending_model_info: Option<RequestHandle<Option<ModelInfo>>>,

    /// Periodic health probe (stopped on teardown)
    health_monitor: Option<HealthMonitorHandle>,
}

impl App<HttpApi> {
    /// Create a new application instance against the configured service.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let api = HttpApi::from_env()?;
        Ok(Self::with_api(Arc::new(api)))
    }
}

impl<A> App<A>
where
    A: PredictionApi + 'static,
{
    /// Create the application with an injected API implementation
    /// (Composition Root pattern). Tests substitute stubs here.
    #[must_use]
    pub fn with_api(api: Arc<A>) -> Self {
        Self {
            screen: Screen::Predict,
            should_quit: false,
            service: Arc::new(AssessmentService::new(api)),
            form: FormState::default(),
            history: SessionHistory::new(),
            history_state: HistoryState::default(),
            stats: StatsState::default(),
            api_health: ApiHealth::Checking,
            stats_seq: 0,
            pending_predict: None,
            pending_stats: None,
            pending_model_info: None,
            health_monitor: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // One-time informational fetch plus the periodic liveness probe.
        self.pending_model_info = Some(ModelInfoWorker::spawn(self.service.clone()));
        self.health_monitor = Some(HealthMonitor::spawn(
            self.service.clone(),
            HEALTH_PROBE_INTERVAL,
        ));

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Teardown: the periodic probe must not outlive the session.
        if let Some(monitor) = self.health_monitor.take() {
            monitor.stop();
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Drain worker channels before drawing
            self.poll_workers();

            terminal.draw(|f| self.render(f))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title + nav
                Constraint::Min(0),    // Active screen
                Constraint::Length(3), // Disclaimer
            ])
            .split(f.area());

        ui::render_header(f, chunks[0], self.screen, self.api_health);

        match self.screen {
            Screen::Predict => render_form(f, chunks[1], &self.form),
            Screen::History => render_history(f, chunks[1], &self.history_state, &self.history),
            Screen::Stats => render_stats(f, chunks[1], &self.stats),
        }

        ui::render_disclaimer(f, chunks[2]);
    }

    /// Drain all worker channels and fold the results into UI state.
    fn poll_workers(&mut self) {
        // Health probe: whichever outcome settled last wins.
        if let Some(monitor) = &self.health_monitor {
            while let Some(status) = monitor.try_recv() {
                self.api_health = status;
            }
        }

        if let Some(message) = self.pending_model_info.as_ref().and_then(RequestHandle::try_recv) {
            self.pending_model_info = None;
            self.form.model_info = message;
        }

        if let Some(outcome) = self.pending_predict.as_ref().and_then(RequestHandle::try_recv) {
            self.pending_predict = None;
            self.form.submitting = false;
            match outcome {
                PredictOutcome::Complete(record) => {
                    self.form.error = None;
                    self.form.result = Some(record.clone());
                    self.record_prediction(record);
                }
                PredictOutcome::Error(message) => {
                    self.form.error = Some(message);
                }
            }
        }

        if let Some(message) = self.pending_stats.as_ref().and_then(RequestHandle::try_recv) {
            self.pending_stats = None;
            // Discard responses superseded by a newer request.
            if message.seq == self.stats_seq {
                self.stats.loading = false;
                match message.result {
                    Ok(report) => {
                        self.stats.report = Some(report);
                        self.stats.error = None;
                    }
                    Err(err) => {
                        self.stats.error = Some(err);
                    }
                }
            }
        }
    }

    /// A completed assessment: prepend it to the session history and
    /// refresh the aggregates.
    fn record_prediction(&mut self, record: PredictionRecord) {
        self.history.record(record);
        self.request_stats();
    }

    fn request_stats(&mut self) {
        self.stats_seq += 1;
        self.stats.loading = true;
        self.stats.error = None;
        self.pending_stats = Some(StatsWorker::spawn(self.service.clone(), self.stats_seq));
    }

    fn switch_to(&mut self, screen: Screen) {
        // Entering the statistics screen always refetches.
        if screen == Screen::Stats {
            self.request_stats();
        }
        self.screen = screen;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Predict => self.handle_form_key(key),
            Screen::History => self.handle_history_key(key),
            Screen::Stats => self.handle_stats_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle_left(),
            KeyCode::Right => self.form.cycle_right(),
            KeyCode::Char(' ') => self.form.toggle_selected(),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.switch_to(Screen::History),
            KeyCode::Char('a') | KeyCode::Char('A') => self.switch_to(Screen::Stats),
            KeyCode::Char('r') | KeyCode::Char('R') => self.form.reset(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.history_state.scroll_up(),
            KeyCode::Down => self.history_state.scroll_down(self.history.len()),
            KeyCode::Char('n') | KeyCode::Char('N') => self.switch_to(Screen::Predict),
            KeyCode::Char('a') | KeyCode::Char('A') => self.switch_to(Screen::Stats),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_stats(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.switch_to(Screen::Predict),
            KeyCode::Char('h') | KeyCode::Char('H') => self.switch_to(Screen::History),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        // Submission is disabled while a request is in flight.
        if self.form.submitting {
            return;
        }

        match self.form.to_patient_record() {
            Ok(patient) => {
                self.form.submitting = true;
                self.form.error = None;
                self.form.result = None;
                self.pending_predict = Some(PredictWorker::spawn(self.service.clone(), patient));
            }
            Err(message) => {
                self.form.error = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::domain::{PatientRecord, Prediction, RiskLevel};
    use crate::ports::{ApiError, StatsReport};

    struct StubApi {
        predict_response: std::result::Result<Prediction, ApiError>,
        predict_delay: Duration,
        predict_calls: AtomicUsize,
        stats_calls: AtomicUsize,
    }

    impl StubApi {
        fn with_prediction(prediction: Prediction) -> Self {
            Self {
                predict_response: Ok(prediction),
                predict_delay: Duration::ZERO,
                predict_calls: AtomicUsize::new(0),
                stats_calls: AtomicUsize::new(0),
            }
        }

        fn with_error(err: ApiError) -> Self {
            Self {
                predict_response: Err(err),
                predict_delay: Duration::ZERO,
                predict_calls: AtomicUsize::new(0),
                stats_calls: AtomicUsize::new(0),
            }
        }
    }

    impl PredictionApi for StubApi {
        fn health(&self) -> ApiHealth {
            ApiHealth::Healthy
        }

        fn model_info(&self) -> std::result::Result<ModelInfo, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }

        fn predict(&self, _patient: &PatientRecord) -> std::result::Result<Prediction, ApiError> {
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            if self.predict_delay > Duration::ZERO {
                thread::sleep(self.predict_delay);
            }
            self.predict_response.clone()
        }

        fn stats(&self) -> std::result::Result<StatsReport, ApiError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_str(r#"{"total_predictions": 0, "stats": {}}"#)
                .expect("stub stats should deserialize"))
        }
    }

    fn low_risk_prediction() -> Prediction {
        serde_json::from_value(serde_json::json!({
            "timestamp": "2026-08-06T14:02:11.123456",
            "stroke_probability": 0.125,
            "no_stroke_probability": 0.875,
            "risk_level": "Low",
            "confidence": 0.875
        }))
        .expect("stub prediction should deserialize")
    }

    fn settle_predict(app: &mut App<StubApi>) {
        for _ in 0..100 {
            app.poll_workers();
            if app.pending_predict.is_none() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("prediction request did not settle");
    }

    fn settle_stats(app: &mut App<StubApi>) {
        for _ in 0..100 {
            app.poll_workers();
            if app.pending_stats.is_none() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("statistics request did not settle");
    }

    #[test]
    fn test_successful_submission_updates_history_exactly_once() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api.clone());

        app.form.load_sample();
        app.submit_form();
        assert!(app.form.submitting, "submit must enter the loading state");

        settle_predict(&mut app);

        assert_eq!(app.history.len(), 1, "exactly one entry reported upward");
        assert_eq!(api.predict_calls.load(Ordering::SeqCst), 1);

        let result = app.form.result.as_ref().expect("result displayed inline");
        assert_eq!(result.prediction.risk_level, RiskLevel::Low);
        assert!(!app.form.submitting);

        // A completed prediction triggers a statistics refetch.
        settle_stats(&mut app);
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_submission_keeps_history_empty() {
        let api = Arc::new(StubApi::with_error(ApiError::Rejected {
            status: 400,
            message: "BMI out of range".to_string(),
        }));
        let mut app = App::with_api(api.clone());

        app.form.load_sample();
        app.submit_form();
        settle_predict(&mut app);

        assert_eq!(app.history.len(), 0, "no upward report on failure");
        assert_eq!(app.form.error.as_deref(), Some("BMI out of range"));
        assert!(app.form.result.is_none());
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_form_blocks_submission() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api.clone());

        app.submit_form();

        assert!(app.pending_predict.is_none(), "nothing must be sent");
        assert_eq!(api.predict_calls.load(Ordering::SeqCst), 0);
        assert!(!app.form.submitting);
        let error = app.form.error.as_deref().expect("validation message shown");
        assert!(error.contains("Age must be between 18 and 120"));
    }

    #[test]
    fn test_submit_is_ignored_while_in_flight() {
        let mut stub = StubApi::with_prediction(low_risk_prediction());
        stub.predict_delay = Duration::from_millis(100);
        let api = Arc::new(stub);
        let mut app = App::with_api(api.clone());

        app.form.load_sample();
        app.submit_form();
        app.submit_form();
        settle_predict(&mut app);

        assert_eq!(api.predict_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_entering_stats_screen_refetches() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api.clone());

        app.switch_to(Screen::Stats);
        assert_eq!(app.screen, Screen::Stats);
        assert!(app.stats.loading);

        settle_stats(&mut app);
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 1);
        assert!(app.stats.report.is_some());
        assert!(!app.stats.loading);
    }

    #[test]
    fn test_stats_requests_carry_increasing_sequence() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api);

        app.request_stats();
        let first = app.stats_seq;
        app.request_stats();
        assert_eq!(app.stats_seq, first + 1);
    }

    #[test]
    fn test_stale_stats_response_is_discarded() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api);

        // A response from a fetch that was superseded by a newer request.
        app.stats_seq = 2;
        app.stats.loading = true;
        app.pending_stats = Some(StatsWorker::spawn(app.service.clone(), 1));

        settle_stats(&mut app);

        assert!(app.stats.report.is_none(), "superseded response must not render");
        assert!(app.stats.loading, "still waiting for the latest request");
    }

    #[test]
    fn test_reset_clears_result_and_draft() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api);

        app.form.load_sample();
        app.submit_form();
        settle_predict(&mut app);
        assert!(app.form.result.is_some());

        app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);

        assert!(app.form.result.is_none());
        assert!(app.form.error.is_none());
        assert!(app.form.age.is_empty());
        assert!(app.form.glucose.is_empty());
        assert!(app.form.bmi.is_empty());
        assert!(!app.form.hypertension);
        assert!(!app.form.heart_disease);
    }

    #[test]
    fn test_ctrl_q_quits_globally() {
        let api = Arc::new(StubApi::with_prediction(low_risk_prediction()));
        let mut app = App::with_api(api);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
