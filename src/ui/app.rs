//! Main application state and logic

use crate::config::Config;
use crate::export::{Ack, Exporter, TransportFailure};
use crate::keyboard::{EventRecorder, KeyCode, KeyEventType, KeyInput};
use crate::metrics::{MetricsCalculator, MetricsResult};
use crate::report::SessionReport;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Capture,
    Events,
    Help,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capture => "Capture",
            Self::Events => "Keystrokes",
            Self::Help => "Help",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Capture, Self::Events, Self::Help]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Capture => 0,
            Self::Events => 1,
            Self::Help => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Capture,
            1 => Self::Events,
            _ => Self::Help,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Paused,
    Quitting,
}

type SubmissionResult = Result<Ack, TransportFailure>;

/// What the submission in flight carries
#[derive(Debug)]
struct InFlight {
    metrics: MetricsResult,
    /// Keystrokes covered by the payload
    events: usize,
    /// Text buffer at submit time
    text: String,
}

/// Keys that drive the app rather than type: shortcut chords, Esc, Tab
/// and the function keys
fn is_command_input(input: &KeyInput) -> bool {
    let key = input.key;
    key.is_chord_modifier()
        || key.is_function_key()
        || key == KeyCode::ESCAPE
        || key == KeyCode::TAB
        || (input.event_type == KeyEventType::Press && input.chord)
}

/// Main application
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Keystroke capture
    pub recorder: EventRecorder,
    /// Text typed so far
    pub text: String,
    /// Metrics sent by the last successful submission
    pub last_submitted: Option<MetricsResult>,
    /// Application start time
    pub start_time: Instant,
    /// Total raw inputs processed
    pub total_inputs: u64,
    exporter: Exporter,
    /// Outcome channel of the submission in flight
    pending: Option<mpsc::Receiver<SubmissionResult>>,
    in_flight: Option<InFlight>,
    status_message: Option<String>,
    status_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config, exporter: Exporter) -> Self {
        Self {
            view: AppView::Capture,
            state: AppState::Running,
            config,
            recorder: EventRecorder::new(),
            text: String::new(),
            last_submitted: None,
            start_time: Instant::now(),
            total_inputs: 0,
            exporter,
            pending: None,
            in_flight: None,
            status_message: None,
            status_time: None,
        }
    }

    /// App with the exporter selected by `config`
    pub fn from_config(config: Config) -> Self {
        let exporter = Exporter::from_config(&config.export);
        Self::new(config, exporter)
    }

    /// Feed a raw key signal to the recorder.
    ///
    /// Command keys are not typing and never enter the sequence. A release
    /// whose press was skipped is then a stray and the recorder drops it.
    pub fn process_input(&mut self, input: &KeyInput) {
        if self.state != AppState::Running {
            return;
        }

        self.total_inputs += 1;
        if is_command_input(input) {
            log::trace!("not recording command key {:?}", input.key);
            return;
        }
        self.recorder.process(input);
    }

    /// Append a character to the text buffer
    pub fn type_char(&mut self, ch: char) {
        if self.state == AppState::Running {
            self.text.push(ch);
        }
    }

    /// Remove the last character from the text buffer
    pub fn backspace(&mut self) {
        if self.state == AppState::Running {
            self.text.pop();
        }
    }

    /// Characters currently in the text buffer
    pub fn typed_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Metrics over everything recorded so far
    pub fn metrics(&self) -> MetricsResult {
        MetricsCalculator::compute(self.recorder.events(), self.typed_chars())
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Start submitting the current metrics in the background.
    ///
    /// Returns `false` when nothing was started: no keystrokes yet, or a
    /// submission is already in flight. Capture continues while the
    /// submission runs; collect its outcome with [`App::poll_submission`].
    pub fn submit(&mut self) -> bool {
        if self.recorder.is_empty() {
            self.set_status("No keystroke data to save!".to_string());
            return false;
        }
        if self.is_submitting() {
            self.set_status("Submission already in progress".to_string());
            return false;
        }

        let metrics = self.metrics();
        if metrics.is_sufficient() {
            self.set_status(format!("Submitting to {}...", self.exporter.destination()));
        } else {
            self.set_status("Not enough keystroke data, submitting anyway...".to_string());
        }

        let (tx, rx) = mpsc::channel();
        let exporter = self.exporter.clone();
        let payload = metrics.clone();
        thread::spawn(move || {
            let _ = tx.send(exporter.submit(&payload));
        });

        self.pending = Some(rx);
        self.in_flight = Some(InFlight {
            metrics,
            events: self.recorder.len(),
            text: self.text.clone(),
        });
        true
    }

    /// Collect the outcome of the submission in flight, if it has finished
    pub fn poll_submission(&mut self) -> Option<SubmissionResult> {
        let outcome = match self.pending.as_ref()?.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(TransportFailure::Network(
                "submission worker stopped".to_string(),
            )),
        };
        Some(self.complete_submission(outcome))
    }

    /// Wait up to `timeout` for the submission in flight to finish
    pub fn finish_submission(&mut self, timeout: Duration) -> Option<SubmissionResult> {
        let outcome = match self.pending.as_ref()?.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => return None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(TransportFailure::Network(
                "submission worker stopped".to_string(),
            )),
        };
        Some(self.complete_submission(outcome))
    }

    fn complete_submission(&mut self, outcome: SubmissionResult) -> SubmissionResult {
        self.pending = None;
        let sent = self.in_flight.take();

        match &outcome {
            Ok(ack) => {
                let detail = ack.message.as_deref().unwrap_or("saved");
                self.set_status(format!("Metrics submitted ({}): {}", ack.status, detail));
                if let Some(sent) = sent {
                    if self.config.export.clear_after_submit {
                        self.clear_submitted(&sent);
                    }
                    self.last_submitted = Some(sent.metrics);
                }
            }
            Err(e) => {
                // keystrokes stay so the user can retry
                self.set_status(format!("Submission failed: {}", e));
            }
        }
        outcome
    }

    /// Drop what `sent` covered; input typed since then stays for the next
    /// submission
    fn clear_submitted(&mut self, sent: &InFlight) {
        self.recorder.discard_front(sent.events);
        // edits reaching into the submitted text leave nothing to keep apart
        let rest = self
            .text
            .strip_prefix(sent.text.as_str())
            .unwrap_or_default()
            .to_string();
        self.text = rest;
    }

    /// Switch to the next view
    pub fn next_view(&mut self) {
        let next = (self.view.index() + 1) % AppView::all().len();
        self.view = AppView::from_index(next);
    }

    /// Switch to the previous view
    pub fn prev_view(&mut self) {
        let current = self.view.index();
        let prev = if current == 0 {
            AppView::all().len() - 1
        } else {
            current - 1
        };
        self.view = AppView::from_index(prev);
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            AppState::Running => {
                self.set_status("Paused".to_string());
                AppState::Paused
            }
            AppState::Paused => {
                self.set_status("Resumed".to_string());
                AppState::Running
            }
            AppState::Quitting => AppState::Quitting,
        };
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Clear keystrokes and text
    pub fn reset(&mut self) {
        self.recorder.reset();
        self.text.clear();
        self.total_inputs = 0;
        // the submission in flight no longer covers anything on screen
        if let Some(sent) = self.in_flight.as_mut() {
            sent.events = 0;
            sent.text.clear();
        }
        self.set_status("Keystrokes cleared".to_string());
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still within the configured display time
    pub fn get_status(&self) -> Option<&str> {
        let ttl = self.config.ui.status_duration_secs;
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < ttl => Some(msg),
            _ => None,
        }
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Generate a session report
    pub fn generate_report(&self) -> SessionReport {
        SessionReport::new(
            self.start_time.elapsed().as_secs_f64(),
            self.recorder.events(),
            self.metrics(),
            self.typed_chars(),
        )
    }

    /// Export session report to JSON file
    pub fn export_report(&mut self, path: &Path) -> Result<String, std::io::Error> {
        self.generate_report().export_json(path)?;
        let msg = format!("Exported to {}", path.display());
        self.set_status(msg.clone());
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportKind;
    use crate::testing::{press_at, release_at};

    fn file_app(name: &str) -> (App, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "keystroke-dynamics-app-{}-{}",
            name,
            std::process::id()
        ));
        let mut config = Config::default();
        config.export.transport = TransportKind::File;
        config.export.outbox_dir = Some(dir.clone());
        (App::from_config(config), dir)
    }

    fn type_word(app: &mut App, word: &str, start_ms: u64) {
        for (i, ch) in word.chars().enumerate() {
            let t = start_ms + i as u64 * 100;
            app.process_input(&press_at(ch, t));
            app.process_input(&release_at(ch, t + 60));
            app.type_char(ch);
        }
    }

    #[test]
    fn view_cycling_wraps() {
        let (mut app, _) = file_app("views");
        assert_eq!(app.view, AppView::Capture);
        app.prev_view();
        assert_eq!(app.view, AppView::Help);
        app.next_view();
        assert_eq!(app.view, AppView::Capture);
        app.next_view();
        assert_eq!(app.view, AppView::Events);
    }

    #[test]
    fn paused_app_ignores_input() {
        let (mut app, _) = file_app("pause");
        app.toggle_pause();
        type_word(&mut app, "hi", 0);

        assert!(app.recorder.is_empty());
        assert!(app.text.is_empty());
        assert_eq!(app.total_inputs, 0);
    }

    #[test]
    fn metrics_use_text_length() {
        let (mut app, _) = file_app("metrics");
        type_word(&mut app, "as", 0);
        // backspace produces a keystroke but removes a character
        app.process_input(&KeyInput::press(crate::keyboard::KeyCode(14), None, 200));
        app.process_input(&KeyInput::release(crate::keyboard::KeyCode(14), 240));
        app.backspace();

        assert_eq!(app.recorder.len(), 3);
        assert_eq!(app.typed_chars(), 1);
        let m = app.metrics();
        // 0.2 words over 0.24 s
        assert!((m.wpm - 50.0).abs() < 1e-9);
    }

    #[test]
    fn submit_without_keystrokes_is_refused() {
        let (mut app, _) = file_app("empty");
        assert!(!app.submit());
        assert!(!app.is_submitting());
        assert_eq!(app.get_status(), Some("No keystroke data to save!"));
    }

    #[test]
    fn successful_submission_clears_session() {
        let (mut app, dir) = file_app("success");
        type_word(&mut app, "dog", 0);
        let expected = app.metrics();

        assert!(app.submit());
        assert!(!app.submit(), "second submit while in flight");

        let ack = app
            .finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert_eq!(ack.status, 201);
        assert!(app.recorder.is_empty());
        assert!(app.text.is_empty());
        assert_eq!(app.last_submitted, Some(expected));
        assert!(!app.is_submitting());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn capture_continues_during_submission() {
        let (mut app, dir) = file_app("concurrent");
        app.config.export.clear_after_submit = false;
        type_word(&mut app, "ab", 0);
        app.submit();
        type_word(&mut app, "c", 500);

        app.finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert_eq!(app.recorder.len(), 3);
        assert_eq!(app.text, "abc");
        // the payload was snapshotted before "c"
        assert_eq!(app.last_submitted.as_ref().map(|m| m.wpm > 0.0), Some(true));
        assert_ne!(app.last_submitted, Some(app.metrics()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn input_typed_during_submission_survives_clear() {
        let (mut app, dir) = file_app("in-flight");
        type_word(&mut app, "ab", 0);
        app.submit();
        type_word(&mut app, "c", 500);

        app.finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert_eq!(app.recorder.len(), 1);
        assert_eq!(app.recorder.events()[0].logical, Some('c'));
        assert_eq!(app.text, "c");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn backspace_into_submitted_text_clears_buffer() {
        let (mut app, dir) = file_app("in-flight-edit");
        type_word(&mut app, "ab", 0);
        app.submit();
        app.backspace();
        app.backspace();
        app.type_char('x');

        app.finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert!(app.text.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reset_during_submission_keeps_new_input() {
        let (mut app, dir) = file_app("in-flight-reset");
        type_word(&mut app, "ab", 0);
        app.submit();
        app.reset();
        type_word(&mut app, "cd", 500);

        app.finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert_eq!(app.recorder.len(), 2);
        assert_eq!(app.text, "cd");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_shortcut_is_not_recorded() {
        let (mut app, dir) = file_app("shortcut");
        app.config.export.clear_after_submit = false;
        type_word(&mut app, "dog", 0);
        let before = app.metrics();

        // Ctrl+S: the chord's S press carries the chord flag
        let ctrl = KeyCode(29);
        app.process_input(&KeyInput::press(ctrl, None, 600));
        app.process_input(&press_at('s', 620).in_chord());
        assert_eq!(app.metrics(), before);
        assert!(app.submit());
        app.process_input(&release_at('s', 680));
        app.process_input(&KeyInput::release(ctrl, 700));

        app.finish_submission(Duration::from_secs(5))
            .expect("submission finished")
            .expect("submission succeeded");
        assert_eq!(app.last_submitted, Some(before.clone()));
        assert_eq!(app.recorder.len(), 3);
        assert_eq!(app.metrics().avg_flight_time, before.avg_flight_time);
        assert_eq!(app.metrics().h_score, before.h_score);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn navigation_keys_are_not_recorded() {
        let (mut app, _) = file_app("navigation");
        for code in [KeyCode::ESCAPE, KeyCode::TAB, KeyCode(59)] {
            app.process_input(&KeyInput::press(code, None, 0));
            app.process_input(&KeyInput::release(code, 30));
        }
        assert!(app.recorder.is_empty());
        assert_eq!(app.total_inputs, 6);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut app, _) = file_app("reset");
        type_word(&mut app, "xyz", 0);
        app.reset();

        assert!(app.recorder.is_empty());
        assert!(app.text.is_empty());
        assert_eq!(app.total_inputs, 0);
        assert_eq!(app.metrics(), MetricsResult::default());
    }

    #[test]
    fn report_contains_keystrokes() {
        let (mut app, _) = file_app("report");
        type_word(&mut app, "ok", 0);

        let report = app.generate_report();
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.metadata.typed_chars, 2);
    }
}
