use crate::config::Config;
use crate::difficulty::DifficultyLevel;
use crate::error::Result;
use crate::puzzle::PuzzleGenerator;
use crate::session::Session;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

pub const EXPORT_FILE_NAME: &str = "math_session_report.csv";
const MAX_ANSWER_LEN: usize = 12;
const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Drill,
    Summary,
}

/// What the caller of [`App::on_key`] should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    /// A session just started with the setup form's name and level.
    SessionStarted,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    pub user_name: String,
    pub difficulty: DifficultyLevel,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub setup: SetupForm,
    pub session: Option<Session>,
    pub answer_input: String,
    pub question_started: Option<Instant>,
    pub export_status: Option<String>,
    recent_window: usize,
    export_dir: PathBuf,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::Setup,
            setup: SetupForm {
                user_name: config.user_name.clone(),
                difficulty: config.start_difficulty,
                error: None,
            },
            session: None,
            answer_input: String::new(),
            question_started: None,
            export_status: None,
            recent_window: config.recent_window,
            export_dir: config.export_dir(),
        }
    }

    pub fn export_dir(&self) -> &PathBuf {
        &self.export_dir
    }

    /// Seconds since the current puzzle was shown.
    pub fn elapsed_secs(&self) -> f64 {
        self.question_started
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.state {
            AppState::Setup => self.on_setup_key(key),
            AppState::Drill => self.on_drill_key(key),
            AppState::Summary => self.on_summary_key(key),
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter => return self.start_session(),
            KeyCode::Right | KeyCode::Tab => {
                self.setup.difficulty = self.setup.difficulty.next_wrapping()
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.setup.difficulty = self.setup.difficulty.prev_wrapping()
            }
            KeyCode::Backspace => {
                self.setup.user_name.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.setup.user_name.chars().count() < MAX_NAME_LEN {
                    self.setup.user_name.push(c);
                    self.setup.error = None;
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn on_drill_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => self.end_session(),
            KeyCode::Enter => {
                let elapsed = self.elapsed_secs();
                self.submit(elapsed);
            }
            KeyCode::Backspace => {
                self.answer_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '+' => {
                if self.answer_input.len() < MAX_ANSWER_LEN {
                    self.answer_input.push(c);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn on_summary_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') => {
                self.state = AppState::Setup;
                self.export_status = None;
            }
            KeyCode::Char('e') => {
                self.export_status = Some(match self.export_csv() {
                    Ok(Some(path)) => format!("Saved {}", path.display()),
                    Ok(None) => "Nothing to export yet".to_string(),
                    Err(err) => {
                        tracing::warn!(%err, "csv export failed");
                        format!("Export failed: {err}")
                    }
                });
            }
            _ => {}
        }
        AppAction::Continue
    }

    /// Start a fresh session from the setup form. An empty name is refused.
    pub fn start_session(&mut self) -> AppAction {
        let name = self.setup.user_name.trim();
        if name.is_empty() {
            self.setup.error = Some("Please enter a name.".to_string());
            return AppAction::Continue;
        }

        let session = Session::new(name, self.setup.difficulty, PuzzleGenerator::from_entropy())
            .with_recent_window(self.recent_window);
        self.session = Some(session);
        self.setup.error = None;
        self.answer_input.clear();
        self.export_status = None;
        self.state = AppState::Drill;
        self.show_next_puzzle();
        AppAction::SessionStarted
    }

    /// Make sure a puzzle is pending and its stopwatch running.
    pub fn show_next_puzzle(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.has_pending_puzzle() || self.question_started.is_none() {
                session.current_puzzle();
                self.question_started = Some(Instant::now());
            }
        }
    }

    /// Submit the typed answer as taking `time_taken` seconds.
    ///
    /// Input that is not a number is left in place and nothing is recorded.
    pub fn submit(&mut self, time_taken: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.submit_answer(&self.answer_input, time_taken).is_none() {
            return;
        }
        self.answer_input.clear();
        self.question_started = None;
        self.show_next_puzzle();
    }

    pub fn end_session(&mut self) {
        if let Some(session) = self.session.as_ref() {
            let metrics = session.tracker().metrics();
            tracing::info!(
                user = session.user_name(),
                total = metrics.total_attempts,
                accuracy = metrics.accuracy_percent,
                avg_time = metrics.average_response_time,
                "session ended"
            );
        }
        self.question_started = None;
        self.answer_input.clear();
        self.state = AppState::Summary;
    }

    /// Write the session report into the export directory.
    ///
    /// Returns `Ok(None)` when there is nothing to export.
    pub fn export_csv(&self) -> Result<Option<PathBuf>> {
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };
        if session.tracker().is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join(EXPORT_FILE_NAME);
        let file = File::create(&path)?;
        session.tracker().write_csv(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), rows = session.tracker().len(), "session exported");
        Ok(Some(path))
    }

    /// Config reflecting the last started session, for saving.
    pub fn updated_config(&self, base: &Config) -> Config {
        Config {
            user_name: self.setup.user_name.trim().to_string(),
            start_difficulty: self.setup.difficulty,
            ..base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn test_app() -> App {
        App::new(&Config::default())
    }

    fn started_app() -> App {
        let mut app = test_app();
        type_text(&mut app, "ada");
        assert_eq!(app.on_key(key(KeyCode::Enter)), AppAction::SessionStarted);
        app
    }

    fn pending_answer(app: &App) -> i64 {
        app.session
            .as_ref()
            .and_then(|s| s.peek_puzzle())
            .map(|p| p.answer())
            .unwrap()
    }

    #[test]
    fn configured_name_prefills_setup_without_starting() {
        let cfg = Config {
            user_name: "ada".into(),
            start_difficulty: DifficultyLevel::Medium,
            ..Config::default()
        };
        let mut app = App::new(&cfg);
        assert_eq!(app.state, AppState::Setup);
        assert_eq!(app.setup.user_name, "ada");
        assert_eq!(app.setup.difficulty, DifficultyLevel::Medium);
        assert!(app.session.is_none());

        assert_eq!(app.on_key(key(KeyCode::Enter)), AppAction::SessionStarted);
        assert_eq!(app.state, AppState::Drill);
    }

    #[test]
    fn setup_requires_a_name() {
        let mut app = test_app();
        assert_eq!(app.on_key(key(KeyCode::Enter)), AppAction::Continue);
        assert_eq!(app.state, AppState::Setup);
        assert_eq!(app.setup.error.as_deref(), Some("Please enter a name."));

        type_text(&mut app, "   ");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Setup);
    }

    #[test]
    fn setup_cycles_difficulty() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.setup.difficulty, DifficultyLevel::Medium);
        app.on_key(key(KeyCode::Left));
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.setup.difficulty, DifficultyLevel::Hard);
    }

    #[test]
    fn starting_shows_a_puzzle_at_chosen_level() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "ada");
        app.on_key(key(KeyCode::Enter));

        assert_eq!(app.state, AppState::Drill);
        assert!(app.question_started.is_some());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.user_name(), "ada");
        assert_eq!(
            session.peek_puzzle().map(|p| p.difficulty()),
            Some(DifficultyLevel::Medium)
        );
    }

    #[test]
    fn drill_accepts_only_numeric_keys() {
        let mut app = started_app();
        type_text(&mut app, "1a2-b");
        assert_eq!(app.answer_input, "12-");
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.answer_input, "12");
    }

    #[test]
    fn unparsable_input_is_not_submitted() {
        let mut app = started_app();
        type_text(&mut app, "--");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.answer_input, "--");
        assert!(app.session.as_ref().unwrap().tracker().is_empty());
    }

    #[test]
    fn submitting_logs_and_moves_on() {
        let mut app = started_app();
        let answer = pending_answer(&app);
        type_text(&mut app, &answer.to_string());
        app.submit(1.25);

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.tracker().len(), 1);
        assert!(session.tracker().attempts()[0].correct);
        assert_eq!(session.tracker().attempts()[0].time_taken, 1.25);
        assert!(session.has_pending_puzzle());
        assert!(app.answer_input.is_empty());
        assert!(app.question_started.is_some());
    }

    #[test]
    fn escape_ends_session_and_new_returns_to_setup() {
        let mut app = started_app();
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Summary);
        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Setup);
        assert_eq!(app.setup.user_name, "ada");
        assert_eq!(app.on_key(key(KeyCode::Esc)), AppAction::Quit);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = started_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c), AppAction::Quit);
    }

    #[test]
    fn export_writes_report() {
        let dir = tempdir().unwrap();
        let config = Config {
            export_dir: Some(dir.path().join("out")),
            ..Config::default()
        };
        let mut app = App::new(&config);
        type_text(&mut app, "ada");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.export_csv().unwrap(), None);

        let answer = pending_answer(&app);
        type_text(&mut app, &answer.to_string());
        app.submit(2.0);
        app.on_key(key(KeyCode::Esc));
        app.on_key(key(KeyCode::Char('e')));

        let path = dir.path().join("out").join(EXPORT_FILE_NAME);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Question Index,Difficulty"));
        assert!(contents.contains("1,Easy,True,2.00,100.0,2.00"));
        assert!(app.export_status.unwrap().starts_with("Saved"));
    }

    #[test]
    fn updated_config_keeps_other_fields() {
        let base = Config {
            recent_window: 7,
            ..Config::default()
        };
        let mut app = App::new(&base);
        type_text(&mut app, " ada ");
        app.on_key(key(KeyCode::Right));
        let cfg = app.updated_config(&base);
        assert_eq!(cfg.user_name, "ada");
        assert_eq!(cfg.start_difficulty, DifficultyLevel::Medium);
        assert_eq!(cfg.recent_window, 7);
    }
}
