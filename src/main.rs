use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use sumdrill::{
    app::{App, AppAction, AppState},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, DrillEvent, FixedTicker, Runner},
    DifficultyLevel,
};

/// adaptive arithmetic drill tui
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Timed arithmetic drills that step between Easy, Medium and Hard based on your last three answers, with a per-session summary and CSV export."
)]
pub struct Cli {
    /// name to start the session with (remembered for next time)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// difficulty to start at
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<DifficultyLevel>,

    /// number of recent answers handed to the difficulty rule (minimum 3)
    #[clap(long)]
    window: Option<usize>,

    /// directory the session csv is exported to
    #[clap(long)]
    export_dir: Option<PathBuf>,

    /// log filter written to the log file, e.g. "debug" (defaults to RUST_LOG, then info)
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Overlay command line values on the stored config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(name) = &self.name {
            config.user_name = name.clone();
        }
        if let Some(difficulty) = self.difficulty {
            config.start_difficulty = difficulty;
        }
        if let Some(window) = self.window {
            config.recent_window = window;
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = Some(dir.clone());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = AppDirs::log_path();
    if let Err(err) = logging::init(cli.log_level.as_deref(), &log_path) {
        eprintln!("logging disabled: {err}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sumdrill starting");

    let store = FileConfigStore::new();
    let stored = store.load();
    let mut app = App::new(&cli.apply(stored.clone()));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &store, &stored);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("sumdrill exiting");
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &impl ConfigStore,
    stored: &Config,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            DrillEvent::Tick => {
                // only the stopwatch moves on its own
                if app.state == AppState::Drill {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            DrillEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            DrillEvent::Key(key) => {
                match app.on_key(key) {
                    AppAction::Quit => break,
                    AppAction::SessionStarted => {
                        if let Err(err) = store.save(&app.updated_config(stored)) {
                            tracing::warn!(%err, "could not save config");
                        }
                    }
                    AppAction::Continue => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
