use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use env_logger::{Env, Target};
use log::{info, warn};
use protractor::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, ProtractorEvent, Runner},
    session::Mode,
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// drag the markers of a half-circle protractor to read or hit an angle
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal protractor. In free mode both markers move and you type the angle between them; in target mode one marker is fixed and you drag the other until the angle matches the target."
)]
pub struct Cli {
    /// free: read the angle, target: drag to a target angle
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// target angle for the first target round (0-180, snapped to the scale)
    #[clap(short = 't', long)]
    target: Option<String>,

    /// disable the terminal bell after checking an answer
    #[clap(long)]
    no_sound: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,

    /// use this config file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Config file settings with command line overrides applied
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.no_sound {
            config.sound = false;
        }
        if self.target.is_some() && self.mode.is_none() {
            config.mode = Mode::Target;
        }
        config
    }

    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Logs go to a file since the terminal is taken over by the UI
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = cli.store();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, cli.target.clone());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!("exiting on error: {}", e);
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let action = match runner.step() {
            ProtractorEvent::Key(key) => app.on_key(key),
            ProtractorEvent::Mouse(mouse) => app.on_mouse(mouse),
            ProtractorEvent::Resize => AppAction::Redraw,
            ProtractorEvent::Tick => AppAction::Continue,
            ProtractorEvent::Closed => {
                return Err("terminal event stream closed".into());
            }
        };

        match action {
            AppAction::Quit => break,
            AppAction::Redraw => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppAction::Continue => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["protractor"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.target, None);
        assert!(!cli.no_sound);
        assert!(!cli.save_config);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_cli_mode() {
        let cli = Cli::parse_from(["protractor", "-m", "target"]);
        assert_eq!(cli.mode, Some(Mode::Target));

        let cli = Cli::parse_from(["protractor", "--mode", "free"]);
        assert_eq!(cli.mode, Some(Mode::Free));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["protractor", "--mode", "spin"]).is_err());
    }

    #[test]
    fn test_cli_target_keeps_raw_text() {
        let cli = Cli::parse_from(["protractor", "-t", "45"]);
        assert_eq!(cli.target, Some("45".to_string()));

        let cli = Cli::parse_from(["protractor", "--target", "abc"]);
        assert_eq!(cli.target, Some("abc".to_string()));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["protractor", "--no-sound", "-m", "target"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.mode, Mode::Target);
        assert!(!config.sound);
    }

    #[test]
    fn test_cli_target_implies_target_mode() {
        let cli = Cli::parse_from(["protractor", "-t", "120"]);
        assert_eq!(cli.apply(Config::default()).mode, Mode::Target);

        let cli = Cli::parse_from(["protractor", "-t", "120", "-m", "free"]);
        assert_eq!(cli.apply(Config::default()).mode, Mode::Free);
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let stored = Config {
            mode: Mode::Target,
            default_target: 30,
            snap_unit: 15,
            sound: false,
        };
        let cli = Cli::parse_from(["protractor"]);
        assert_eq!(cli.apply(stored.clone()), stored);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["protractor", "--config", "/tmp/p.json"]);
        assert_eq!(cli.store().path(), std::path::Path::new("/tmp/p.json"));
    }
}
