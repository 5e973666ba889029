use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::angle::{Protractor, Viewport};
use crate::check::{self, CheckOutcome};
use crate::config::Config;
use crate::feedback::{Cue, Silent, TerminalBell};
use crate::round;
use crate::runtime::pointer_event;
use crate::session::{Mode, Session};

/// Longest text the numeric field accepts ("180")
pub const MAX_INPUT_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Redraw,
    Quit,
}

/// Everything the terminal front end needs: the session plus the text field,
/// the last check outcome and where the dial was last drawn.
pub struct App {
    pub session: Session,
    pub input: String,
    pub outcome: Option<CheckOutcome>,
    /// Screen rectangle of the dial, updated on every draw
    pub viewport: Viewport,
    dial: Protractor,
    default_target: u16,
    cue: Box<dyn Cue>,
    rng: StdRng,
}

impl App {
    pub fn new(config: &Config, target: Option<String>) -> Self {
        let cue: Box<dyn Cue> = if config.sound {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(Silent)
        };
        Self::with_parts(config, target, cue, StdRng::from_entropy())
    }

    /// Builds an app with an explicit cue and random source
    pub fn with_parts(
        config: &Config,
        target: Option<String>,
        cue: Box<dyn Cue>,
        rng: StdRng,
    ) -> Self {
        let dial = Protractor::with_snap_unit(config.snap_unit);
        let input = match config.mode {
            Mode::Free => String::new(),
            Mode::Target => target.unwrap_or_else(|| config.default_target.to_string()),
        };
        let mut app = Self {
            session: Session::new(dial),
            input,
            outcome: None,
            viewport: Viewport::default(),
            dial,
            default_target: config.default_target,
            cue,
            rng,
        };
        app.start(config.mode);
        app
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    fn start(&mut self, mode: Mode) {
        self.outcome = None;
        self.session = match mode {
            Mode::Free => {
                self.input.clear();
                round::start_free(self.dial)
            }
            Mode::Target => round::start_round(self.dial, &self.input, &mut self.rng),
        };
        if let Some(target) = self.session.target {
            self.input = target.value().to_string();
        }
    }

    /// Starts a fresh round in the current mode
    pub fn restart(&mut self) {
        self.start(self.mode());
    }

    /// Switches mode and starts a fresh round. Entering target mode seeds the
    /// field with the configured default target, not the last guess.
    pub fn toggle_mode(&mut self) {
        let next = self.mode().toggled();
        info!("switching to {} mode", next);
        if next == Mode::Target {
            self.input = self.default_target.to_string();
        }
        self.start(next);
    }

    pub fn check(&mut self) -> CheckOutcome {
        let outcome = check::check(&self.session, &self.input);
        self.cue.play(&outcome);
        self.outcome = Some(outcome);
        outcome
    }

    fn edit_input(&mut self, c: char) {
        if self.input.len() < MAX_INPUT_LEN {
            self.input.push(c);
        }
        self.input = check::clamp_input(&self.input);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => AppAction::Quit,
            KeyCode::Char('c') if ctrl => AppAction::Quit,
            KeyCode::Char('n') if ctrl => {
                self.restart();
                AppAction::Redraw
            }
            KeyCode::Right => {
                self.restart();
                AppAction::Redraw
            }
            KeyCode::Tab => {
                self.toggle_mode();
                AppAction::Redraw
            }
            KeyCode::Enter => {
                self.check();
                AppAction::Redraw
            }
            KeyCode::Backspace => {
                self.input.pop();
                AppAction::Redraw
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.edit_input(c);
                AppAction::Redraw
            }
            _ => AppAction::Continue,
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        match pointer_event(&mouse, &self.viewport) {
            Some(event) if self.session.handle_pointer(event) => AppAction::Redraw,
            _ => AppAction::Continue,
        }
    }
}
