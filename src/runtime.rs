use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::angle::Viewport;
use crate::session::PointerEvent;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum ProtractorEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    /// The event source is gone; no further input will arrive
    Closed,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait ProtractorEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<ProtractorEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ProtractorEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => ProtractorEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => ProtractorEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => ProtractorEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("event reader stopped: {}", e);
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtractorEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ProtractorEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<ProtractorEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ProtractorEvent>) -> Self {
        Self { rx }
    }
}

impl ProtractorEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ProtractorEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: ProtractorEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: ProtractorEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, Tick on
    /// timeout, or Closed once the source has hung up
    pub fn step(&self) -> ProtractorEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => ProtractorEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => ProtractorEvent::Closed,
        }
    }
}

/// Translates a left-button mouse event into a pointer event in the dial's
/// logical space. Presses outside the viewport are dropped; moves and
/// releases are kept so a drag can leave the dial and still clamp.
pub fn pointer_event(mouse: &MouseEvent, viewport: &Viewport) -> Option<PointerEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let inside = mouse.column >= viewport.left
                && mouse.column < viewport.left.saturating_add(viewport.width)
                && mouse.row >= viewport.top
                && mouse.row < viewport.top.saturating_add(viewport.height);
            if !inside {
                return None;
            }
            viewport
                .to_logical(mouse.column, mouse.row)
                .map(PointerEvent::Press)
        }
        MouseEventKind::Drag(MouseButton::Left) => viewport
            .to_logical(mouse.column, mouse.row)
            .map(PointerEvent::Move),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Release),
        _ => None,
    }
}
