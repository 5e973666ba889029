use std::io::{self, Write};

use crate::check::CheckOutcome;

const BELL: &[u8] = b"\x07";

/// Audible cue played after a check. Implementations swallow playback
/// failures; a missing cue never surfaces as an error.
pub trait Cue {
    fn play(&mut self, outcome: &CheckOutcome);
}

/// Rings the terminal bell: twice on success, once otherwise
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, times: usize) -> io::Result<()> {
        for _ in 0..times {
            self.out.write_all(BELL)?;
        }
        self.out.flush()
    }
}

impl<W: Write> Cue for TerminalBell<W> {
    fn play(&mut self, outcome: &CheckOutcome) {
        let times = if outcome.is_correct() { 2 } else { 1 };
        if let Err(e) = self.ring(times) {
            log::debug!("bell failed: {}", e);
        }
    }
}

pub struct Silent;

impl Cue for Silent {
    fn play(&mut self, _outcome: &CheckOutcome) {}
}
