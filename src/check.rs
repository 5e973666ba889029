use std::fmt;

use log::info;

use crate::angle::{Degrees, MAX_DEGREES};
use crate::round::parse_degrees;
use crate::session::{Mode, Session};

/// Result of pressing "check"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Correct { measured: Degrees },
    Incorrect { measured: Degrees, expected: i64 },
    /// The guess was not a number, or there is nothing to check against
    Invalid,
}

impl CheckOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, CheckOutcome::Correct { .. })
    }

    pub fn measured(&self) -> Option<Degrees> {
        match self {
            CheckOutcome::Correct { measured } | CheckOutcome::Incorrect { measured, .. } => {
                Some(*measured)
            }
            CheckOutcome::Invalid => None,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Correct { measured } => write!(f, "Correct! The angle is {}", measured),
            CheckOutcome::Incorrect { .. } => write!(f, "Not quite, try again"),
            CheckOutcome::Invalid => write!(f, "Please enter a valid number"),
        }
    }
}

fn compare(measured: Degrees, expected: i64) -> CheckOutcome {
    if measured.value() as i64 == expected {
        CheckOutcome::Correct { measured }
    } else {
        CheckOutcome::Incorrect { measured, expected }
    }
}

/// Free variant: compare the typed guess with the measured angle
pub fn check_guess(session: &Session, input: &str) -> CheckOutcome {
    let outcome = match parse_degrees(input) {
        Some(guess) => compare(session.measured_angle(), guess),
        None => CheckOutcome::Invalid,
    };
    info!("guess {:?} checked: {:?}", input, outcome);
    outcome
}

/// Target variant: compare the measured angle with the round's target
pub fn check_target(session: &Session) -> CheckOutcome {
    let outcome = match session.target {
        Some(target) => compare(session.measured_angle(), target.value() as i64),
        None => CheckOutcome::Invalid,
    };
    info!("target checked: {:?}", outcome);
    outcome
}

/// Dispatches on the session's mode
pub fn check(session: &Session, input: &str) -> CheckOutcome {
    match session.mode {
        Mode::Free => check_guess(session, input),
        Mode::Target => check_target(session),
    }
}

/// Clamps an edited numeric field into `[0, 180]`. Text that is not a number
/// is returned untouched.
pub fn clamp_input(input: &str) -> String {
    match parse_degrees(input) {
        Some(value) if value < 0 => "0".to_string(),
        Some(value) if value > MAX_DEGREES as i64 => MAX_DEGREES.to_string(),
        _ => input.to_string(),
    }
}
