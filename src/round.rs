use log::info;
use rand::Rng;

use crate::angle::{Degrees, Protractor, MAX_DEGREES};
use crate::session::{DragState, Marker, Mode, Session};

/// Target used when the typed target is missing or out of range
pub const DEFAULT_TARGET: Degrees = Degrees::RIGHT;

/// Parses a typed whole number. Surrounding whitespace is allowed, anything
/// else that is not an integer is rejected.
pub fn parse_degrees(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// Resolves the target for a round: invalid or out-of-range input falls
/// back to [`DEFAULT_TARGET`], everything else is snapped onto the grid.
pub fn resolve_target(dial: &Protractor, input: &str) -> Degrees {
    match parse_degrees(input) {
        Some(value) if (0..=MAX_DEGREES as i64).contains(&value) => dial.snap(value as f64),
        _ => DEFAULT_TARGET,
    }
}

/// Free variant: both markers movable at the ends of the scale, no target.
pub fn start_free(dial: Protractor) -> Session {
    Session::new(dial)
}

/// Target variant.
///
/// One marker, chosen by coin flip, is fixed at a grid angle drawn uniformly
/// from `0..=180` (180 included). The other starts at the far end of the
/// scale: 180 when the fixed angle is at most 90, otherwise 0.
pub fn start_round<R: Rng>(dial: Protractor, target_input: &str, rng: &mut R) -> Session {
    let target = resolve_target(&dial, target_input);

    let grid: Vec<Degrees> = dial.grid().collect();
    let fixed_angle = grid[rng.gen_range(0..grid.len())];
    let other_angle = if fixed_angle <= Degrees::RIGHT {
        Degrees::STRAIGHT
    } else {
        Degrees::ZERO
    };

    let (marker1, marker2) = if rng.gen_bool(0.5) {
        (Marker::fixed(fixed_angle), Marker::movable(other_angle))
    } else {
        (Marker::movable(other_angle), Marker::fixed(fixed_angle))
    };

    info!(
        "round started: target {}, fixed at {}, movable at {}",
        target, fixed_angle, other_angle
    );

    Session {
        dial,
        mode: Mode::Target,
        marker1,
        marker2,
        target: Some(target),
        drag: DragState::Idle,
    }
}
