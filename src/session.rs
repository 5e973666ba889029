use log::debug;
use serde::{Deserialize, Serialize};

use crate::angle::{Degrees, Point, Protractor};

/// Press radius around a marker, in logical units
pub const HIT_RADIUS: f64 = 16.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Both markers move; the user types the angle they see
    #[default]
    Free,
    /// One marker is fixed; the user drags the other to a target angle
    Target,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Free => Mode::Target,
            Mode::Target => Mode::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerId {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub angle: Degrees,
    pub movable: bool,
}

impl Marker {
    pub fn movable(angle: Degrees) -> Self {
        Self {
            angle,
            movable: true,
        }
    }

    pub fn fixed(angle: Degrees) -> Self {
        Self {
            angle,
            movable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(MarkerId),
}

/// Pointer input already translated into the logical drawing space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release,
}

/// The protractor's mutable state: two markers, an optional target and the
/// drag in progress. Checking never touches the markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub dial: Protractor,
    pub mode: Mode,
    pub marker1: Marker,
    pub marker2: Marker,
    pub target: Option<Degrees>,
    pub drag: DragState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Protractor::default())
    }
}

impl Session {
    pub fn new(dial: Protractor) -> Self {
        Self {
            dial,
            mode: Mode::Free,
            marker1: Marker::movable(Degrees::STRAIGHT),
            marker2: Marker::movable(Degrees::ZERO),
            target: None,
            drag: DragState::Idle,
        }
    }

    pub fn marker(&self, id: MarkerId) -> &Marker {
        match id {
            MarkerId::First => &self.marker1,
            MarkerId::Second => &self.marker2,
        }
    }

    fn marker_mut(&mut self, id: MarkerId) -> &mut Marker {
        match id {
            MarkerId::First => &mut self.marker1,
            MarkerId::Second => &mut self.marker2,
        }
    }

    pub fn markers(&self) -> [(MarkerId, &Marker); 2] {
        [
            (MarkerId::First, &self.marker1),
            (MarkerId::Second, &self.marker2),
        ]
    }

    /// The fixed marker of a target round, if any
    pub fn fixed_marker(&self) -> Option<MarkerId> {
        self.markers()
            .into_iter()
            .find(|(_, m)| !m.movable)
            .map(|(id, _)| id)
    }

    pub fn measured_angle(&self) -> Degrees {
        self.marker1.angle.between(self.marker2.angle)
    }

    pub fn position_of(&self, id: MarkerId) -> Point {
        self.dial.angle_to_position(self.marker(id).angle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    /// Nearest movable marker within [`HIT_RADIUS`] of `at`; ties favor the first
    pub fn hit_test(&self, at: Point) -> Option<MarkerId> {
        let mut best: Option<(MarkerId, f64)> = None;
        for (id, marker) in self.markers() {
            if !marker.movable {
                continue;
            }
            let dist = self.dial.angle_to_position(marker.angle).distance(&at);
            if dist > HIT_RADIUS {
                continue;
            }
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((id, dist)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Advances the drag state machine. Returns true when the display needs
    /// a refresh.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match (self.drag, event) {
            (DragState::Idle, PointerEvent::Press(at)) => match self.hit_test(at) {
                Some(id) => {
                    debug!("drag start on {:?}", id);
                    self.drag = DragState::Dragging(id);
                    true
                }
                None => false,
            },
            // a second press mid-drag is ignored
            (DragState::Dragging(_), PointerEvent::Press(_)) => false,
            (DragState::Dragging(id), PointerEvent::Move(at)) => {
                let angle = self.dial.position_to_angle(at.x, at.y);
                self.marker_mut(id).angle = angle;
                true
            }
            (DragState::Dragging(id), PointerEvent::Release) => {
                debug!("drag end on {:?} at {}", id, self.marker(id).angle);
                self.drag = DragState::Idle;
                true
            }
            (DragState::Idle, PointerEvent::Move(_) | PointerEvent::Release) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_angle(session: &Session, degrees: i64) -> Point {
        session.dial.angle_to_position(Degrees::clamped(degrees))
    }

    #[test]
    fn test_session_defaults() {
        let s = Session::default();
        assert_eq!(s.marker1, Marker::movable(Degrees::clamped(180)));
        assert_eq!(s.marker2, Marker::movable(Degrees::clamped(0)));
        assert_eq!(s.target, None);
        assert_eq!(s.drag, DragState::Idle);
        assert_eq!(s.mode, Mode::Free);
        assert_eq!(s.measured_angle(), Degrees::clamped(180));
        assert_eq!(s.fixed_marker(), None);
    }

    #[test]
    fn test_press_move_release_updates_marker() {
        let mut s = Session::default();
        let press = at_angle(&s, 0);
        assert!(s.handle_pointer(PointerEvent::Press(press)));
        assert_eq!(s.drag, DragState::Dragging(MarkerId::Second));

        let target = at_angle(&s, 60);
        assert!(s.handle_pointer(PointerEvent::Move(target)));
        assert_eq!(s.marker2.angle, Degrees::clamped(60));
        assert_eq!(s.measured_angle(), Degrees::clamped(120));

        assert!(s.handle_pointer(PointerEvent::Release));
        assert_eq!(s.drag, DragState::Idle);
        assert_eq!(s.marker2.angle, Degrees::clamped(60));
    }

    #[test]
    fn test_press_on_fixed_marker_is_noop() {
        let mut s = Session::default();
        s.marker1 = Marker::fixed(Degrees::clamped(180));
        let press = at_angle(&s, 180);
        assert!(!s.handle_pointer(PointerEvent::Press(press)));
        assert_eq!(s.drag, DragState::Idle);
    }

    #[test]
    fn test_press_away_from_markers_is_noop() {
        let mut s = Session::default();
        assert!(!s.handle_pointer(PointerEvent::Press(Point::new(200.0, 200.0))));
        assert_eq!(s.drag, DragState::Idle);
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let mut s = Session::default();
        s.handle_pointer(PointerEvent::Press(at_angle(&s, 0)));
        let other = at_angle(&s, 180);
        assert!(!s.handle_pointer(PointerEvent::Press(other)));
        assert_eq!(s.drag, DragState::Dragging(MarkerId::Second));
    }

    #[test]
    fn test_move_and_release_while_idle_do_nothing() {
        let mut s = Session::default();
        let before = s;
        assert!(!s.handle_pointer(PointerEvent::Move(at_angle(&s, 90))));
        assert!(!s.handle_pointer(PointerEvent::Release));
        assert_eq!(s, before);
    }

    #[test]
    fn test_overlapping_markers_prefer_movable() {
        let mut s = Session::default();
        s.marker1 = Marker::fixed(Degrees::clamped(90));
        s.marker2 = Marker::movable(Degrees::clamped(90));
        s.handle_pointer(PointerEvent::Press(at_angle(&s, 90)));
        assert_eq!(s.drag, DragState::Dragging(MarkerId::Second));
    }

    #[test]
    fn test_overlapping_movable_markers_tie_to_first() {
        let mut s = Session::default();
        s.marker1.angle = Degrees::clamped(40);
        s.marker2.angle = Degrees::clamped(40);
        assert_eq!(s.hit_test(at_angle(&s, 40)), Some(MarkerId::First));
    }

    #[test]
    fn test_drag_below_diameter_clamps() {
        let mut s = Session::default();
        s.handle_pointer(PointerEvent::Press(at_angle(&s, 180)));
        s.handle_pointer(PointerEvent::Move(Point::new(370.0, 215.0)));
        assert_eq!(s.marker1.angle, Degrees::clamped(0));
        s.handle_pointer(PointerEvent::Move(Point::new(30.0, 215.0)));
        assert_eq!(s.marker1.angle, Degrees::clamped(180));
    }

    #[test]
    fn test_mode_toggle_and_display() {
        assert_eq!(Mode::Free.toggled(), Mode::Target);
        assert_eq!(Mode::Target.toggled(), Mode::Free);
        assert_eq!(Mode::Target.to_string(), "target");
    }
}
