use std::f64::consts::PI;
use std::fmt;

pub const CENTER_X: f64 = 200.0;
pub const CENTER_Y: f64 = 200.0;
pub const RADIUS: f64 = 180.0;
pub const SNAP_UNIT: u16 = 10;
pub const MAX_DEGREES: u16 = 180;

/// Logical drawing space the protractor is laid out in
pub const LOGICAL_WIDTH: f64 = 400.0;
pub const LOGICAL_HEIGHT: f64 = 220.0;

/// An angle on the protractor scale, in whole degrees within `[0, 180]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Degrees(u16);

impl Degrees {
    pub const ZERO: Degrees = Degrees(0);
    pub const RIGHT: Degrees = Degrees(90);
    pub const STRAIGHT: Degrees = Degrees(MAX_DEGREES);

    /// Builds a value clamped into `[0, 180]`. Does not snap.
    pub fn clamped(value: i64) -> Self {
        Degrees(value.clamp(0, MAX_DEGREES as i64) as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Absolute difference between two scale positions
    pub fn between(self, other: Degrees) -> Degrees {
        Degrees(self.0.abs_diff(other.0))
    }

    pub fn radians(self) -> f64 {
        self.0 as f64 * PI / 180.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Geometry of the half-circle dial.
///
/// 0° sits at the rightmost point of the diameter and 180° at the leftmost,
/// with angles growing counter-clockwise over the upper half. Screen y grows
/// downwards, so the upper half is `y <= center.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Protractor {
    pub center: Point,
    pub radius: f64,
    pub snap_unit: u16,
}

impl Default for Protractor {
    fn default() -> Self {
        Self {
            center: Point::new(CENTER_X, CENTER_Y),
            radius: RADIUS,
            snap_unit: SNAP_UNIT,
        }
    }
}

impl Protractor {
    pub fn with_snap_unit(snap_unit: u16) -> Self {
        Self {
            snap_unit,
            ..Self::default()
        }
    }

    pub fn angle_to_position(&self, angle: Degrees) -> Point {
        self.point_at(angle.radians(), self.radius)
    }

    /// Point at `radius` from the center along the direction of `angle`
    pub fn point_at(&self, radians: f64, radius: f64) -> Point {
        Point {
            x: self.center.x + radius * radians.cos(),
            y: self.center.y - radius * radians.sin(),
        }
    }

    /// Inverse of [`Protractor::angle_to_position`].
    ///
    /// Points below the diameter or off the dial still resolve: anything
    /// under the center lands on 0 or 180, whichever end is nearer.
    pub fn position_to_angle(&self, x: f64, y: f64) -> Degrees {
        let dx = x - self.center.x;
        let dy = self.center.y - y;
        let raw = dy.atan2(dx).to_degrees();

        // atan2 yields (-180, 0) below the diameter
        let clamped = if raw < -90.0 {
            MAX_DEGREES as f64
        } else {
            raw.clamp(0.0, MAX_DEGREES as f64)
        };

        self.snap(clamped)
    }

    /// Rounds to the nearest multiple of the snap unit.
    ///
    /// `f64::round` rounds half away from zero, so an exact half step
    /// (15° with a 10° unit) goes up to 20°.
    pub fn snap(&self, degrees: f64) -> Degrees {
        let unit = self.snap_unit.max(1) as f64;
        let snapped = (degrees / unit).round() * unit;
        Degrees::clamped(snapped as i64)
    }

    /// Every grid value from 0 to 180 inclusive
    pub fn grid(&self) -> impl Iterator<Item = Degrees> {
        (0..=MAX_DEGREES)
            .step_by(self.snap_unit.max(1) as usize)
            .map(Degrees)
    }
}

/// On-screen rectangle the dial is displayed in, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(left: u16, top: u16, width: u16, height: u16) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some((
            LOGICAL_WIDTH / self.width as f64,
            LOGICAL_HEIGHT / self.height as f64,
        ))
    }

    /// Maps a pointer position in cells into the logical drawing space,
    /// taking the center of the cell under the pointer
    pub fn to_logical(&self, column: u16, row: u16) -> Option<Point> {
        let (scale_x, scale_y) = self.scale()?;
        Some(Point {
            x: (column as f64 - self.left as f64 + 0.5) * scale_x,
            y: (row as f64 - self.top as f64 + 0.5) * scale_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(p: Point, x: f64, y: f64) -> bool {
        (p.x - x).abs() < EPS && (p.y - y).abs() < EPS
    }

    #[test]
    fn test_angle_to_position_sample_points() {
        let dial = Protractor::default();
        assert!(approx(dial.angle_to_position(Degrees(0)), 380.0, 200.0));
        assert!(approx(dial.angle_to_position(Degrees(90)), 200.0, 20.0));
        assert!(approx(dial.angle_to_position(Degrees(180)), 20.0, 200.0));
    }

    #[test]
    fn test_angle_to_position_moves_right_to_left() {
        let dial = Protractor::default();
        let xs: Vec<f64> = dial.grid().map(|a| dial.angle_to_position(a).x).collect();
        assert_eq!(xs.len(), 19);
        for pair in xs.windows(2) {
            assert!(pair[1] < pair[0], "{} should be left of {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_round_trip_on_grid() {
        let dial = Protractor::default();
        for a in dial.grid() {
            let p = dial.angle_to_position(a);
            assert_eq!(dial.position_to_angle(p.x, p.y), a);
        }
    }

    #[test]
    fn test_below_diameter_clamps_to_nearest_end() {
        let dial = Protractor::default();
        assert_eq!(dial.position_to_angle(390.0, 210.0), Degrees(0));
        assert_eq!(dial.position_to_angle(260.0, 400.0), Degrees(0));
        assert_eq!(dial.position_to_angle(10.0, 210.0), Degrees(180));
        assert_eq!(dial.position_to_angle(150.0, 400.0), Degrees(180));
    }

    #[test]
    fn test_far_outside_still_on_scale() {
        let dial = Protractor::default();
        for &(x, y) in &[(-1000.0, -1000.0), (5000.0, 3.0), (200.0, -9000.0), (0.0, 0.0)] {
            let a = dial.position_to_angle(x, y);
            assert!(a.value() <= 180);
            assert_eq!(a.value() % 10, 0);
        }
    }

    #[test]
    fn test_results_are_multiples_of_snap_unit() {
        let dial = Protractor::default();
        for i in 0..400 {
            let x = i as f64;
            for &y in &[0.0, 50.0, 150.0, 199.0] {
                assert_eq!(dial.position_to_angle(x, y).value() % 10, 0);
            }
        }
    }

    #[test]
    fn test_snap_rounds_half_away_from_zero() {
        let dial = Protractor::default();
        assert_eq!(dial.snap(15.0), Degrees(20));
        assert_eq!(dial.snap(25.0), Degrees(30));
        assert_eq!(dial.snap(5.0), Degrees(10));
        assert_eq!(dial.snap(14.999), Degrees(10));
        assert_eq!(dial.snap(175.0), Degrees(180));
    }

    #[test]
    fn test_snap_near_boundary_positions() {
        let dial = Protractor::default();
        let just_under = dial.point_at(44.0_f64.to_radians(), 100.0);
        let just_over = dial.point_at(46.0_f64.to_radians(), 100.0);
        assert_eq!(dial.position_to_angle(just_under.x, just_under.y), Degrees(40));
        assert_eq!(dial.position_to_angle(just_over.x, just_over.y), Degrees(50));
    }

    #[test]
    fn test_custom_snap_unit_grid() {
        let dial = Protractor::with_snap_unit(30);
        let grid: Vec<u16> = dial.grid().map(Degrees::value).collect();
        assert_eq!(grid, vec![0, 30, 60, 90, 120, 150, 180]);
        assert_eq!(dial.snap(44.0), Degrees(30));
    }

    #[test]
    fn test_degrees_between() {
        assert_eq!(Degrees(180).between(Degrees(90)), Degrees(90));
        assert_eq!(Degrees(20).between(Degrees(150)), Degrees(130));
        assert_eq!(Degrees::clamped(-5), Degrees(0));
        assert_eq!(Degrees::clamped(500), Degrees(180));
        assert_eq!(Degrees(40).to_string(), "40°");
    }

    #[test]
    fn test_viewport_maps_cell_centers() {
        let vp = Viewport::new(10, 5, 80, 22);
        let top_left = vp.to_logical(10, 5).unwrap();
        assert!(approx(top_left, 2.5, 5.0));
        let bottom_right = vp.to_logical(89, 26).unwrap();
        assert!(approx(bottom_right, 397.5, 215.0));
        assert_eq!(vp.scale(), Some((5.0, 10.0)));
    }

    #[test]
    fn test_viewport_empty_maps_nothing() {
        assert_eq!(Viewport::new(0, 0, 0, 10).to_logical(1, 1), None);
        assert_eq!(Viewport::default().scale(), None);
    }
}
