use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker as CanvasMarker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as Segment, Points},
        Block, Borders, Paragraph, Widget,
    },
    Frame,
};

use crate::angle::{Point, Protractor, Viewport, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::app::App;
use crate::check::CheckOutcome;
use crate::session::{DragState, MarkerId, Mode, Session};

const HORIZONTAL_MARGIN: u16 = 2;
const PANEL_HEIGHT: u16 = 7;
const MARKER_RADIUS: f64 = 8.0;
const LABEL_EVERY: u16 = 30;

/// A terminal cell is roughly twice as tall as it is wide
const CELL_ASPECT: f64 = 2.0;

/// Widget drawing the dial, its tick marks and both markers
pub struct DialView<'a> {
    session: &'a Session,
}

pub fn render_markers(session: &Session) -> DialView<'_> {
    DialView { session }
}

/// Converts logical (y down) coordinates to canvas (y up) coordinates
fn canvas_point(p: Point) -> (f64, f64) {
    (p.x, LOGICAL_HEIGHT - p.y)
}

fn segment(from: Point, to: Point, color: Color) -> Segment {
    let (x1, y1) = canvas_point(from);
    let (x2, y2) = canvas_point(to);
    Segment {
        x1,
        y1,
        x2,
        y2,
        color,
    }
}

fn draw_scale(ctx: &mut Context, dial: &Protractor) {
    let arc: Vec<(f64, f64)> = (0..=360)
        .map(|half_deg| {
            let radians = (half_deg as f64 / 2.0).to_radians();
            canvas_point(dial.point_at(radians, dial.radius))
        })
        .collect();
    ctx.draw(&Points {
        coords: &arc,
        color: Color::Gray,
    });

    let left = dial.point_at(std::f64::consts::PI, dial.radius);
    let right = dial.point_at(0.0, dial.radius);
    ctx.draw(&segment(left, right, Color::Gray));

    for angle in dial.grid() {
        let radians = angle.radians();
        let major = angle.value() % LABEL_EVERY == 0;
        let inner = if major {
            dial.radius - 20.0
        } else {
            dial.radius - 12.0
        };
        ctx.draw(&segment(
            dial.point_at(radians, inner),
            dial.point_at(radians, dial.radius),
            Color::DarkGray,
        ));

        if major {
            let label = dial.point_at(radians, dial.radius - 35.0);
            let (x, y) = canvas_point(label);
            ctx.print(x - 6.0, y - 4.0, angle.value().to_string());
        }
    }
}

impl Widget for DialView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session;
        Canvas::default()
            .marker(CanvasMarker::Braille)
            .x_bounds([0.0, LOGICAL_WIDTH])
            .y_bounds([0.0, LOGICAL_HEIGHT])
            .paint(|ctx| {
                draw_scale(ctx, &session.dial);
                ctx.layer();

                for (id, marker) in session.markers() {
                    let pos = session.position_of(id);
                    let color = if session.drag == DragState::Dragging(id) {
                        Color::LightGreen
                    } else if !marker.movable {
                        Color::Red
                    } else {
                        match id {
                            MarkerId::First => Color::Yellow,
                            MarkerId::Second => Color::Cyan,
                        }
                    };

                    ctx.draw(&segment(session.dial.center, pos, color));
                    let (x, y) = canvas_point(pos);
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: MARKER_RADIUS,
                        color,
                    });
                }
            })
            .render(area, buf);
    }
}

/// Largest rectangle inside `area` that keeps the dial's proportions,
/// centered horizontally
pub fn dial_rect(area: Rect) -> Rect {
    let cells_per_row = LOGICAL_WIDTH / LOGICAL_HEIGHT * CELL_ASPECT;
    let height = area
        .height
        .min((area.width as f64 / cells_per_row).floor() as u16);
    let width = ((height as f64 * cells_per_row).round() as u16).min(area.width);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height,
    }
}

pub fn outcome_message(outcome: &CheckOutcome, session: &Session) -> String {
    match (outcome, session.target) {
        (CheckOutcome::Incorrect { measured, .. }, Some(target)) if session.mode == Mode::Target => {
            format!("Not quite: measured {}, target {}", measured, target)
        }
        _ => outcome.to_string(),
    }
}

fn panel_lines(app: &App) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let session = &app.session;

    let angle_line = Line::from(vec![
        Span::raw("Angle: "),
        Span::styled(session.measured_angle().to_string(), bold.fg(Color::Magenta)),
    ]);

    let (prompt, hint) = match session.mode {
        Mode::Free => (
            "Your answer: ",
            "Drag the markers, type the angle between them and press Enter",
        ),
        Mode::Target => (
            "Target: ",
            "Drag the free marker until the angle matches the target, then press Enter",
        ),
    };

    let field = Line::from(vec![
        Span::raw(prompt),
        Span::styled(format!("{}_", app.input), bold.add_modifier(Modifier::UNDERLINED)),
        Span::raw(match session.target {
            Some(target) if session.mode == Mode::Target => format!("  (this round: {})", target),
            _ => String::new(),
        }),
    ]);

    let result = match &app.outcome {
        Some(outcome) => {
            let color = if outcome.is_correct() {
                Color::Green
            } else {
                Color::Red
            };
            Line::from(Span::styled(outcome_message(outcome, session), bold.fg(color)))
        }
        None => Line::from(""),
    };

    vec![
        angle_line,
        field,
        result,
        Line::from(Span::styled(hint, dim)),
        Line::from(Span::styled(
            "(enter) check | (→/ctrl+n) new round | (tab) switch mode | (esc) quit",
            dim.add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// Draws the whole screen and records where the dial ended up so pointer
/// input can be mapped back onto it
pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([Constraint::Min(3), Constraint::Length(PANEL_HEIGHT)])
        .split(f.area());

    let title = format!("Protractor ({} mode)", app.mode());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let dial_area = dial_rect(inner);
    app.viewport = Viewport::new(
        dial_area.x,
        dial_area.y,
        dial_area.width,
        dial_area.height,
    );
    f.render_widget(render_markers(&app.session), dial_area);

    let panel = Paragraph::new(panel_lines(app))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(panel, chunks[1]);
}
