// Library surface for headless/integration tests and reuse.
// The binary in main.rs only owns terminal setup and the event loop.
pub mod angle;
pub mod app;
pub mod app_dirs;
pub mod check;
pub mod config;
pub mod error;
pub mod feedback;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;

pub use angle::{Degrees, Point, Protractor, Viewport};
pub use check::CheckOutcome;
pub use session::{Mode, Session};
