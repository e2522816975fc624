//! Ratatui front-end: a form on the left, the student listing on the right,
//! and modal notices on top. The registers screen implements the
//! registration service's display surface.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
