//! Ratatui front-end: the form, its key bindings and the results area.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
