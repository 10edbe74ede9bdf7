//! Core library surface for the Student Records TUI application.
//!
//! The binary only wires these pieces together; tests and any other tooling
//! can drive the store and the controller without a terminal.
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` to open and close the store.
pub use db::{close_store, open_store, StoreError};

/// The domain types that other layers manipulate.
pub use models::{Marks, SortOrder, Student};

/// Action dispatch shared by the TUI and tests.
pub use controller::{dispatch, Action, FormFields, Notice, NoticeKind, Outcome, Output};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
