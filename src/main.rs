//! Binary entry point: resolve paths, start logging, open the roster
//! database, show the initial listing and drive the Ratatui event loop until
//! the user quits. The connection is closed explicitly on the way out.
use student_records::config::AppPaths;
use student_records::logging::init_tracing;
use student_records::{close_store, open_store, run_app, Action, App};

/// Returning a `Result` reports fatal startup problems (an unreadable home
/// directory, a corrupt database file) on the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    paths.ensure_data_dir()?;
    init_tracing(&paths.log_path);

    let conn = open_store(&paths.db_path)?;
    let mut app = App::new(conn);
    app.perform(Action::ShowAll);

    let result = run_app(&mut app);
    close_store(app.into_connection())?;
    result
}
