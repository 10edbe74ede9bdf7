//! Maps form actions onto roster operations. Every action is one synchronous
//! transaction: it reads a snapshot of the inputs, talks to the store and
//! hands back an [`Outcome`] describing what the surface should show. Domain
//! failures (missing input, duplicate roll, unknown roll) become notices;
//! only storage failures escape as errors.

use anyhow::Result;
use rusqlite::Connection;
use tracing::{debug, error};

use crate::db::{
    count_students, delete_student, fetch_students, find_student, insert_student,
    update_student, StoreError,
};
use crate::models::{SortOrder, Student};

/// Width of the name column in the listing.
const NAME_WIDTH: usize = 20;
/// Width of the roll and marks columns in the listing.
const COLUMN_WIDTH: usize = 10;
/// Length of the rule drawn under the listing header.
const RULE_WIDTH: usize = 45;

/// Placeholder shown when a listing has no rows.
pub const NO_RECORDS: &str = "No records found.";

/// User-triggered commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    ShowAll,
    SortByName,
    SortByMarks,
    Search,
    Delete,
    Update,
    Total,
    Clear,
}

/// Raw text of the three inputs at the moment an action fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub roll: String,
    pub marks: String,
}

impl FormFields {
    pub fn new(name: &str, roll: &str, marks: &str) -> Self {
        Self {
            name: name.to_string(),
            roll: roll.to_string(),
            marks: marks.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Modal message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn input_error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            title: "Input Error".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    fn not_found(roll: &str) -> Self {
        Self::info(
            "Not Found",
            StoreError::NotFound {
                roll: roll.to_string(),
            }
            .to_string(),
        )
    }
}

/// What the results area should display after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A full listing, possibly empty.
    Listing(Vec<Student>),
    /// The single student matched by a search.
    Found(Student),
    /// Wipe the results area.
    Blank,
}

impl Output {
    /// Text lines for the results area.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Output::Listing(students) if students.is_empty() => vec![NO_RECORDS.to_string()],
            Output::Listing(students) => {
                let mut lines = Vec::with_capacity(students.len() + 2);
                lines.push(format_row("Name", "Roll No", "Marks"));
                lines.push("-".repeat(RULE_WIDTH));
                lines.extend(
                    students
                        .iter()
                        .map(|s| format_row(&s.name, &s.roll, &s.marks_display())),
                );
                lines
            }
            Output::Found(student) => vec![
                "Found ->".to_string(),
                format!("Name: {}", student.name),
                format!("Roll No: {}", student.roll),
                format!("Marks: {}", student.marks_display()),
            ],
            Output::Blank => Vec::new(),
        }
    }
}

fn format_row(name: &str, roll: &str, marks: &str) -> String {
    format!("{name:<NAME_WIDTH$} {roll:<COLUMN_WIDTH$} {marks:<COLUMN_WIDTH$}")
        .trim_end()
        .to_string()
}

/// Render instructions produced by [`dispatch`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub notice: Option<Notice>,
    pub output: Option<Output>,
    pub clear_fields: bool,
}

impl Outcome {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    fn output(output: Output) -> Self {
        Self {
            output: Some(output),
            ..Self::default()
        }
    }

    fn with_output(mut self, output: Output) -> Self {
        self.output = Some(output);
        self
    }
}

/// Run one action against the store.
pub fn dispatch(conn: &Connection, action: Action, fields: &FormFields) -> Result<Outcome> {
    debug!(?action, "dispatching form action");
    match action {
        Action::Add => add(conn, fields),
        Action::ShowAll => listing(conn, SortOrder::None),
        Action::SortByName => listing(conn, SortOrder::ByNameAsc),
        Action::SortByMarks => listing(conn, SortOrder::ByMarksDesc),
        Action::Search => search(conn, fields),
        Action::Delete => delete(conn, fields),
        Action::Update => update(conn, fields),
        Action::Total => total(conn),
        Action::Clear => Ok(Outcome {
            clear_fields: true,
            ..Outcome::default()
        }),
    }
}

/// Parse the marks input into a finite number.
pub fn parse_marks(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|marks| marks.is_finite())
}

const INVALID_MARKS: &str = "Marks must be a number!";

fn add(conn: &Connection, fields: &FormFields) -> Result<Outcome> {
    let name = fields.name.trim();
    let roll = fields.roll.trim();
    let marks_raw = fields.marks.trim();

    if name.is_empty() || roll.is_empty() || marks_raw.is_empty() {
        return Ok(Outcome::notice(Notice::input_error("Please fill all fields!")));
    }
    let Some(marks) = parse_marks(marks_raw) else {
        return Ok(Outcome::notice(Notice::input_error(INVALID_MARKS)));
    };

    match insert_student(conn, name, roll, marks) {
        Ok(_) => Ok(Outcome {
            notice: Some(Notice::info("Success", "Record added successfully!")),
            output: Some(refreshed_listing(conn)),
            clear_fields: true,
        }),
        Err(err @ StoreError::Conflict { .. }) => {
            debug!(roll, "rejected duplicate roll");
            Ok(Outcome::notice(Notice::error(err.to_string())))
        }
        Err(err) => Err(err.into()),
    }
}

fn listing(conn: &Connection, order: SortOrder) -> Result<Outcome> {
    let students = fetch_students(conn, order)?;
    Ok(Outcome::output(Output::Listing(students)))
}

/// Listing shown after a committed change. The change already happened, so a
/// failed reload only blanks the results area instead of failing the action.
fn refreshed_listing(conn: &Connection) -> Output {
    match fetch_students(conn, SortOrder::None) {
        Ok(students) => Output::Listing(students),
        Err(err) => {
            error!(error = %err, "failed to reload listing after a committed change");
            Output::Blank
        }
    }
}

/// Find a student by the trimmed roll, falling back to the roll exactly as
/// typed. Older roster files stored rolls verbatim, surrounding spaces
/// included.
fn lookup(conn: &Connection, raw_roll: &str) -> Result<Option<Student>, StoreError> {
    let trimmed = raw_roll.trim();
    let keys = std::iter::once(trimmed).chain((raw_roll != trimmed).then_some(raw_roll));

    for key in keys {
        match find_student(conn, key) {
            Ok(student) => return Ok(Some(student)),
            Err(StoreError::NotFound { .. }) => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}

fn search(conn: &Connection, fields: &FormFields) -> Result<Outcome> {
    let roll = fields.roll.trim();
    if roll.is_empty() {
        return Ok(Outcome::notice(Notice::input_error(
            "Please enter Roll No to search!",
        )));
    }

    match lookup(conn, &fields.roll)? {
        Some(student) => Ok(Outcome::output(Output::Found(student))),
        None => Ok(Outcome::notice(Notice::not_found(roll)).with_output(Output::Blank)),
    }
}

fn delete(conn: &Connection, fields: &FormFields) -> Result<Outcome> {
    let roll = fields.roll.trim();
    if roll.is_empty() {
        return Ok(Outcome::notice(Notice::input_error(
            "Please enter Roll No to delete!",
        )));
    }

    let Some(student) = lookup(conn, &fields.roll)? else {
        return Ok(Outcome::notice(Notice::not_found(roll)));
    };

    match delete_student(conn, &student.roll) {
        Ok(()) => Ok(Outcome::notice(Notice::info(
            "Deleted",
            format!("Record with Roll No {roll} deleted successfully!"),
        ))
        .with_output(refreshed_listing(conn))),
        Err(StoreError::NotFound { .. }) => Ok(Outcome::notice(Notice::not_found(roll))),
        Err(err) => Err(err.into()),
    }
}

fn update(conn: &Connection, fields: &FormFields) -> Result<Outcome> {
    let roll = fields.roll.trim();
    if roll.is_empty() {
        return Ok(Outcome::notice(Notice::input_error(
            "Please enter Roll No to update!",
        )));
    }

    let Some(student) = lookup(conn, &fields.roll)? else {
        return Ok(Outcome::notice(Notice::not_found(roll)));
    };

    // Blank inputs keep the stored value.
    let name = Some(fields.name.trim()).filter(|name| !name.is_empty());
    let marks = match fields.marks.trim() {
        "" => None,
        raw => match parse_marks(raw) {
            Some(marks) => Some(marks),
            None => return Ok(Outcome::notice(Notice::input_error(INVALID_MARKS))),
        },
    };

    match update_student(conn, &student.roll, name, marks) {
        Ok(()) => Ok(Outcome::notice(Notice::info(
            "Updated",
            format!("Record with Roll No {roll} updated successfully!"),
        ))
        .with_output(refreshed_listing(conn))),
        Err(StoreError::NotFound { .. }) => Ok(Outcome::notice(Notice::not_found(roll))),
        Err(err) => Err(err.into()),
    }
}

fn total(conn: &Connection) -> Result<Outcome> {
    let count = count_students(conn)?;
    Ok(Outcome::notice(Notice::info(
        "Total Students",
        format!("Total number of students: {count}"),
    )))
}
