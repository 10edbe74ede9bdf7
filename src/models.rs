//! Domain types that mirror the `students` table and travel between the
//! persistence layer, the controller and the TUI. They stay plain data holders
//! so the other layers own all behaviour.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// A single row of the roster.
pub struct Student {
    /// Display name. Never blank for rows created through the form.
    pub name: String,
    /// Roll number, the primary key. Immutable once the row exists.
    pub roll: String,
    /// Marks as stored. Rows written by this application always hold a score.
    pub marks: Marks,
}

impl Student {
    pub fn new(name: impl Into<String>, roll: impl Into<String>, marks: impl Into<Marks>) -> Self {
        Self {
            name: name.into(),
            roll: roll.into(),
            marks: marks.into(),
        }
    }

    /// Marks formatted the way the results area prints them.
    pub fn marks_display(&self) -> String {
        self.marks.to_string()
    }
}

/// Stored marks. Older roster files kept whatever text the marks field held,
/// so a value SQLite could not coerce to a number is carried as the raw text
/// instead of failing the whole row.
#[derive(Debug, Clone, PartialEq)]
pub enum Marks {
    Score(f64),
    Unparsed(String),
}

impl Marks {
    pub fn score(&self) -> Option<f64> {
        match self {
            Marks::Score(score) => Some(*score),
            Marks::Unparsed(_) => None,
        }
    }
}

impl From<f64> for Marks {
    fn from(score: f64) -> Self {
        Marks::Score(score)
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marks::Score(score) => f.write_str(&format_marks(*score)),
            Marks::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.roll, self.marks_display())
    }
}

/// Render marks with at least one decimal place so `91` shows as `91.0`
/// while `88.25` keeps its full precision.
pub fn format_marks(marks: f64) -> String {
    if marks.fract() == 0.0 && marks.is_finite() {
        format!("{marks:.1}")
    } else {
        format!("{marks}")
    }
}

/// Ordering requested by the listing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order.
    #[default]
    None,
    ByNameAsc,
    ByMarksDesc,
}

impl SortOrder {
    /// SQL suffix for the listing query. Ties fall back to insertion order.
    pub(crate) fn order_clause(self) -> &'static str {
        match self {
            SortOrder::None => "ORDER BY rowid",
            SortOrder::ByNameAsc => "ORDER BY name ASC, rowid",
            SortOrder::ByMarksDesc => "ORDER BY marks DESC, rowid",
        }
    }
}
