use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Marks, SortOrder, Student};

/// Failures the roster operations can report. `Conflict` and `NotFound` are
/// domain outcomes the form recovers from; `Sqlite` means the store itself
/// misbehaved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Roll No {roll} already exists!")]
    Conflict { roll: String },
    #[error("No record found with Roll No: {roll}")]
    NotFound { roll: String },
    #[error("SQLite error: {0}")]
    Sqlite(#[from] SqlError),
}

/// Insert a new student. A duplicate roll number trips the primary key and is
/// reported as `Conflict` with the table untouched.
pub fn insert_student(
    conn: &Connection,
    name: &str,
    roll: &str,
    marks: f64,
) -> Result<Student, StoreError> {
    conn.execute(
        "INSERT INTO students (name, roll, marks) VALUES (?1, ?2, ?3)",
        params![name, roll, marks],
    )
    .map_err(|err| map_unique_constraint(err, roll))?;

    let student = Student::new(name, roll, marks);
    info!(%student, "inserted student");
    Ok(student)
}

/// Retrieve every student in the requested order.
pub fn fetch_students(conn: &Connection, order: SortOrder) -> Result<Vec<Student>, StoreError> {
    let sql = format!(
        "SELECT name, roll, marks FROM students {}",
        order.order_clause()
    );
    let mut stmt = conn.prepare(&sql)?;

    let students = stmt
        .query_map([], student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(?order, rows = students.len(), "listed students");
    Ok(students)
}

/// Look up one student by roll number.
pub fn find_student(conn: &Connection, roll: &str) -> Result<Student, StoreError> {
    conn.query_row(
        "SELECT name, roll, marks FROM students WHERE roll = ?1",
        params![roll],
        student_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound {
        roll: roll.to_string(),
    })
}

/// Remove a student. Zero affected rows means the roll was never stored.
pub fn delete_student(conn: &Connection, roll: &str) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM students WHERE roll = ?1", params![roll])?;

    if deleted == 0 {
        Err(StoreError::NotFound {
            roll: roll.to_string(),
        })
    } else {
        info!(roll, "deleted student");
        Ok(())
    }
}

/// Overwrite the supplied fields only. `None` keeps the stored value, which
/// `COALESCE` resolves inside the single `UPDATE`.
pub fn update_student(
    conn: &Connection,
    roll: &str,
    name: Option<&str>,
    marks: Option<f64>,
) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE students SET name = COALESCE(?1, name), marks = COALESCE(?2, marks)
         WHERE roll = ?3",
        params![name, marks, roll],
    )?;

    if updated == 0 {
        Err(StoreError::NotFound {
            roll: roll.to_string(),
        })
    } else {
        info!(roll, name_changed = name.is_some(), marks_changed = marks.is_some(), "updated student");
        Ok(())
    }
}

/// Total number of stored students.
pub fn count_students(conn: &Connection) -> Result<u64, StoreError> {
    let count = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    Ok(count)
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let name: Option<String> = row.get(0)?;
    Ok(Student {
        name: name.unwrap_or_default(),
        roll: row.get(1)?,
        marks: marks_from_row(row, 2)?,
    })
}

/// Older roster files stored whatever text the marks field held. Numeric
/// storage classes are taken as-is and numeric-looking text is parsed; any
/// other value is kept verbatim so the row still lists, updates and deletes.
fn marks_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Marks> {
    let marks = match row.get_ref(idx)? {
        ValueRef::Real(value) => Marks::Score(value),
        ValueRef::Integer(value) => Marks::Score(value as f64),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            match text.trim().parse::<f64>() {
                Ok(value) => Marks::Score(value),
                Err(_) => Marks::Unparsed(text.into_owned()),
            }
        }
        ValueRef::Blob(bytes) => Marks::Unparsed(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Null => Marks::Unparsed(String::new()),
    };
    Ok(marks)
}

/// The only constraint on the table is the roll primary key, so every
/// constraint violation on insert is a duplicate roll.
fn map_unique_constraint(err: SqlError, roll: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::Conflict {
            roll: roll.to_string(),
        }
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_store;

    fn seeded() -> Connection {
        let conn = open_memory_store().unwrap();
        insert_student(&conn, "Alice", "R1", 88.5).unwrap();
        insert_student(&conn, "Bob", "R2", 91.0).unwrap();
        conn
    }

    #[test]
    fn inserted_student_can_be_found() {
        let conn = seeded();
        assert_eq!(find_student(&conn, "R1").unwrap(), Student::new("Alice", "R1", 88.5));
    }

    #[test]
    fn duplicate_roll_conflicts_without_mutation() {
        let conn = seeded();
        let err = insert_student(&conn, "Carl", "R1", 70.0).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref roll } if roll == "R1"));
        assert_eq!(count_students(&conn).unwrap(), 2);
        assert_eq!(find_student(&conn, "R1").unwrap(), Student::new("Alice", "R1", 88.5));
    }

    #[test]
    fn missing_roll_is_not_found() {
        let conn = seeded();
        assert!(matches!(find_student(&conn, "R9"), Err(StoreError::NotFound { .. })));
        assert!(matches!(delete_student(&conn, "R9"), Err(StoreError::NotFound { .. })));
        assert!(matches!(
            update_student(&conn, "R9", Some("Zed"), None),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(count_students(&conn).unwrap(), 2);
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let conn = seeded();
        update_student(&conn, "R1", None, Some(95.0)).unwrap();
        assert_eq!(find_student(&conn, "R1").unwrap(), Student::new("Alice", "R1", 95.0));

        update_student(&conn, "R1", Some("Alicia"), None).unwrap();
        assert_eq!(find_student(&conn, "R1").unwrap(), Student::new("Alicia", "R1", 95.0));
    }

    #[test]
    fn count_tracks_inserts_and_deletes() {
        let conn = open_memory_store().unwrap();
        assert_eq!(count_students(&conn).unwrap(), 0);
        insert_student(&conn, "Alice", "R1", 88.5).unwrap();
        insert_student(&conn, "Bob", "R2", 91.0).unwrap();
        insert_student(&conn, "Cleo", "R3", 64.0).unwrap();
        delete_student(&conn, "R2").unwrap();
        assert_eq!(count_students(&conn).unwrap(), 2);
        assert!(matches!(find_student(&conn, "R2"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn listing_honours_sort_order() {
        let conn = open_memory_store().unwrap();
        insert_student(&conn, "Carl", "R3", 70.0).unwrap();
        insert_student(&conn, "Alice", "R1", 88.5).unwrap();
        insert_student(&conn, "Bob", "R2", 91.0).unwrap();

        let rolls = |order| -> Vec<String> {
            fetch_students(&conn, order)
                .unwrap()
                .into_iter()
                .map(|s| s.roll)
                .collect()
        };

        assert_eq!(rolls(SortOrder::None), ["R3", "R1", "R2"]);
        assert_eq!(rolls(SortOrder::ByNameAsc), ["R1", "R2", "R3"]);
        assert_eq!(rolls(SortOrder::ByMarksDesc), ["R2", "R1", "R3"]);
    }

    #[test]
    fn marks_sort_numerically_not_lexically() {
        let conn = open_memory_store().unwrap();
        insert_student(&conn, "Low", "R1", 9.0).unwrap();
        insert_student(&conn, "High", "R2", 100.0).unwrap();
        let names: Vec<_> = fetch_students(&conn, SortOrder::ByMarksDesc)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["High", "Low"]);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let conn = open_memory_store().unwrap();
        assert!(fetch_students(&conn, SortOrder::None).unwrap().is_empty());
    }

    #[test]
    fn legacy_text_marks_are_parsed() {
        let conn = open_memory_store().unwrap();
        conn.execute(
            "INSERT INTO students (name, roll, marks) VALUES ('Old', 'L1', ' 72 ')",
            [],
        )
        .unwrap();
        assert_eq!(find_student(&conn, "L1").unwrap().marks, Marks::Score(72.0));
    }

    #[test]
    fn unparsable_legacy_marks_do_not_break_the_table() {
        let conn = open_memory_store().unwrap();
        conn.execute_batch(
            "INSERT INTO students (name, roll, marks) VALUES ('Old', 'L1', 'abc');
             INSERT INTO students (name, roll, marks) VALUES ('Ok', 'L2', 50);",
        )
        .unwrap();

        let listed = fetch_students(&conn, SortOrder::ByMarksDesc).unwrap();
        assert_eq!(listed.len(), 2);
        let old = find_student(&conn, "L1").unwrap();
        assert_eq!(old.marks, Marks::Unparsed("abc".to_string()));

        update_student(&conn, "L1", Some("Older"), None).unwrap();
        assert_eq!(find_student(&conn, "L1").unwrap().name, "Older");
        update_student(&conn, "L1", None, Some(61.0)).unwrap();
        assert_eq!(find_student(&conn, "L1").unwrap().marks, Marks::Score(61.0));

        delete_student(&conn, "L1").unwrap();
        assert_eq!(count_students(&conn).unwrap(), 1);
    }
}
