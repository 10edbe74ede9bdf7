//! Persistence module split across logical submodules.

mod connection;
mod students;

pub use connection::{close_store, ensure_schema, open_memory_store, open_store};
pub use students::{
    count_students, delete_student, fetch_students, find_student, insert_student,
    update_student, StoreError,
};
