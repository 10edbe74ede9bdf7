use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "student_records.db";
/// Diagnostics log written next to the database.
const LOG_FILE_NAME: &str = "student-records.log";

/// Filesystem locations the application reads and writes.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppPaths {
    /// Resolve every path relative to the user's home directory.
    pub fn resolve() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::under(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Lay the files out inside an explicit data directory.
    pub fn under(data_dir: PathBuf) -> Self {
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("failed to create data directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_inside_the_data_dir() {
        let paths = AppPaths::under(PathBuf::from("/tmp/roster"));
        assert_eq!(paths.db_path, PathBuf::from("/tmp/roster/student_records.db"));
        assert_eq!(paths.log_path, PathBuf::from("/tmp/roster/student-records.log"));
    }
}
