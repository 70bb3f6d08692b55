//! File-backed activity log: `<dir>/<username>.txt`.
//!
//! Line format is `YYYY-MM-DD HH:MM:SS - message` in local time. Marker lines
//! written at account creation carry no timestamp.

use super::{ActivityError, ActivityResult};
use crate::model::user::validate_username;
use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// `chrono` format of the timestamp prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = " - ";
const LOG_FILE_EXTENSION: &str = "txt";

/// One parsed activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

/// Directory of per-user activity files.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    dir: PathBuf,
}

impl ActivityLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `username`'s activity file.
    pub fn log_path(&self, username: &str) -> ActivityResult<PathBuf> {
        validate_username(username)?;
        Ok(self
            .dir
            .join(format!("{username}.{LOG_FILE_EXTENSION}")))
    }

    /// Appends `<local timestamp> - <message>` to `username`'s file.
    pub fn append(&self, username: &str, message: &str) -> ActivityResult<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        self.append_line(username, &format!("{timestamp}{SEPARATOR}{message}"))
    }

    /// Appends an untimestamped marker line, e.g. account creation.
    pub fn write_marker(&self, username: &str, marker: &str) -> ActivityResult<()> {
        self.append_line(username, marker)
    }

    /// Timestamped entries of `username`, oldest first.
    ///
    /// A missing file yields no entries; marker and malformed lines are skipped.
    pub fn entries(&self, username: &str) -> ActivityResult<Vec<LogEntry>> {
        let path = self.log_path(username)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(&path, err)),
        };

        Ok(content.lines().filter_map(parse_entry).collect())
    }

    fn append_line(&self, username: &str, line: &str) -> ActivityResult<()> {
        let path = self.log_path(username)?;
        fs::create_dir_all(&self.dir).map_err(|err| io_error(&self.dir, err))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| io_error(&path, err))?;
        writeln!(file, "{line}").map_err(|err| io_error(&path, err))
    }
}

fn parse_entry(line: &str) -> Option<LogEntry> {
    let (timestamp, message) = line.split_once(SEPARATOR)?;
    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some(LogEntry {
        timestamp,
        message: message.to_string(),
    })
}

fn io_error(path: &Path, source: std::io::Error) -> ActivityError {
    ActivityError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_entry, ActivityLog};
    use crate::activity::ActivityError;

    #[test]
    fn append_creates_directory_and_timestamped_line() {
        let root = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(root.path().join("user_logs"));

        log.append("bob", "Logged in").unwrap();

        let content = std::fs::read_to_string(log.log_path("bob").unwrap()).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.ends_with(" - Logged in"));
        assert_eq!(line.len(), "YYYY-MM-DD HH:MM:SS - Logged in".len());
    }

    #[test]
    fn entries_skip_markers_and_keep_order() {
        let root = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(root.path());

        log.write_marker("bob", "== User: bob created ==").unwrap();
        log.append("bob", "first").unwrap();
        log.append("bob", "second - with dash").unwrap();

        let messages: Vec<String> = log
            .entries("bob")
            .unwrap()
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        assert_eq!(messages, vec!["first", "second - with dash"]);
    }

    #[test]
    fn missing_file_has_no_entries() {
        let root = tempfile::tempdir().unwrap();
        assert!(ActivityLog::new(root.path()).entries("nobody").unwrap().is_empty());
    }

    #[test]
    fn path_escaping_usernames_are_rejected() {
        let log = ActivityLog::new("/tmp/unused");
        assert!(matches!(
            log.append("../evil", "x"),
            Err(ActivityError::InvalidUsername(_))
        ));
    }

    #[test]
    fn parse_entry_rejects_untimestamped_lines() {
        assert!(parse_entry("== User: bob created ==").is_none());
        let entry = parse_entry("2024-02-29 23:59:59 - Viewed all students").unwrap();
        assert_eq!(entry.message, "Viewed all students");
    }
}
