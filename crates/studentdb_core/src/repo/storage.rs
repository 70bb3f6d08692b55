//! Storage adapters behind the record store.
//!
//! # Responsibility
//! - Load every valid record and rewrite the full collection on save.
//! - Keep the file format inside the codec; adapters only move lines.
//!
//! # Invariants
//! - Loading never fails on malformed lines; they are dropped.
//! - Saving writes records in the given order, one `\n`-terminated line each.
//! - No handle outlives the call that opened it.

use super::{RepoError, RepoResult};
use crate::codec::record_line::{encode_line, try_decode_line};
use crate::model::student::Student;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Whole-collection persistence used by [`super::student_repo::StudentStore`].
pub trait RecordStorage {
    /// Returns every record with `id > 0`, in stored order.
    fn load_records(&mut self) -> RepoResult<Vec<Student>>;
    /// Replaces stored content with `records`.
    fn save_records(&mut self, records: &[Student]) -> RepoResult<()>;
}

/// Flat text file adapter: one encoded record per line, no header.
#[derive(Debug, Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
}

impl FlatFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FlatFileStorage {
    fn load_records(&mut self) -> RepoResult<Vec<Student>> {
        let started_at = Instant::now();
        if !self.path.exists() {
            File::create(&self.path).map_err(|err| RepoError::io(&self.path, err))?;
            info!("event=store_create module=repo status=ok");
        }

        let lines = read_lines(&self.path).map_err(|err| RepoError::io(&self.path, err))?;
        let records = decode_valid(&lines);
        info!(
            "event=store_load module=repo status=ok records={} skipped={} duration_ms={}",
            records.len(),
            non_blank(&lines).count() - records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    fn save_records(&mut self, records: &[Student]) -> RepoResult<()> {
        let started_at = Instant::now();
        write_records(&self.path, records).map_err(|err| {
            warn!("event=store_save module=repo status=error error={err}");
            RepoError::io(&self.path, err)
        })?;
        debug!(
            "event=store_save module=repo status=ok records={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Volatile adapter holding encoded lines in memory.
///
/// Records still pass through the line codec, so behavior matches the file
/// adapter without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    lines: Vec<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the adapter with raw lines, as if read from a file.
    pub fn with_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines written by the most recent save.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl RecordStorage for MemoryStorage {
    fn load_records(&mut self) -> RepoResult<Vec<Student>> {
        Ok(decode_valid(&self.lines))
    }

    fn save_records(&mut self, records: &[Student]) -> RepoResult<()> {
        self.lines = records.iter().map(encode_line).collect();
        Ok(())
    }
}

/// Reads a text file as lines; invalid UTF-8 is replaced, never rejected.
pub(crate) fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

pub(crate) fn non_blank(lines: &[String]) -> impl Iterator<Item = &str> {
    lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
}

fn decode_valid(lines: &[String]) -> Vec<Student> {
    non_blank(lines)
        .filter_map(|line| try_decode_line(line).ok())
        .filter(Student::is_valid)
        .collect()
}

fn write_records(path: &Path, records: &[Student]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(writer, "{}", encode_line(record))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::{FlatFileStorage, MemoryStorage, RecordStorage};
    use crate::model::student::{Student, StudentDraft};

    #[test]
    fn flat_file_is_created_empty_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let mut storage = FlatFileStorage::new(&path);

        assert!(storage.load_records().unwrap().is_empty());
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn flat_file_load_drops_blank_malformed_and_zero_id_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(
            &path,
            "1,\"Alice\",20,\"CS\",8.5\n\n  \nnot a record\n0,\"Zero\",1,\"X\",1\n2,\"Bob\",21,\"EE\",7\r\n",
        )
        .unwrap();

        let records = FlatFileStorage::new(&path).load_records().unwrap();
        let ids: Vec<u32> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(records[1].cgpa, 7.0);
    }

    #[test]
    fn flat_file_save_rewrites_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "stale content that must disappear\n").unwrap();

        let records = vec![Student::from_draft(1, StudentDraft::new("Alice", 20, "CS", 8.5))];
        FlatFileStorage::new(&path).save_records(&records).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1,\"Alice\",20,\"CS\",8.5\n"
        );
    }

    #[test]
    fn memory_storage_matches_file_semantics() {
        let mut storage = MemoryStorage::with_lines(["", "3,\"Cy\",22,\"ME\",6.5", "bad"]);
        let records = storage.load_records().unwrap();
        assert_eq!(records.len(), 1);

        storage.save_records(&records).unwrap();
        assert_eq!(storage.lines(), ["3,\"Cy\",22,\"ME\",6.5"]);
    }
}
