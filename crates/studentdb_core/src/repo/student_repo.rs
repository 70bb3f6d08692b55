//! Student repository contract and the in-memory store implementing it.
//!
//! # Responsibility
//! - Assign ids, apply CRUD and search over the loaded collection.
//! - Persist the full collection after each mutation.
//!
//! # Invariants
//! - Ids are pairwise distinct; `next_id` starts at `max(id) + 1` per load.
//! - Deleted ids are not handed out again within a load cycle.
//! - Collection order is insertion order, which is also file order.
//! - Lookups return owned snapshots; mutation goes through `update`.
//! - A mutation whose save fails leaves the in-memory state as it was.

use super::storage::{non_blank, read_lines, FlatFileStorage, RecordStorage};
use super::{RepoError, RepoResult};
use crate::codec::record_line::decode_line;
use crate::model::student::{Student, StudentDraft, StudentId, MAX_STUDENT_ID};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Repository interface for student record operations.
pub trait StudentRepository {
    /// Discards in-memory state and loads it again from storage.
    fn reload(&mut self) -> RepoResult<()>;
    /// Writes the current collection to storage.
    fn save(&mut self) -> RepoResult<()>;
    fn add(&mut self, draft: StudentDraft) -> RepoResult<Student>;
    fn list(&self) -> Vec<Student>;
    fn find_by_id(&self, id: StudentId) -> Option<Student>;
    /// Returns `false` when no record had `id`; storage is untouched then.
    fn remove_by_id(&mut self, id: StudentId) -> RepoResult<bool>;
    /// Returns `false` when no record had `id`; storage is untouched then.
    fn update(&mut self, id: StudentId, draft: StudentDraft) -> RepoResult<bool>;
    fn search_by_name(&self, term: &str) -> Vec<Student>;
    /// Appends every non-blank line of `path` under fresh ids.
    ///
    /// Returns `false` when `path` cannot be read.
    fn import(&mut self, path: &Path) -> RepoResult<bool>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Id the next added or imported record will receive.
    fn next_id(&self) -> StudentId;
}

/// Record store over a [`RecordStorage`] adapter.
pub struct StudentStore<S: RecordStorage> {
    storage: S,
    records: Vec<Student>,
    next_id: StudentId,
}

impl StudentStore<FlatFileStorage> {
    /// Opens the flat record file at `path`, creating it when absent.
    pub fn open_file(path: impl Into<PathBuf>) -> RepoResult<Self> {
        Self::open(FlatFileStorage::new(path))
    }
}

impl<S: RecordStorage> StudentStore<S> {
    /// Creates a store and loads its collection from `storage`.
    pub fn open(storage: S) -> RepoResult<Self> {
        let mut store = Self {
            storage,
            records: Vec::new(),
            next_id: 1,
        };
        store.reload()?;
        Ok(store)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn refresh_next_id(&mut self) {
        self.next_id = match self.records.iter().map(|record| record.id).max() {
            Some(max) => max.saturating_add(1),
            None => 1,
        };
    }

    /// Checks that `count` consecutive ids from `next_id` stay within range.
    fn ensure_ids_available(&self, count: usize) -> RepoResult<()> {
        let last = u64::from(self.next_id) + count as u64;
        if count > 0 && last - 1 > u64::from(MAX_STUDENT_ID) {
            return Err(RepoError::IdsExhausted {
                next_id: self.next_id,
                requested: count,
            });
        }
        Ok(())
    }

    /// Persists the collection; on failure restores `records` and `next_id`.
    fn save_or_restore(&mut self, records: Vec<Student>, next_id: StudentId) -> RepoResult<()> {
        if let Err(err) = self.save() {
            self.records = records;
            self.next_id = next_id;
            return Err(err);
        }
        Ok(())
    }
}

impl<S: RecordStorage> StudentRepository for StudentStore<S> {
    fn reload(&mut self) -> RepoResult<()> {
        self.records = self.storage.load_records()?;
        self.refresh_next_id();
        Ok(())
    }

    fn save(&mut self) -> RepoResult<()> {
        self.storage.save_records(&self.records)
    }

    fn add(&mut self, draft: StudentDraft) -> RepoResult<Student> {
        self.ensure_ids_available(1)?;
        let previous = (self.records.clone(), self.next_id);
        let student = Student::from_draft(self.next_id, draft);
        self.next_id += 1;
        self.records.push(student.clone());
        self.save_or_restore(previous.0, previous.1)?;
        info!("event=student_add module=repo status=ok id={}", student.id);
        Ok(student)
    }

    fn list(&self) -> Vec<Student> {
        self.records.clone()
    }

    fn find_by_id(&self, id: StudentId) -> Option<Student> {
        self.records.iter().find(|record| record.id == id).cloned()
    }

    fn remove_by_id(&mut self, id: StudentId) -> RepoResult<bool> {
        if !self.records.iter().any(|record| record.id == id) {
            return Ok(false);
        }

        let previous = self.records.clone();
        let before = previous.len();
        self.records.retain(|record| record.id != id);
        self.save_or_restore(previous, self.next_id)?;
        info!(
            "event=student_remove module=repo status=ok id={} removed={}",
            id,
            before - self.records.len()
        );
        Ok(true)
    }

    fn update(&mut self, id: StudentId, draft: StudentDraft) -> RepoResult<bool> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return Ok(false);
        };

        let previous = self.records.clone();
        self.records[index].apply(draft);
        self.save_or_restore(previous, self.next_id)?;
        info!("event=student_update module=repo status=ok id={id}");
        Ok(true)
    }

    fn search_by_name(&self, term: &str) -> Vec<Student> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn import(&mut self, path: &Path) -> RepoResult<bool> {
        let lines = match read_lines(path) {
            Ok(lines) => lines,
            Err(err) => {
                warn!("event=store_import module=repo status=error error_code=source_unreadable error={err}");
                return Ok(false);
            }
        };

        // Undecodable rows are admitted as zeroed records under a fresh id.
        let decoded: Vec<Student> = non_blank(&lines).map(decode_line).collect();
        let imported = decoded.len();
        let degenerate = decoded.iter().filter(|record| !record.is_valid()).count();
        self.ensure_ids_available(imported)?;

        let previous = (self.records.clone(), self.next_id);
        for mut record in decoded {
            record.id = self.next_id;
            self.next_id += 1;
            self.records.push(record);
        }
        self.save_or_restore(previous.0, previous.1)?;
        info!(
            "event=store_import module=repo status=ok imported={} degenerate={}",
            imported, degenerate
        );
        Ok(true)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn next_id(&self) -> StudentId {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::{StudentRepository, StudentStore};
    use crate::model::student::{Student, StudentDraft, MAX_STUDENT_ID};
    use crate::repo::storage::{MemoryStorage, RecordStorage};
    use crate::repo::{RepoError, RepoResult};

    fn draft(name: &str) -> StudentDraft {
        StudentDraft::new(name, 20, "CS", 8.0)
    }

    /// Loads like `MemoryStorage` but refuses every save.
    struct ReadOnlyStorage(MemoryStorage);

    impl RecordStorage for ReadOnlyStorage {
        fn load_records(&mut self) -> RepoResult<Vec<Student>> {
            self.0.load_records()
        }

        fn save_records(&mut self, _records: &[Student]) -> RepoResult<()> {
            Err(RepoError::io(
                "students.csv",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn read_only_store() -> StudentStore<ReadOnlyStorage> {
        let storage = MemoryStorage::with_lines(["1,\"Alice\",20,\"CS\",8.5", "2,\"Bob\",21,\"EE\",7"]);
        StudentStore::open(ReadOnlyStorage(storage)).unwrap()
    }

    #[test]
    fn next_id_starts_after_highest_loaded_id() {
        let storage = MemoryStorage::with_lines(["7,\"A\",1,\"B\",1", "3,\"C\",1,\"D\",1"]);
        let store = StudentStore::open(storage).unwrap();
        assert_eq!(store.next_id(), 8);
    }

    #[test]
    fn empty_store_starts_at_one() {
        let mut store = StudentStore::open(MemoryStorage::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.add(draft("Alice")).unwrap().id, 1);
    }

    #[test]
    fn removing_highest_id_does_not_rewind_counter() {
        let mut store = StudentStore::open(MemoryStorage::new()).unwrap();
        let last = store.add(draft("A")).unwrap();
        assert!(store.remove_by_id(last.id).unwrap());
        assert_eq!(store.add(draft("B")).unwrap().id, 2);
    }

    #[test]
    fn reload_recomputes_counter_from_storage() {
        let mut store = StudentStore::open(MemoryStorage::new()).unwrap();
        store.add(draft("A")).unwrap();
        let second = store.add(draft("B")).unwrap();
        store.remove_by_id(second.id).unwrap();

        store.reload().unwrap();
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn find_by_id_returns_detached_snapshot() {
        let mut store = StudentStore::open(MemoryStorage::new()).unwrap();
        let added = store.add(draft("Alice")).unwrap();

        let mut snapshot = store.find_by_id(added.id).unwrap();
        snapshot.name = "Mallory".to_string();

        assert_eq!(store.find_by_id(added.id).unwrap().name, "Alice");
        assert!(store.find_by_id(99).is_none());
    }

    #[test]
    fn search_lowercases_non_ascii_names() {
        let mut store = StudentStore::open(MemoryStorage::new()).unwrap();
        store.add(draft("ÉLODIE")).unwrap();
        assert_eq!(store.search_by_name("élo").len(), 1);
    }

    #[test]
    fn highest_representable_id_loads_and_blocks_add() {
        let line = format!("{MAX_STUDENT_ID},\"Top\",20,\"CS\",8");
        let mut store = StudentStore::open(MemoryStorage::with_lines([line.clone()])).unwrap();
        assert_eq!(store.next_id(), MAX_STUDENT_ID + 1);

        let err = store.add(draft("Overflow")).unwrap_err();
        assert!(matches!(err, RepoError::IdsExhausted { requested: 1, .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), MAX_STUDENT_ID + 1);
        assert_eq!(store.storage().lines(), &[line][..]);
    }

    #[test]
    fn id_beyond_limit_is_skipped_on_load() {
        let storage = MemoryStorage::with_lines(["4294967295,\"Max\",20,\"CS\",8", "3,\"C\",1,\"D\",1"]);
        let mut store = StudentStore::open(storage).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.add(draft("Next")).unwrap().id, 4);
    }

    #[test]
    fn import_past_id_limit_fails_without_partial_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("batch.csv");
        std::fs::write(&source, "0,\"A\",1,\"X\",1\n0,\"B\",1,\"X\",1\n0,\"C\",1,\"X\",1\n").unwrap();

        let seed = format!("{},\"Near\",20,\"CS\",8", MAX_STUDENT_ID - 1);
        let mut store = StudentStore::open(MemoryStorage::with_lines([seed])).unwrap();

        let err = store.import(&source).unwrap_err();
        assert!(matches!(err, RepoError::IdsExhausted { requested: 3, .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), MAX_STUDENT_ID);
    }

    #[test]
    fn failed_save_rolls_back_add() {
        let mut store = read_only_store();
        assert!(store.add(draft("Carol")).is_err());
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
        assert!(store.find_by_id(3).is_none());
    }

    #[test]
    fn failed_save_rolls_back_update_and_remove() {
        let mut store = read_only_store();
        let before = store.list();

        assert!(store.update(1, draft("Mallory")).is_err());
        assert_eq!(store.find_by_id(1).unwrap().name, "Alice");

        assert!(store.remove_by_id(2).is_err());
        assert_eq!(store.list(), before);
    }

    #[test]
    fn failed_save_rolls_back_import() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("batch.csv");
        std::fs::write(&source, "9,\"Dana\",22,\"ME\",6.5\n").unwrap();

        let mut store = read_only_store();
        assert!(store.import(&source).is_err());
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
    }
}
