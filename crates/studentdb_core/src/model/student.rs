//! Student record model.
//!
//! # Invariants
//! - `id > 0` for every record held by a loaded store.
//! - `id` never changes after assignment; updates replace the other fields.

use serde::{Deserialize, Serialize};

/// Store-assigned record identifier. `0` is reserved for invalid records.
pub type StudentId = u32;

/// Highest id a record may carry. `StudentId::MAX` stays free so the next-id
/// counter always fits.
pub const MAX_STUDENT_ID: StudentId = StudentId::MAX - 1;

/// One persisted student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: i32,
    pub branch: String,
    pub cgpa: f64,
}

/// Caller-supplied record fields for add and update paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub age: i32,
    pub branch: String,
    pub cgpa: f64,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, age: i32, branch: impl Into<String>, cgpa: f64) -> Self {
        Self {
            name: name.into(),
            age,
            branch: branch.into(),
            cgpa,
        }
    }
}

impl Student {
    /// Builds a record from draft fields under a store-assigned id.
    pub fn from_draft(id: StudentId, draft: StudentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            branch: draft.branch,
            cgpa: draft.cgpa,
        }
    }

    /// Sentinel returned when a line cannot be decoded.
    pub fn invalid() -> Self {
        Self {
            id: 0,
            name: String::new(),
            age: 0,
            branch: String::new(),
            cgpa: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.id > 0
    }

    /// Overwrites every field except `id`.
    pub fn apply(&mut self, draft: StudentDraft) {
        self.name = draft.name;
        self.age = draft.age;
        self.branch = draft.branch;
        self.cgpa = draft.cgpa;
    }
}
