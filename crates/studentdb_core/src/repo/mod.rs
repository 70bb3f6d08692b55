//! Record repository contracts and storage adapters.
//!
//! # Responsibility
//! - Own the in-memory record collection and id assignment.
//! - Persist the whole collection through a swappable storage adapter.
//!
//! # Invariants
//! - Every mutation is persisted before the call returns.
//! - Callers only ever receive owned snapshots of records.

use crate::model::student::StudentId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod storage;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure of the store's own backing file.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No id at or below `MAX_STUDENT_ID` is left for `requested` new records.
    IdsExhausted { next_id: StudentId, requested: usize },
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "record file `{}`: {source}", path.display())
            }
            Self::IdsExhausted { next_id, requested } => write!(
                f,
                "cannot assign {requested} new id(s) starting at {next_id}: id space exhausted"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::IdsExhausted { .. } => None,
        }
    }
}
