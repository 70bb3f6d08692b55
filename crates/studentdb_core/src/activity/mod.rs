//! Per-user activity trails.
//!
//! # Responsibility
//! - Append timestamped, human-readable events to one file per user.
//! - Read those events back for display and tests.
//!
//! # Invariants
//! - Files are append-only; existing lines are never rewritten.
//! - The record store never writes here; callers log after acting.

use crate::model::user::UsernameError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod trail;

pub use self::trail::{ActivityLog, LogEntry, TIMESTAMP_FORMAT};

pub type ActivityResult<T> = Result<T, ActivityError>;

#[derive(Debug)]
pub enum ActivityError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidUsername(UsernameError),
}

impl Display for ActivityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "activity log `{}`: {source}", path.display())
            }
            Self::InvalidUsername(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ActivityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidUsername(err) => Some(err),
        }
    }
}

impl From<UsernameError> for ActivityError {
    fn from(value: UsernameError) -> Self {
        Self::InvalidUsername(value)
    }
}
