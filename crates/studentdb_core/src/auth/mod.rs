//! Username/secret gate.
//!
//! # Responsibility
//! - Keep the append-only credential ledger.
//! - Verify login attempts without revealing which part was wrong.
//!
//! # Invariants
//! - Ledger entries are never rewritten or removed.
//! - Stored secrets go through a [`verifier::CredentialVerifier`]; the
//!   default one is reversible obfuscation, not security.

use crate::activity::ActivityError;
use crate::model::user::UsernameError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod credential_store;
pub mod obfuscator;
pub mod verifier;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidUsername(UsernameError),
    Activity(ActivityError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "credential ledger `{}`: {source}", path.display())
            }
            Self::InvalidUsername(err) => write!(f, "{err}"),
            Self::Activity(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidUsername(err) => Some(err),
            Self::Activity(err) => Some(err),
        }
    }
}

impl From<UsernameError> for AuthError {
    fn from(value: UsernameError) -> Self {
        Self::InvalidUsername(value)
    }
}

impl From<ActivityError> for AuthError {
    fn from(value: ActivityError) -> Self {
        match value {
            ActivityError::InvalidUsername(err) => Self::InvalidUsername(err),
            other => Self::Activity(other),
        }
    }
}
