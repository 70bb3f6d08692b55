//! Core logic for the student record manager.
//! The interactive shell only calls into the types exported here.

pub mod activity;
pub mod auth;
pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use activity::{ActivityError, ActivityLog, ActivityResult, LogEntry};
pub use auth::credential_store::CredentialStore;
pub use auth::obfuscator::{deobfuscate, obfuscate};
pub use auth::verifier::{CredentialVerifier, XorHexVerifier};
pub use auth::{AuthError, AuthResult};
pub use codec::record_line::{decode_line, encode_line, try_decode_line, CodecError};
pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Student, StudentDraft, StudentId, MAX_STUDENT_ID};
pub use model::user::{validate_username, Role, UsernameError};
pub use repo::storage::{FlatFileStorage, MemoryStorage, RecordStorage};
pub use repo::student_repo::{StudentRepository, StudentStore};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::session::{Session, SessionError, SessionResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
