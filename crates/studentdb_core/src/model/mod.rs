//! Domain model for student records and user identities.
//!
//! # Responsibility
//! - Define the record shape persisted by the record store.
//! - Define username rules and the admin/standard role split.
//!
//! # Invariants
//! - A record id is assigned by the store, never by callers.
//! - Id `0` marks an invalid (undecodable) record.

pub mod student;
pub mod user;
