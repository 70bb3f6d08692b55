//! Append-only credential ledger: one `username token` line per account.
//!
//! # Invariants
//! - Usernames are unique and compared case-sensitively.
//! - Lookups take the first line whose username matches.
//! - Unknown user and wrong secret are indistinguishable to callers.

use super::verifier::{CredentialVerifier, XorHexVerifier};
use super::{AuthError, AuthResult};
use crate::activity::ActivityLog;
use crate::model::user::validate_username;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Credential ledger plus the activity log used to open new accounts.
pub struct CredentialStore<V: CredentialVerifier = XorHexVerifier> {
    ledger_path: PathBuf,
    activity: ActivityLog,
    verifier: V,
}

impl CredentialStore<XorHexVerifier> {
    pub fn new(ledger_path: impl Into<PathBuf>, activity: ActivityLog) -> Self {
        Self::with_verifier(ledger_path, activity, XorHexVerifier)
    }
}

impl<V: CredentialVerifier> CredentialStore<V> {
    pub fn with_verifier(
        ledger_path: impl Into<PathBuf>,
        activity: ActivityLog,
        verifier: V,
    ) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            activity,
            verifier,
        }
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Creates the ledger with one admin entry when it does not exist yet.
    ///
    /// Returns whether the ledger was created.
    pub fn bootstrap(&self, admin_username: &str, admin_secret: &str) -> AuthResult<bool> {
        if self.ledger_path.exists() {
            return Ok(false);
        }
        validate_username(admin_username)?;

        let line = self.entry_line(admin_username, admin_secret);
        fs::write(&self.ledger_path, line).map_err(|err| self.io_error(err))?;
        info!("event=ledger_bootstrap module=auth status=ok");
        Ok(true)
    }

    /// Whether a ledger line names `username` exactly.
    pub fn exists(&self, username: &str) -> AuthResult<bool> {
        Ok(self.find_token(username)?.is_some())
    }

    /// Appends a new account. Returns `false` if `username` is taken.
    ///
    /// On success the user's activity file is created with a marker line.
    pub fn register(&self, username: &str, secret: &str) -> AuthResult<bool> {
        validate_username(username)?;
        if self.exists(username)? {
            debug!("event=credential_register module=auth status=duplicate");
            return Ok(false);
        }

        let mut ledger = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ledger_path)
            .map_err(|err| self.io_error(err))?;
        ledger
            .write_all(self.entry_line(username, secret).as_bytes())
            .map_err(|err| self.io_error(err))?;
        drop(ledger);

        self.activity
            .write_marker(username, &format!("== User: {username} created =="))?;
        info!("event=credential_register module=auth status=ok");
        Ok(true)
    }

    /// Checks `secret` against the stored token for `username`.
    pub fn verify(&self, username: &str, secret: &str) -> AuthResult<bool> {
        let verified = match self.find_token(username)? {
            Some(token) => self.verifier.matches(secret, &token),
            None => false,
        };
        info!(
            "event=credential_verify module=auth status={}",
            if verified { "ok" } else { "rejected" }
        );
        Ok(verified)
    }

    fn entry_line(&self, username: &str, secret: &str) -> String {
        format!("{username} {}\n", self.verifier.seal(secret))
    }

    fn find_token(&self, username: &str) -> AuthResult<Option<String>> {
        let content = match fs::read(&self.ledger_path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        Ok(content.lines().find_map(|line| {
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some(name) if name == username => {
                    Some(tokens.next().unwrap_or_default().to_string())
                }
                _ => None,
            }
        }))
    }

    fn io_error(&self, source: std::io::Error) -> AuthError {
        AuthError::Io {
            path: self.ledger_path.clone(),
            source,
        }
    }
}
