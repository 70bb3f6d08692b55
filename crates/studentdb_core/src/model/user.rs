//! Username rules and role routing.
//!
//! Usernames are stored as whitespace-delimited ledger tokens and also name
//! the per-user activity file, so both concerns constrain them here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Username of the account created on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Secret of the account created on first run.
pub const DEFAULT_ADMIN_SECRET: &str = "admin";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("valid ws regex"));
static PATH_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\]").expect("valid separator regex"));

/// Reason a username was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    Empty,
    ContainsWhitespace(String),
    ContainsPathSeparator(String),
    Reserved(String),
}

impl Display for UsernameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "username cannot be empty"),
            Self::ContainsWhitespace(name) => {
                write!(f, "username `{name}` must not contain whitespace")
            }
            Self::ContainsPathSeparator(name) => {
                write!(f, "username `{name}` must not contain `/` or `\\`")
            }
            Self::Reserved(name) => write!(f, "username `{name}` is reserved"),
        }
    }
}

impl Error for UsernameError {}

/// Checks that `username` can be stored in the ledger and name a log file.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if WHITESPACE_RE.is_match(username) {
        return Err(UsernameError::ContainsWhitespace(username.to_string()));
    }
    if PATH_SEPARATOR_RE.is_match(username) {
        return Err(UsernameError::ContainsPathSeparator(username.to_string()));
    }
    if username == "." || username == ".." {
        return Err(UsernameError::Reserved(username.to_string()));
    }
    Ok(())
}

/// Capability set granted to a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full record management: add, update, delete, import.
    Admin,
    /// Read-only access: list and search.
    Standard,
}

impl Role {
    /// Admin iff `username` equals the configured admin username exactly.
    pub fn for_username(username: &str, admin_username: &str) -> Self {
        if username == admin_username {
            Self::Admin
        } else {
            Self::Standard
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_username, Role, UsernameError};

    #[test]
    fn accepts_plain_usernames() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("Bob.Smith-2").is_ok());
    }

    #[test]
    fn rejects_unstorable_usernames() {
        assert_eq!(validate_username(""), Err(UsernameError::Empty));
        assert!(matches!(
            validate_username("bob smith"),
            Err(UsernameError::ContainsWhitespace(_))
        ));
        assert!(matches!(
            validate_username("tab\there"),
            Err(UsernameError::ContainsWhitespace(_))
        ));
        assert!(matches!(
            validate_username("../etc"),
            Err(UsernameError::ContainsPathSeparator(_))
        ));
        assert!(matches!(
            validate_username(".."),
            Err(UsernameError::Reserved(_))
        ));
    }

    #[test]
    fn role_is_exact_match_on_admin_username() {
        assert_eq!(Role::for_username("admin", "admin"), Role::Admin);
        assert_eq!(Role::for_username("Admin", "admin"), Role::Standard);
        assert!(!Role::for_username("bob", "admin").is_admin());
    }
}
