//! Logged-in session over the record store.
//!
//! # Responsibility
//! - Gate admin-only operations by role.
//! - Append exactly one activity line per performed operation.
//!
//! # Invariants
//! - The activity line is written after the store call succeeds.
//! - A denied operation touches neither the store nor the activity log.

use crate::activity::{ActivityError, ActivityLog};
use crate::model::student::{Student, StudentDraft, StudentId};
use crate::model::user::Role;
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    PermissionDenied {
        username: String,
        action: &'static str,
    },
    Repo(RepoError),
    Activity(ActivityError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied { username, action } => {
                write!(f, "user `{username}` is not allowed to {action}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Activity(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied { .. } => None,
            Self::Repo(err) => Some(err),
            Self::Activity(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ActivityError> for SessionError {
    fn from(value: ActivityError) -> Self {
        Self::Activity(value)
    }
}

/// One user's view of the store between login and logout.
pub struct Session<'a, R: StudentRepository> {
    repo: &'a mut R,
    activity: &'a ActivityLog,
    username: String,
    role: Role,
}

impl<'a, R: StudentRepository> Session<'a, R> {
    pub fn new(
        repo: &'a mut R,
        activity: &'a ActivityLog,
        username: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            repo,
            activity,
            username: username.into(),
            role,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn add_student(&mut self, draft: StudentDraft) -> SessionResult<Student> {
        self.require_admin("add students")?;
        let student = self.repo.add(draft)?;
        self.record(&format!("Added student ID {}", student.id))?;
        Ok(student)
    }

    pub fn list_students(&mut self) -> SessionResult<Vec<Student>> {
        let students = self.repo.list();
        self.record("Viewed all students")?;
        Ok(students)
    }

    pub fn search_by_name(&mut self, term: &str) -> SessionResult<Vec<Student>> {
        let students = self.repo.search_by_name(term);
        self.record(&format!("Searched name: {term}"))?;
        Ok(students)
    }

    pub fn find_by_id(&mut self, id: StudentId) -> SessionResult<Option<Student>> {
        let student = self.repo.find_by_id(id);
        self.record(&format!("Searched ID: {id}"))?;
        Ok(student)
    }

    /// Looks a record up without writing an activity line.
    ///
    /// Used to show the current values before an update, which is logged on its own.
    pub fn peek(&self, id: StudentId) -> Option<Student> {
        self.repo.find_by_id(id)
    }

    /// Returns `false` when no record has `id`.
    pub fn update_student(&mut self, id: StudentId, draft: StudentDraft) -> SessionResult<bool> {
        self.require_admin("update students")?;
        let updated = self.repo.update(id, draft)?;
        self.record(&format!("Updated ID {id}"))?;
        Ok(updated)
    }

    /// Returns `false` when no record has `id`.
    pub fn remove_student(&mut self, id: StudentId) -> SessionResult<bool> {
        self.require_admin("delete students")?;
        let removed = self.repo.remove_by_id(id)?;
        self.record(&format!("Deleted ID {id}"))?;
        Ok(removed)
    }

    /// Returns `false` when `path` cannot be read.
    pub fn import_records(&mut self, path: &Path) -> SessionResult<bool> {
        self.require_admin("import records")?;
        let imported = self.repo.import(path)?;
        self.record(&format!("Imported CSV: {}", path.display()))?;
        Ok(imported)
    }

    /// Ends the session with a final activity line.
    pub fn logout(self) -> SessionResult<()> {
        self.record("Logged out")
    }

    fn require_admin(&self, action: &'static str) -> SessionResult<()> {
        if self.role.is_admin() {
            return Ok(());
        }
        warn!("event=session_denied module=service status=denied action={action:?}");
        Err(SessionError::PermissionDenied {
            username: self.username.clone(),
            action,
        })
    }

    fn record(&self, message: &str) -> SessionResult<()> {
        self.activity.append(&self.username, message)?;
        Ok(())
    }
}
