//! Registration and login use-cases.

use crate::auth::credential_store::CredentialStore;
use crate::auth::verifier::{CredentialVerifier, XorHexVerifier};
use crate::auth::AuthResult;
use crate::model::user::Role;

const REGISTERED_MESSAGE: &str = "Registered";
const LOGGED_IN_MESSAGE: &str = "Logged in";

/// Account facade over the credential store.
pub struct AccountService<V: CredentialVerifier = XorHexVerifier> {
    credentials: CredentialStore<V>,
    admin_username: String,
}

impl<V: CredentialVerifier> AccountService<V> {
    pub fn new(credentials: CredentialStore<V>, admin_username: impl Into<String>) -> Self {
        Self {
            credentials,
            admin_username: admin_username.into(),
        }
    }

    pub fn credentials(&self) -> &CredentialStore<V> {
        &self.credentials
    }

    /// Seeds the ledger with the admin account on first run.
    pub fn bootstrap(&self, admin_secret: &str) -> AuthResult<bool> {
        self.credentials.bootstrap(&self.admin_username, admin_secret)
    }

    /// Registers `username`; `false` means the name is taken.
    pub fn register(&self, username: &str, secret: &str) -> AuthResult<bool> {
        if !self.credentials.register(username, secret)? {
            return Ok(false);
        }
        self.credentials
            .activity()
            .append(username, REGISTERED_MESSAGE)?;
        Ok(true)
    }

    /// Returns the user's role when the credentials match, `None` otherwise.
    pub fn login(&self, username: &str, secret: &str) -> AuthResult<Option<Role>> {
        if !self.credentials.verify(username, secret)? {
            return Ok(None);
        }
        self.credentials
            .activity()
            .append(username, LOGGED_IN_MESSAGE)?;
        Ok(Some(Role::for_username(username, &self.admin_username)))
    }
}

#[cfg(test)]
mod tests {
    use super::AccountService;
    use crate::activity::ActivityLog;
    use crate::auth::credential_store::CredentialStore;
    use crate::model::user::Role;

    fn service_in(dir: &std::path::Path) -> AccountService {
        let credentials =
            CredentialStore::new(dir.join("users.txt"), ActivityLog::new(dir.join("user_logs")));
        AccountService::new(credentials, "admin")
    }

    #[test]
    fn login_routes_admin_and_standard_roles() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        service.bootstrap("admin").unwrap();
        service.register("bob", "pw1").unwrap();

        assert_eq!(service.login("admin", "admin").unwrap(), Some(Role::Admin));
        assert_eq!(service.login("bob", "pw1").unwrap(), Some(Role::Standard));
        assert_eq!(service.login("bob", "nope").unwrap(), None);
        assert_eq!(service.login("ghost", "pw1").unwrap(), None);
    }

    #[test]
    fn register_and_login_leave_activity_lines() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        assert!(service.register("bob", "pw1").unwrap());
        assert!(!service.register("bob", "pw2").unwrap());
        service.login("bob", "pw1").unwrap();
        service.login("bob", "wrong").unwrap();

        let activity = service.credentials().activity();
        let messages: Vec<String> = activity
            .entries("bob")
            .unwrap()
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        assert_eq!(messages, vec!["Registered", "Logged in"]);

        let raw = std::fs::read_to_string(activity.log_path("bob").unwrap()).unwrap();
        assert!(raw.starts_with("== User: bob created ==\n"));
    }
}
