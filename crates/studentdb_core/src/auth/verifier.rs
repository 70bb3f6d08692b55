//! Secret sealing strategy used by the credential store.

use super::obfuscator::{deobfuscate, obfuscate};

/// Turns secrets into ledger tokens and checks attempts against them.
///
/// A token is stored as one ledger word, so it must not contain whitespace.
pub trait CredentialVerifier {
    fn seal(&self, secret: &str) -> String;
    fn matches(&self, secret: &str, token: &str) -> bool;
}

/// Default verifier backed by [`obfuscate`]/[`deobfuscate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XorHexVerifier;

impl CredentialVerifier for XorHexVerifier {
    fn seal(&self, secret: &str) -> String {
        obfuscate(secret.as_bytes())
    }

    fn matches(&self, secret: &str, token: &str) -> bool {
        deobfuscate(token) == secret.as_bytes()
    }
}
