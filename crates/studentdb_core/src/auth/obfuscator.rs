//! Reversible secret masking: repeating-key XOR rendered as uppercase hex.
//!
//! This is a placeholder for compatibility with existing ledgers. Anyone with
//! the ledger and this file recovers every secret.

/// Fixed masking key, cycled over the secret bytes.
pub const OBFUSCATION_KEY: &[u8] = b"key123";

/// Masks `secret` into a printable token of `2 * secret.len()` hex digits.
pub fn obfuscate(secret: &[u8]) -> String {
    hex::encode_upper(xor_with_key(secret))
}

/// Inverts [`obfuscate`].
///
/// Returns an empty vector when `token` has odd length or is not hex.
pub fn deobfuscate(token: &str) -> Vec<u8> {
    if token.len() % 2 != 0 {
        return Vec::new();
    }
    match hex::decode(token) {
        Ok(masked) => xor_with_key(&masked),
        Err(_) => Vec::new(),
    }
}

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(OBFUSCATION_KEY.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}
