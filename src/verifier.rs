//! Master-password verifier.
//!
//! Only a SHA-256 digest of the master password is ever persisted. The digest
//! gates entry to the vault; it is unrelated to the key that encrypts entries.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hex-encoded SHA-256 of the UTF-8 password bytes.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Recompute the digest of `candidate` and compare it to `stored_digest`
/// in constant time.
///
/// A stored digest that is not 64 hex characters never matches.
pub fn verify_master_password(candidate: &str, stored_digest: &str) -> bool {
    let Ok(stored) = hex::decode(stored_digest.trim()) else {
        return false;
    };
    let computed = Sha256::digest(candidate.as_bytes());
    computed.as_slice().ct_eq(stored.as_slice()).into()
}
