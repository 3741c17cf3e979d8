//! Cryptographic primitives for the vault.
//!
//! Provides key derivation, raw authenticated encryption and the
//! self-describing token format stored in credential records.

pub mod aead;
pub mod kdf;
pub mod token;

pub use aead::{generate_salt, secure_random};
pub use kdf::{DerivedKey, KdfParams, derive_key};
pub use token::{decrypt_secret, encrypt_secret};

/// Length of the per-installation salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (24 bytes for XChaCha20-Poly1305).
pub const NONCE_LEN: usize = 24;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;
/// Length of the token version field (1 byte).
pub const VER_LEN: usize = 1;
