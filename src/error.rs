use thiserror::Error;

/// Why a stored token could not be turned back into plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    /// Tag verification failed: wrong key, or the token was tampered with.
    #[error("invalid key or corrupted data")]
    Authentication,
    /// Not valid base64, or too short to hold a version byte, nonce and tag.
    #[error("malformed token")]
    Malformed,
    /// The leading version byte names a scheme this build does not know.
    #[error("unsupported token version {0}")]
    UnsupportedVersion(u8),
    /// Authenticated plaintext that is not UTF-8.
    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("incorrect master password")]
    AuthenticationFailure,

    #[error("too many failed attempts")]
    AttemptsExhausted,

    #[error("decryption failed: {0}")]
    DecryptionFailure(DecryptFailure),

    #[error("{0}")]
    MalformedInput(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("OS random generator unavailable")]
    RandomUnavailable,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("entry {0} not found")]
    EntryNotFound(u64),

    #[error("no entry ids left")]
    IdSpaceExhausted,

    #[error("credvault store already exists")]
    StoreExists,

    #[error("credvault store does not exist; run `credvault init` first")]
    StoreMissing,
}

impl VaultError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        VaultError::MalformedInput(msg.into())
    }
}
