//! Encrypted secret tokens.
//!
//! A token is the value stored in a credential record's `password` field.
//! It carries everything needed for decryption except the key:
//!
//! ```text
//! base64url( VERSION (1) | NONCE (24) | CIPHERTEXT | TAG (16) )
//! ```
//!
//! The version byte is bound into the tag as associated data, so a token
//! cannot be relabelled as another scheme without failing authentication.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use zeroize::Zeroizing;

use super::{DerivedKey, NONCE_LEN, TAG_LEN, VER_LEN, aead};
use crate::error::{DecryptFailure, VaultError};

/// XChaCha20-Poly1305 keyed by an Argon2id-derived key.
pub const VERSION_V1: u8 = 1;

const MIN_LEN: usize = VER_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt a secret string into a self-contained token.
pub fn encrypt_secret(plaintext: &str, key: &DerivedKey) -> Result<String, VaultError> {
    let aad = [VERSION_V1];
    let (ciphertext, nonce) = aead::seal(key.as_bytes(), &aad, plaintext.as_bytes())?;

    let mut buf = Vec::with_capacity(MIN_LEN + plaintext.len());
    buf.push(VERSION_V1);
    buf.extend_from_slice(&nonce);
    buf.extend_from_slice(&ciphertext);

    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Decrypt a token produced by [`encrypt_secret`].
///
/// Fails closed: any key mismatch, bit flip or truncation is reported as
/// [`VaultError::DecryptionFailure`].
pub fn decrypt_secret(token: &str, key: &DerivedKey) -> Result<Zeroizing<String>, VaultError> {
    let data = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|_| VaultError::DecryptionFailure(DecryptFailure::Malformed))?;

    if data.len() < MIN_LEN {
        return Err(VaultError::DecryptionFailure(DecryptFailure::Malformed));
    }

    match data[0] {
        VERSION_V1 => decrypt_v1(&data, key),
        other => Err(VaultError::DecryptionFailure(
            DecryptFailure::UnsupportedVersion(other),
        )),
    }
}

fn decrypt_v1(data: &[u8], key: &DerivedKey) -> Result<Zeroizing<String>, VaultError> {
    let nonce: [u8; NONCE_LEN] = data[VER_LEN..VER_LEN + NONCE_LEN]
        .try_into()
        .map_err(|_| VaultError::DecryptionFailure(DecryptFailure::Malformed))?;

    let plaintext = aead::open(
        key.as_bytes(),
        &[VERSION_V1],
        &nonce,
        &data[VER_LEN + NONCE_LEN..],
    )?;

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| VaultError::DecryptionFailure(DecryptFailure::InvalidUtf8))?;
    Ok(Zeroizing::new(text.to_owned()))
}
