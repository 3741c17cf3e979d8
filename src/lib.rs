//! Offline, single-user credential vault.
//!
//! Credentials are encrypted one by one under a key derived from the master
//! password with Argon2id and a per-installation salt. Only a digest of the
//! master password is stored. Password strength is scored against length,
//! character classes, sequential runs and a denylist of common passwords.

pub mod config;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod storage;
pub mod store;
pub mod strength;
pub mod verifier;

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

pub use crate::config::VaultConfig;
pub use crate::crypto::{DerivedKey, KdfParams};
pub use crate::error::{DecryptFailure, VaultError};
pub use crate::generator::{GeneratorOptions, generate_password};
pub use crate::storage::Storage;
pub use crate::store::{CredentialEntry, Store};
pub use crate::strength::{
    Analysis, CommonPasswordSet, Feedback, Rating, StrengthEvaluator, StrengthResult,
};

/// Shortest master password accepted at setup.
pub const MIN_MASTER_PASSWORD_LEN: usize = 8;

/// Wrong master-password guesses allowed per interactive login.
pub const MAX_LOGIN_ATTEMPTS: u32 = 4;

/// An unlocked vault session.
///
/// Holds the derived key for as long as the session lives; dropping the
/// session (or calling [`Vault::lock`]) zeroes it.
pub struct Vault {
    store: Store,
    storage: Storage,
    key: DerivedKey,
    evaluator: StrengthEvaluator,
}

/// A decrypted entry together with a fresh strength evaluation.
pub struct RevealedEntry<'a> {
    pub entry: &'a CredentialEntry,
    pub password: Zeroizing<String>,
    pub analysis: Analysis,
}

impl Vault {
    /// First-run setup: store the verifier and a new random salt, and start
    /// an unlocked session over an empty store.
    pub fn init(
        storage: Storage,
        password: Zeroizing<String>,
        kdf: KdfParams,
        evaluator: StrengthEvaluator,
    ) -> Result<Self> {
        if !Self::is_first_run(&storage)? {
            return Err(VaultError::StoreExists.into());
        }
        if password.chars().count() < MIN_MASTER_PASSWORD_LEN {
            return Err(VaultError::malformed(format!(
                "master password must be at least {MIN_MASTER_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let salt = crypto::generate_salt()?;
        let key =
            crypto::derive_key(&password, &salt, kdf).context("failed to derive encryption key")?;
        let config = VaultConfig::new(verifier::hash_password(&password), salt, kdf);
        drop(password);

        let vault = Self {
            store: Store::new(),
            storage,
            key,
            evaluator,
        };
        vault.storage.save_config(&config.to_json()?)?;
        vault.save()?;

        info!(dir = %vault.storage.dir().display(), "vault created");
        Ok(vault)
    }

    /// `true` while no master password has been set: the config file is
    /// absent or carries an empty digest. A config that cannot be read or
    /// parsed is an error, so `init` never overwrites it.
    pub fn is_first_run(storage: &Storage) -> Result<bool> {
        if !storage.exists() {
            return Ok(true);
        }
        let config = storage
            .load_config()
            .and_then(|data| VaultConfig::from_json(&data))
            .context("vault config is unreadable; refusing to overwrite it")?;
        Ok(config.is_first_run())
    }

    /// Verify `password` against the stored digest, then derive the key and
    /// load the entries.
    pub fn open(
        storage: Storage,
        password: Zeroizing<String>,
        evaluator: StrengthEvaluator,
    ) -> Result<Self> {
        if !storage.exists() {
            return Err(VaultError::StoreMissing.into());
        }

        let config = VaultConfig::from_json(&storage.load_config()?)?;
        if config.is_first_run() {
            return Err(VaultError::StoreMissing.into());
        }

        if !verifier::verify_master_password(&password, config.master_password_hash()) {
            warn!("master password verification failed");
            return Err(VaultError::AuthenticationFailure.into());
        }

        let key = crypto::derive_key(&password, &config.salt()?, config.kdf())
            .context("unable to derive encryption key")?;
        drop(password);

        let store = match storage.load_entries()? {
            Some(data) => serde_json::from_slice(&data).context("failed to parse entries file")?,
            None => Store::new(),
        };

        debug!(entries = store.len(), "vault unlocked");
        Ok(Self {
            store,
            storage,
            key,
            evaluator,
        })
    }

    /// [`Vault::open`] with retries: a wrong master password is asked for
    /// again up to [`MAX_LOGIN_ATTEMPTS`] times when `interactive`, and
    /// fails straight away otherwise. `on_retry` gets the attempts left.
    pub fn unlock(
        storage: &Storage,
        evaluator: &StrengthEvaluator,
        interactive: bool,
        mut read_password: impl FnMut() -> Result<Zeroizing<String>>,
        mut on_retry: impl FnMut(u32),
    ) -> Result<Self> {
        let mut remaining = MAX_LOGIN_ATTEMPTS;
        loop {
            let password = read_password()?;
            match Self::open(storage.clone(), password, evaluator.clone()) {
                Ok(vault) => return Ok(vault),
                Err(e)
                    if interactive
                        && matches!(
                            e.downcast_ref::<VaultError>(),
                            Some(VaultError::AuthenticationFailure)
                        ) =>
                {
                    remaining -= 1;
                    if remaining == 0 {
                        warn!(attempts = MAX_LOGIN_ATTEMPTS, "login attempts exhausted");
                        return Err(VaultError::AttemptsExhausted.into());
                    }
                    on_retry(remaining);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// End the session, zeroing the key.
    pub fn lock(self) {
        debug!("vault locked");
    }

    pub fn evaluator(&self) -> &StrengthEvaluator {
        &self.evaluator
    }

    /// Encrypt and store a new credential; returns its id.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<u64> {
        require_non_empty("service", service)?;
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        let token = crypto::encrypt_secret(password, &self.key)?;
        let rating = self.evaluator.calculate_strength(password).rating;
        let id = self
            .store
            .insert(service.trim(), username.trim(), token, rating)?;

        debug!(id, service = service.trim(), "entry added");
        Ok(id)
    }

    /// Decrypt an entry and score the recovered password against the
    /// current denylist. The cached rating on the record is left untouched.
    pub fn reveal(&self, id: u64) -> Result<RevealedEntry<'_>> {
        let entry = self.store.get(id).ok_or(VaultError::EntryNotFound(id))?;
        let password = crypto::decrypt_secret(entry.token(), &self.key)?;
        let analysis = self.evaluator.analyze(&password);
        Ok(RevealedEntry {
            entry,
            password,
            analysis,
        })
    }

    /// Replace an entry's password, re-caching its rating.
    pub fn update_password(&mut self, id: u64, password: &str) -> Result<()> {
        require_non_empty("password", password)?;

        let token = crypto::encrypt_secret(password, &self.key)?;
        let rating = self.evaluator.calculate_strength(password).rating;
        self.store.update_secret(id, token, rating)?;

        debug!(id, "entry updated");
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<CredentialEntry> {
        let removed = self.store.remove(id)?;
        debug!(id, service = removed.service(), "entry removed");
        Ok(removed)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CredentialEntry> {
        self.store.entries()
    }

    pub fn find(&self, service: &str) -> impl Iterator<Item = &CredentialEntry> {
        self.store.find_by_service(service)
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.store)?;
        self.storage.save_entries(&data)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        return Err(VaultError::malformed(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn default_storage() -> Result<Storage> {
    let project_dirs = ProjectDirs::from("", "", "credvault")
        .context("could not determine platform directories")?;

    Ok(Storage::new(project_dirs.data_dir()))
}

/// Resolve the denylist: an explicit file if given, otherwise the built-in list.
pub fn load_common_passwords(path: Option<PathBuf>) -> CommonPasswordSet {
    match path {
        Some(p) => CommonPasswordSet::load(&p),
        None => CommonPasswordSet::builtin(),
    }
}
