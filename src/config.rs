//! Persisted vault configuration: the master-password verifier digest, the
//! per-installation key-derivation salt and the Argon2id cost used with it.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::crypto::{KdfParams, SALT_LEN};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    version: u32,
    master_password_hash: String,
    salt: String,
    kdf: KdfParams,
}

impl VaultConfig {
    pub fn new(master_password_hash: String, salt: [u8; SALT_LEN], kdf: KdfParams) -> Self {
        Self {
            version: CONFIG_VERSION,
            master_password_hash,
            salt: hex::encode(salt),
            kdf,
        }
    }

    pub fn master_password_hash(&self) -> &str {
        &self.master_password_hash
    }

    /// `true` when no master password has been set up yet.
    pub fn is_first_run(&self) -> bool {
        self.master_password_hash.is_empty()
    }

    pub fn salt(&self) -> Result<[u8; SALT_LEN]> {
        let bytes = hex::decode(&self.salt).context("config salt is not valid hex")?;
        bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("config salt must be {SALT_LEN} bytes"))
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data).context("failed to parse vault config")?;
        if config.version != CONFIG_VERSION {
            bail!("unsupported vault config version: {}", config.version);
        }
        config.kdf.validate()?;
        config.salt()?;
        Ok(config)
    }
}
