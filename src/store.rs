use crate::error::VaultError;
use crate::strength::Rating;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// All credential records of a vault, in insertion order.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Store {
    next_id: u64,
    entries: Vec<CredentialEntry>,
}

/// One stored credential. `password` is an encrypted token, never plaintext;
/// `strength` is the rating cached when the password was last set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    id: u64,
    service: String,
    username: String,
    password: String,
    created: String,
    strength: Rating,
}

impl CredentialEntry {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The encrypted token.
    pub fn token(&self) -> &str {
        &self.password
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn strength(&self) -> Rating {
        self.strength
    }
}

impl Store {
    pub fn new() -> Self {
        Store {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Append a record under a fresh id.
    ///
    /// The id is never below `next_id` nor at or below any id already held,
    /// so a hand-edited `entries.json` cannot cause duplicates.
    pub fn insert(
        &mut self,
        service: &str,
        username: &str,
        token: String,
        strength: Rating,
    ) -> Result<u64, VaultError> {
        let after_last = match self.entries.iter().map(|e| e.id).max() {
            Some(max) => max.checked_add(1).ok_or(VaultError::IdSpaceExhausted)?,
            None => 1,
        };
        let id = self.next_id.max(after_last).max(1);
        self.next_id = id.saturating_add(1);
        self.entries.push(CredentialEntry {
            id,
            service: service.to_string(),
            username: username.to_string(),
            password: token,
            created: Local::now().format("%Y-%m-%d").to_string(),
            strength,
        });
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&CredentialEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn update_secret(&mut self, id: u64, token: String, strength: Rating) -> Result<(), VaultError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(VaultError::EntryNotFound(id))?;
        entry.password = token;
        entry.strength = strength;
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<CredentialEntry, VaultError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(VaultError::EntryNotFound(id))?;
        Ok(self.entries.remove(pos))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CredentialEntry> {
        self.entries.iter()
    }

    /// Entries whose service name contains `query`, ignoring case.
    pub fn find_by_service<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a CredentialEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| e.service.to_lowercase().contains(&query))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
