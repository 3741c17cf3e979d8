use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

const BUILTIN: &str = include_str!("../../assets/common_passwords.txt");

/// Read-only denylist of known-weak passwords, stored lowercased.
#[derive(Debug, Default, Clone)]
pub struct CommonPasswordSet {
    entries: HashSet<String>,
}

impl CommonPasswordSet {
    /// An empty denylist; nothing is ever considered common.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The list shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_lines(BUILTIN.lines())
    }

    /// Build from newline-delimited text. Blank lines are skipped; every
    /// other line is trimmed and lowercased.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { entries }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
        Ok(Self::from_lines(lines.iter().map(String::as_str)))
    }

    /// Load an external list. A missing or unreadable file yields an empty
    /// set; the condition is logged, never returned.
    pub fn load(path: &Path) -> Self {
        let loaded = File::open(path).and_then(|f| Self::from_reader(BufReader::new(f)));
        match loaded {
            Ok(set) => {
                debug!(path = %path.display(), entries = set.len(), "common password list loaded");
                set
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "common password list unavailable, continuing with an empty list"
                );
                Self::empty()
            }
        }
    }

    /// Case-insensitive exact match.
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
