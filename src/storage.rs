//! On-disk layout of a vault directory.
//!
//! ```text
//! <dir>/config.json    verifier digest, salt, KDF params
//! <dir>/entries.json   credential records with encrypted passwords
//! ```

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::secure_random;

pub const CONFIG_FILE: &str = "config.json";
pub const ENTRIES_FILE: &str = "entries.json";

/// A vault directory holding the config and entry files.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn entries_path(&self) -> PathBuf {
        self.dir.join(ENTRIES_FILE)
    }

    /// A vault exists once its config has been written.
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    pub fn load_config(&self) -> Result<Vec<u8>> {
        let path = self.config_path();
        fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
    }

    /// Entries file contents, or `None` if it was never written.
    pub fn load_entries(&self) -> Result<Option<Vec<u8>>> {
        let path = self.entries_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(data))
    }

    pub fn save_config(&self, data: &[u8]) -> Result<()> {
        write_atomic(&self.config_path(), data)
    }

    pub fn save_entries(&self, data: &[u8]) -> Result<()> {
        write_atomic(&self.entries_path(), data)
    }
}

/// Replace `path` with `data` so that a crash leaves either the old or the
/// new file, never a partial write.
///
/// Writes a randomly named sibling temp file, fsyncs it, renames it over the
/// target and fsyncs the parent directory. Parent directories are created.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = random_tmp_path(path)?;

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .context("failed to create temporary file")?;

    tmp_file.write_all(data)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    if let Err(e) = atomic_replace(path, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    #[cfg(not(target_os = "windows"))]
    if let Some(parent) = path.parent() {
        File::open(parent)?.sync_all()?;
    }

    Ok(())
}

/// `<name>.tmp.<16 hex chars>` in the same directory as `path`.
fn random_tmp_path(path: &Path) -> Result<PathBuf> {
    let mut buf = [0u8; 8];
    secure_random(&mut buf)?;

    let file_name = path
        .file_name()
        .context("storage path has no file name")?
        .to_string_lossy();

    Ok(path.with_file_name(format!("{}.tmp.{}", file_name, hex::encode(buf))))
}

#[cfg(target_os = "windows")]
fn atomic_replace(target: &Path, tmp_path: &Path) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

    if !target.exists() {
        fs::rename(tmp_path, target)?;
        return Ok(());
    }

    fn to_wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let target_w = to_wide(target.as_os_str());
    let tmp_w = to_wide(tmp_path.as_os_str());

    // SAFETY: both buffers are NUL-terminated UTF-16 and outlive the call;
    // Windows does not retain the pointers.
    let result = unsafe {
        ReplaceFileW(
            target_w.as_ptr(),
            tmp_w.as_ptr(),
            std::ptr::null(),
            REPLACEFILE_WRITE_THROUGH,
            std::ptr::null(),
            std::ptr::null(),
        )
    };

    if result == 0 {
        let err = std::io::Error::last_os_error();
        return Err(err).context("atomic replace failed");
    }

    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn atomic_replace(target: &Path, tmp_path: &Path) -> Result<()> {
    fs::rename(tmp_path, target)?;
    Ok(())
}
