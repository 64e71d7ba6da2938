//! Account Storage
//!
//! Persists the ordered account list as a single pretty-printed JSON
//! document. A missing or unparsable file reads as an empty list. Writes go
//! to a sibling temp file and are renamed into place, so the visible file is
//! always a complete document. On Unix the file is created with mode 0600;
//! it holds unencrypted secret keys.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::WalletError;
use crate::keys::WalletAccount;

/// File-backed store for the wallet's account list.
///
/// The path is supplied by the caller; there is no process-wide default
/// baked in here.
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load all stored accounts, in insertion order.
    ///
    /// A missing or unreadable file yields an empty list instead of an
    /// error; an unparsable file is logged and also yields an empty list.
    pub fn load(&self) -> Vec<WalletAccount> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "Failed to read accounts file {}: {}",
                        self.path.display(),
                        e
                    );
                }
                return Vec::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(
                    "Unparsable accounts file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Write the full account list, replacing the previous contents.
    pub fn save(&self, accounts: &[WalletAccount]) -> Result<(), WalletError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WalletError::Storage(format!("Failed to create wallet directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(accounts)
            .map_err(|e| WalletError::Storage(format!("Failed to serialize accounts: {}", e)))?;

        // Write a sibling temp file, then rename over the target
        let tmp_path = self.path.with_extension("json.tmp");
        write_restricted(&tmp_path, &json)
            .map_err(|e| WalletError::Storage(format!("Failed to write accounts file: {}", e)))?;

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| WalletError::Storage(format!("Failed to replace accounts file: {}", e)))
    }

    /// Append an account and persist the new list.
    ///
    /// Each public key may be stored at most once; adding a key that is
    /// already present fails with `DuplicateAccount`.
    pub fn add(&self, account: WalletAccount) -> Result<Vec<WalletAccount>, WalletError> {
        let mut accounts = self.load();

        if accounts
            .iter()
            .any(|a| a.public_key == account.public_key)
        {
            return Err(WalletError::DuplicateAccount(account.public_key));
        }

        accounts.push(account);
        self.save(&accounts)?;
        Ok(accounts)
    }

    /// Remove the account with the given public key and persist the new
    /// list. Removing a key that is not stored returns the unchanged list
    /// without rewriting the file.
    pub fn remove(&self, public_key: &str) -> Result<Vec<WalletAccount>, WalletError> {
        let mut accounts = self.load();
        let before = accounts.len();

        accounts.retain(|a| a.public_key != public_key);
        if accounts.len() == before {
            return Ok(accounts);
        }

        self.save(&accounts)?;
        Ok(accounts)
    }
}

/// Write `contents` to `path` with owner-only permissions on Unix.
fn write_restricted(path: &Path, contents: &str) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents.as_bytes())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
    }
}
