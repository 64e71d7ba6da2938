//! Account Session
//!
//! In-memory view of the stored accounts plus the current selection.
//! Mutations go through the store first and adopt the list it returns, so
//! the session always mirrors the last-written file.

use tracing::debug;

use crate::error::WalletError;
use crate::keys::{self, WalletAccount};
use crate::storage::AccountStore;

/// What to select when a session is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Select the first stored account, if any
    AutoSelectFirst,
    /// Start with no selection even when accounts exist
    Manual,
}

/// Coarse session state, derived from the list and the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No accounts stored
    NoAccounts,
    /// Accounts exist but none is selected
    HasAccountsNoneSelected,
    /// An account is selected
    AccountSelected,
}

/// The account list and current selection, backed by a store.
pub struct WalletSession {
    store: AccountStore,
    accounts: Vec<WalletAccount>,
    current: Option<String>,
}

impl WalletSession {
    /// Load the stored accounts and apply the selection policy.
    pub fn load(store: AccountStore, policy: SelectionPolicy) -> Self {
        let accounts = store.load();
        let current = match policy {
            SelectionPolicy::AutoSelectFirst => accounts.first().map(|a| a.public_key.clone()),
            SelectionPolicy::Manual => None,
        };

        Self {
            store,
            accounts,
            current,
        }
    }

    /// Current coarse state.
    pub fn state(&self) -> SessionState {
        if self.accounts.is_empty() {
            SessionState::NoAccounts
        } else if self.current.is_none() {
            SessionState::HasAccountsNoneSelected
        } else {
            SessionState::AccountSelected
        }
    }

    /// All accounts, in stored order.
    pub fn accounts(&self) -> &[WalletAccount] {
        &self.accounts
    }

    /// The selected account, if any.
    pub fn current_account(&self) -> Option<&WalletAccount> {
        let key = self.current.as_deref()?;
        self.accounts.iter().find(|a| a.public_key == key)
    }

    /// Find an account by exact public key or name.
    pub fn find_account(&self, needle: &str) -> Option<&WalletAccount> {
        self.accounts
            .iter()
            .find(|a| a.public_key == needle || a.name == needle)
    }

    /// Generate a new account. It is persisted and becomes the selection.
    pub fn create_account(&mut self, name: &str) -> Result<WalletAccount, WalletError> {
        let account = keys::create_account(name);
        self.adopt(account)
    }

    /// Import an account from a base-58 secret key. It is persisted and
    /// becomes the selection.
    pub fn import_account(
        &mut self,
        name: &str,
        secret_key: &str,
    ) -> Result<WalletAccount, WalletError> {
        let account = keys::import_account(name, secret_key)?;
        self.adopt(account)
    }

    /// Select the account with the given public key.
    pub fn select_account(&mut self, public_key: &str) -> Result<(), WalletError> {
        if self.accounts.iter().any(|a| a.public_key == public_key) {
            self.current = Some(public_key.to_string());
            Ok(())
        } else {
            Err(WalletError::UnknownAccount(public_key.to_string()))
        }
    }

    /// Delete the account with the given public key and persist the new
    /// list. Deleting a key that is not stored is a no-op. When the
    /// selected account is deleted, the selection falls back to the new
    /// first account, or to none.
    pub fn delete_account(&mut self, public_key: &str) -> Result<(), WalletError> {
        self.accounts = self.store.remove(public_key)?;

        if self.current.as_deref() == Some(public_key) {
            self.current = self.accounts.first().map(|a| a.public_key.clone());
            match &self.current {
                Some(next) => debug!("Deleted selected account, now on {}", next),
                None => debug!("Deleted the last account"),
            }
        }

        Ok(())
    }

    /// Persist through the store and take over the list it returns.
    fn adopt(&mut self, account: WalletAccount) -> Result<WalletAccount, WalletError> {
        self.accounts = self.store.add(account.clone())?;
        self.current = Some(account.public_key.clone());
        Ok(account)
    }
}

/// Default label for the next account: the first is "Main Account", later
/// ones are numbered from 2.
pub fn default_account_name(existing: usize) -> String {
    if existing == 0 {
        "Main Account".to_string()
    } else {
        format!("Account {}", existing + 1)
    }
}
