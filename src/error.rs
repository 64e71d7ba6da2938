//! Wallet error types.

use thiserror::Error;

/// Errors produced by wallet operations.
///
/// Two failure classes never surface here: a balance query that fails is
/// logged and reported as a zero balance at the `get_balance` surface, and
/// deleting an account that is not stored is a silent no-op.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A secret key or mnemonic could not be turned into a usable keypair.
    #[error("{0}")]
    InvalidKeyMaterial(String),

    /// An address failed structural validation.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// RPC transport failure, an RPC error response, a rejected or failed
    /// transaction, or a confirmation timeout.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// An account with the same public key is already stored.
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// The requested account is not part of the session.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Reading or writing the accounts file failed.
    #[error("Storage error: {0}")]
    Storage(String),
}
