//! Key Management
//!
//! Handles BIP39 mnemonic generation and ed25519 keypair derivation for
//! wallet accounts.
//!
//! Derivation follows the thin-wallet convention: the first 32 bytes of the
//! BIP39 seed (empty passphrase, no derivation path) become the ed25519
//! signing-key seed. The stored secret key is the 64-byte keypair encoding
//! (seed followed by public key) in base-58, so it round-trips with other
//! wallets that export the same format.
//!
//! Account records hold their key material as plain strings because the
//! storage format is plaintext JSON; transient decoded secret bytes are
//! wrapped in `Zeroizing` buffers that are cleared on drop.

use bip39::{Language, Mnemonic, MnemonicType, Seed};
use ed25519_dalek::{SigningKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Number of words in a generated mnemonic phrase
const MNEMONIC_WORDS: usize = 12;

/// Message surfaced when a pasted secret key cannot be decoded
const INVALID_KEY_MESSAGE: &str = "Invalid private key. Please ensure it is a base58 string.";

/// A wallet account as persisted and displayed.
///
/// `secret_key` is the base-58 encoding of the full 64-byte keypair.
/// `mnemonic` is only present for accounts generated here; imported accounts
/// carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// Base-58 encoded 32-byte ed25519 public key
    pub public_key: String,

    /// Base-58 encoded 64-byte keypair (seed followed by public key)
    pub secret_key: String,

    /// User-chosen label
    pub name: String,

    /// Recovery phrase, when the account was generated locally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

/// Generate a new account from a fresh 12-word mnemonic.
///
/// The mnemonic is retained on the record so the user can back it up later.
pub fn create_account(name: &str) -> WalletAccount {
    let mnemonic = Mnemonic::new(MnemonicType::Words12, Language::English);
    let signing_key = keypair_from_mnemonic(&mnemonic);
    account_from_signing_key(name, &signing_key, Some(mnemonic.phrase().to_string()))
}

/// Import an account from a base-58 encoded 64-byte secret key.
///
/// The embedded public half must match the secret half; corrupted keypairs
/// are rejected. Imported accounts have no mnemonic.
pub fn import_account(name: &str, secret_key: &str) -> Result<WalletAccount, WalletError> {
    let signing_key = decode_secret_key(secret_key)?;
    Ok(account_from_signing_key(name, &signing_key, None))
}

/// Decode a stored base-58 secret key into a signing key.
///
/// Accepts only the 64-byte keypair encoding. Every failure mode (bad
/// base-58, wrong length, mismatched public half) reports the same
/// user-facing message.
pub fn decode_secret_key(secret_key: &str) -> Result<SigningKey, WalletError> {
    let invalid = || WalletError::InvalidKeyMaterial(INVALID_KEY_MESSAGE.to_string());

    let bytes = Zeroizing::new(bs58::decode(secret_key).into_vec().map_err(|_| invalid())?);
    if bytes.len() != KEYPAIR_LENGTH {
        return Err(invalid());
    }

    let mut keypair_bytes = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
    keypair_bytes.copy_from_slice(&bytes);

    SigningKey::from_keypair_bytes(&keypair_bytes).map_err(|_| invalid())
}

/// Decode a base-58 address into raw public key bytes.
pub fn decode_address(address: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], WalletError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| WalletError::InvalidAddress(address.to_string()))?;

    if bytes.len() != PUBLIC_KEY_LENGTH {
        return Err(WalletError::InvalidAddress(address.to_string()));
    }

    let mut key = [0u8; PUBLIC_KEY_LENGTH];
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// Check whether a string is structurally a valid account address.
///
/// Valid means base-58 decoding to exactly 32 bytes. No curve check is
/// performed; program addresses off the curve are accepted.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Derive the signing key from a mnemonic: BIP39 seed, first 32 bytes.
fn keypair_from_mnemonic(mnemonic: &Mnemonic) -> SigningKey {
    let seed = Seed::new(mnemonic, "");

    let mut key_seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
    key_seed.copy_from_slice(&seed.as_bytes()[..SECRET_KEY_LENGTH]);

    SigningKey::from_bytes(&key_seed)
}

fn account_from_signing_key(
    name: &str,
    signing_key: &SigningKey,
    mnemonic: Option<String>,
) -> WalletAccount {
    let keypair_bytes = Zeroizing::new(signing_key.to_keypair_bytes());

    WalletAccount {
        public_key: bs58::encode(signing_key.verifying_key().as_bytes()).into_string(),
        secret_key: bs58::encode(&*keypair_bytes).into_string(),
        name: name.to_string(),
        mnemonic,
    }
}
