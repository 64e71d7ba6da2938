//! GeoWallet
//!
//! A thin Solana wallet that manages its own keys locally and talks to the
//! cluster over JSON-RPC.
//!
//! ## Model
//!
//! - Keys are generated or imported locally and never leave the machine
//! - Accounts persist as a plain JSON file owned by the user
//! - The RPC endpoint is untrusted; transactions are signed locally
//! - All chain queries run at `confirmed` commitment

pub mod error;
pub mod keys;
pub mod monitor;
pub mod rpc;
pub mod session;
pub mod storage;
pub mod transaction;

pub mod commands;

pub use error::WalletError;
pub use keys::WalletAccount;
pub use monitor::BalanceMonitor;
pub use rpc::RpcClient;
pub use session::{SelectionPolicy, SessionState, WalletSession};
pub use storage::AccountStore;
