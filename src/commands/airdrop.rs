//! Airdrop request command

use anyhow::Result;
use std::path::Path;

use crate::error::WalletError;
use crate::rpc::RpcClient;

use super::{open_session, print_error, resolve_account};

/// Run the airdrop command
pub async fn run(
    accounts_path: &Path,
    rpc_url: &str,
    amount: f64,
    account: Option<String>,
) -> Result<()> {
    let session = open_session(accounts_path);

    let account = match resolve_account(&session, account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    let rpc = RpcClient::new(rpc_url);

    match rpc.request_airdrop(&account.public_key, amount).await {
        Ok(signature) => {
            println!("Airdrop requested: {}", signature);
        }
        Err(WalletError::NetworkFailure(message)) => {
            print_error(&message);
        }
        Err(e) => {
            print_error(&e.to_string());
        }
    }

    Ok(())
}
