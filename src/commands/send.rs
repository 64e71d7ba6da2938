//! Send transaction command

use anyhow::{anyhow, Result};
use std::path::Path;

use crate::keys;
use crate::rpc::RpcClient;
use crate::transaction::{format_amount, sol_to_lamports};

use super::{
    open_session, print_error, print_success, print_warning, prompt_confirm, resolve_account,
    short_address,
};

/// Run the send command
pub async fn run(
    accounts_path: &Path,
    rpc_url: &str,
    recipient: &str,
    amount: f64,
    account: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let session = open_session(accounts_path);

    let account = match resolve_account(&session, account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    if !keys::is_valid_address(recipient) {
        print_error("Invalid recipient address.");
        return Ok(());
    }

    let lamports = sol_to_lamports(amount);
    if lamports == 0 {
        return Err(anyhow!("Amount must be greater than 0"));
    }

    // Show transaction details
    println!();
    println!("Transaction details:");
    println!(
        "  From:   {} ({})",
        account.name,
        short_address(&account.public_key)
    );
    println!("  To:     {}", recipient);
    println!("  Amount: {}", format_amount(lamports));

    if !skip_confirm {
        println!();
        print_warning("This transaction will be sent on Mainnet.");
        if !prompt_confirm("Send this transaction?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let rpc = RpcClient::new(rpc_url);

    println!();
    println!("Sending transaction...");

    let signature = rpc
        .send_transfer(&account.secret_key, recipient, amount)
        .await?;

    println!();
    print_success("Transaction confirmed!");
    println!();
    println!("Signature: {}", signature);

    Ok(())
}
