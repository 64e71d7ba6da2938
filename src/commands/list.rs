//! Account listing command

use anyhow::Result;
use std::path::Path;

use super::{open_session, short_address};

/// Run the list command
pub async fn run(accounts_path: &Path) -> Result<()> {
    let session = open_session(accounts_path);

    if session.accounts().is_empty() {
        println!("No accounts found. Run 'geo-wallet new' to create one.");
        return Ok(());
    }

    let current = session.current_account().map(|a| a.public_key.clone());

    println!("Accounts ({}):", session.accounts().len());
    for account in session.accounts() {
        let marker = if current.as_deref() == Some(account.public_key.as_str()) {
            "*"
        } else {
            " "
        };
        let origin = if account.mnemonic.is_some() {
            ""
        } else {
            "  (imported)"
        };
        println!(
            "  {} {:<20} {}{}",
            marker,
            account.name,
            short_address(&account.public_key),
            origin
        );
    }

    println!();
    println!("* selected account");

    Ok(())
}
