//! Secret key reveal command

use anyhow::Result;
use std::path::Path;

use super::{open_session, print_warning, prompt_confirm, resolve_account};

/// Run the reveal command
pub async fn run(accounts_path: &Path, account: Option<String>, skip_confirm: bool) -> Result<()> {
    let session = open_session(accounts_path);

    let account = match resolve_account(&session, account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    println!();
    print_warning("IMPORTANT: Keep your secret key secret!");
    print_warning("Anyone with this key can spend the funds in this account.");

    if !skip_confirm {
        println!();
        if !prompt_confirm("Show secret key on screen?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!();
    println!("Name:       {}", account.name);
    println!("Address:    {}", account.public_key);
    println!("Secret key: {}", account.secret_key);

    if let Some(mnemonic) = &account.mnemonic {
        println!();
        println!("Recovery phrase:");
        println!("  {}", mnemonic);
    }

    Ok(())
}
