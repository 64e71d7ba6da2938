//! Account deletion command

use anyhow::Result;
use std::path::Path;

use super::{
    open_session, print_success, print_warning, prompt_confirm, resolve_account, short_address,
};

/// Run the delete command
pub async fn run(accounts_path: &Path, account: &str, skip_confirm: bool) -> Result<()> {
    let mut session = open_session(accounts_path);

    let target = match resolve_account(&session, Some(account)) {
        Some(account) => account.clone(),
        None => return Ok(()),
    };

    println!(
        "Deleting {} ({})",
        target.name,
        short_address(&target.public_key)
    );

    if !skip_confirm {
        println!();
        print_warning("Without the secret key or recovery phrase this account cannot be restored.");
        if !prompt_confirm("Delete this account?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    session.delete_account(&target.public_key)?;

    println!();
    print_success("Account deleted.");

    if let Some(current) = session.current_account() {
        println!("Selected account is now {}.", current.name);
    }

    Ok(())
}
