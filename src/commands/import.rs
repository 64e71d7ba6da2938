//! Account import command

use anyhow::Result;
use std::path::Path;
use zeroize::Zeroizing;

use crate::session::default_account_name;

use super::{open_session, print_error, print_success, print_warning, prompt_line};

/// Run the import command
pub async fn run(accounts_path: &Path, name: Option<String>) -> Result<()> {
    let mut session = open_session(accounts_path);

    println!("Paste the base-58 secret key of the account to import.");
    let secret = Zeroizing::new(prompt_line("> ")?);

    if secret.is_empty() {
        print_error("No secret key entered.");
        return Ok(());
    }

    let name = name.unwrap_or_else(|| default_account_name(session.accounts().len()));

    let account = match session.import_account(&name, &secret) {
        Ok(account) => account,
        Err(e) => {
            print_error(&e.to_string());
            return Ok(());
        }
    };

    println!();
    print_success("Account imported!");
    println!();
    println!("Name:    {}", account.name);
    println!("Address: {}", account.public_key);

    println!();
    print_warning("Keys are stored unencrypted in the accounts file.");

    Ok(())
}
