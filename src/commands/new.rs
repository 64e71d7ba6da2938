//! Account creation command

use anyhow::Result;
use std::path::Path;

use crate::session::default_account_name;

use super::{open_session, print_success, print_warning};

/// Run the new command
pub async fn run(accounts_path: &Path, name: Option<String>) -> Result<()> {
    let mut session = open_session(accounts_path);

    let name = name.unwrap_or_else(|| default_account_name(session.accounts().len()));
    let account = session.create_account(&name)?;

    println!();
    print_success("Account created!");
    println!();
    println!("Name:    {}", account.name);
    println!("Address: {}", account.public_key);

    if let Some(mnemonic) = &account.mnemonic {
        println!();
        println!("Your recovery phrase (12 words):");
        println!();

        // Display in 4 columns
        for (i, word) in mnemonic.split_whitespace().enumerate() {
            print!("{:>2}. {:<12}", i + 1, word);
            if (i + 1) % 4 == 0 {
                println!();
            }
        }

        println!();
        print_warning("Write down your recovery phrase and store it safely!");
        print_warning("Anyone with this phrase can access your funds.");
    }

    println!();
    print_warning("Keys are stored unencrypted in the accounts file.");
    print_warning("This wallet operates on Mainnet. Real funds are at stake.");

    Ok(())
}
