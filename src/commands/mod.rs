//! CLI Commands
//!
//! Implementation of all wallet CLI commands.

pub mod address;
pub mod airdrop;
pub mod balance;
pub mod delete;
pub mod import;
pub mod list;
pub mod new;
pub mod reveal;
pub mod send;

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::keys::WalletAccount;
use crate::session::{SelectionPolicy, WalletSession};
use crate::storage::AccountStore;

/// Prompt for a line of input
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Prompt for confirmation
pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("\x1b[33mWarning:\x1b[0m {}", message);
}

/// Shorten an address for display, keeping the first and last four
/// characters.
pub fn short_address(address: &str) -> String {
    if address.len() <= 8 {
        address.to_string()
    } else {
        format!("{}...{}", &address[..4], &address[address.len() - 4..])
    }
}

/// Open the session every command operates on. The first stored account is
/// selected automatically.
pub fn open_session(accounts_path: &Path) -> WalletSession {
    WalletSession::load(
        AccountStore::new(accounts_path),
        SelectionPolicy::AutoSelectFirst,
    )
}

/// Look up the account a command acts on: the explicitly requested name or
/// address if given, otherwise the current selection. Prints an error and
/// returns `None` when nothing matches.
pub fn resolve_account<'a>(
    session: &'a WalletSession,
    requested: Option<&str>,
) -> Option<&'a WalletAccount> {
    if session.accounts().is_empty() {
        print_error("No accounts found. Run 'geo-wallet new' first.");
        return None;
    }

    match requested {
        Some(needle) => {
            let found = session.find_account(needle);
            if found.is_none() {
                print_error(&format!("No account matches '{}'", needle));
            }
            found
        }
        None => session.current_account(),
    }
}
