//! Receive address command

use anyhow::Result;
use std::path::Path;

use super::{open_session, resolve_account};

/// Run the address command
pub async fn run(accounts_path: &Path, account: Option<String>) -> Result<()> {
    let session = open_session(accounts_path);

    let account = match resolve_account(&session, account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    println!("{}", account.public_key);

    Ok(())
}
