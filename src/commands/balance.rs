//! Balance check command

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::monitor::BalanceMonitor;
use crate::rpc::RpcClient;

use super::{open_session, print_success, resolve_account, short_address};

/// Delay between automatic refreshes in watch mode
const WATCH_INTERVAL: Duration = Duration::from_secs(10);

/// Run the balance command
pub async fn run(
    accounts_path: &Path,
    rpc_url: &str,
    account: Option<String>,
    watch: bool,
) -> Result<()> {
    let session = open_session(accounts_path);

    let account = match resolve_account(&session, account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    let rpc = RpcClient::new(rpc_url);

    if watch {
        return watch_balance(rpc, account.public_key.clone(), &account.name).await;
    }

    println!(
        "Checking balance of {}...",
        short_address(&account.public_key)
    );

    let balance = rpc.get_balance(&account.public_key).await;

    println!();
    print_success(&format!("Balance: {:.4} SOL", balance));

    Ok(())
}

/// Refresh the balance every few seconds until the user quits.
///
/// An Enter keypress forces a refresh. Manual and periodic refreshes share
/// one in-flight guard, so overlapping requests collapse into a single
/// query.
async fn watch_balance(rpc: RpcClient, address: String, name: &str) -> Result<()> {
    let monitor = Arc::new(BalanceMonitor::new(Arc::new(rpc), address));
    let mut updates = monitor.subscribe();

    println!(
        "Watching balance of {}. Press Enter to refresh, 'q' to quit.",
        name
    );

    let periodic = Arc::clone(&monitor);
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(WATCH_INTERVAL);
        loop {
            interval.tick().await;
            periodic.refresh().await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(balance) = *updates.borrow_and_update() {
                    println!("Balance: {:.4} SOL", balance);
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(input) if input.trim().eq_ignore_ascii_case("q") => break,
                    Some(_) => {
                        monitor.refresh().await;
                    }
                    None => break,
                }
            }
        }
    }

    ticker.abort();
    Ok(())
}
