//! Balance Monitor
//!
//! Serializes balance refreshes behind an in-flight guard: at most one
//! outstanding query per monitor. A refresh requested while another is
//! running is skipped rather than queued, and every completed result is
//! published on a watch channel so observers always see the newest value.
//! The query inherits `get_balance` semantics, so a failed fetch publishes
//! a zero balance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::rpc::RpcClient;

/// Outcome of a refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshOutcome {
    /// The query ran; the channel now holds this balance in SOL.
    Updated(f64),
    /// Another refresh was already in flight; nothing was queried.
    Skipped,
}

/// Admission gate allowing a single in-flight refresh.
struct RefreshGate {
    in_flight: AtomicBool,
}

/// Holds the gate until dropped.
struct RefreshClaim<'a>(&'a RefreshGate);

impl RefreshGate {
    fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the gate, or return `None` while another claim is live.
    fn try_claim(&self) -> Option<RefreshClaim<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| RefreshClaim(self))
    }
}

impl Drop for RefreshClaim<'_> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

/// Periodic and on-demand balance refresh for a single address.
///
/// The timer loop and any manual trigger share one monitor, so an overlap
/// between the two results in a skip instead of a duplicate query.
pub struct BalanceMonitor {
    rpc: Arc<RpcClient>,
    address: String,
    gate: RefreshGate,
    sender: watch::Sender<Option<f64>>,
}

impl BalanceMonitor {
    /// Create a monitor for `address`. The channel holds no value until the
    /// first refresh completes.
    pub fn new(rpc: Arc<RpcClient>, address: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            rpc,
            address: address.into(),
            gate: RefreshGate::new(),
            sender,
        }
    }

    /// The address this monitor watches.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Subscribe to published balances, in SOL.
    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.sender.subscribe()
    }

    /// Run one refresh unless another is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _claim = match self.gate.try_claim() {
            Some(claim) => claim,
            None => {
                debug!("Balance refresh already in flight, skipping");
                return RefreshOutcome::Skipped;
            }
        };

        let balance = self.rpc.get_balance(&self.address).await;
        self.sender.send_replace(Some(balance));

        RefreshOutcome::Updated(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens here, so queries fail fast and mask to zero
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

    fn test_monitor() -> BalanceMonitor {
        BalanceMonitor::new(
            Arc::new(RpcClient::new(DEAD_ENDPOINT)),
            "11111111111111111111111111111111",
        )
    }

    #[test]
    fn test_gate_admits_one_claim() {
        let gate = RefreshGate::new();

        let claim = gate.try_claim().expect("gate starts open");
        assert!(gate.try_claim().is_none());

        drop(claim);
        assert!(gate.try_claim().is_some());
    }

    #[tokio::test]
    async fn test_refresh_skipped_while_claim_held() {
        let monitor = test_monitor();

        let _claim = monitor.gate.try_claim().unwrap();
        assert_eq!(monitor.refresh().await, RefreshOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_failed_refresh_publishes_zero() {
        let monitor = test_monitor();
        let rx = monitor.subscribe();
        assert!(rx.borrow().is_none());

        assert_eq!(monitor.refresh().await, RefreshOutcome::Updated(0.0));
        assert_eq!(*rx.borrow(), Some(0.0));
    }

    #[tokio::test]
    async fn test_gate_reopens_after_refresh() {
        let monitor = test_monitor();

        monitor.refresh().await;
        assert_eq!(monitor.refresh().await, RefreshOutcome::Updated(0.0));
    }
}
