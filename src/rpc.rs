//! JSON-RPC Network Client
//!
//! Thin HTTP client for the cluster RPC API, covering the five methods this
//! wallet uses: getBalance, getLatestBlockhash, sendTransaction,
//! getSignatureStatuses and getBlockHeight, plus the transfer orchestration
//! built on top of them.
//!
//! All queries run at `confirmed` commitment. Balance lookups mask failures
//! to a zero balance (logged); everything on the send path propagates
//! errors to the caller.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::WalletError;
use crate::keys;
use crate::transaction::{build_transfer, lamports_to_sol, sol_to_lamports};

/// Default RPC endpoint
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Commitment level for all queries
const COMMITMENT: &str = "confirmed";

/// Timeout for RPC requests
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between confirmation polls
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// JSON-RPC request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Value,
    id: u64,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Result envelope used by account-state queries: context slot plus value.
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    #[allow(dead_code)]
    context: RpcContext,
    value: T,
}

#[derive(Debug, Deserialize)]
struct RpcContext {
    #[allow(dead_code)]
    slot: u64,
}

/// Value returned by `getLatestBlockhash`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    /// Base-58 encoded blockhash
    pub blockhash: String,
    /// Height after which a transaction using this blockhash is dropped
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction landed but failed
    pub err: Option<Value>,
    /// "processed", "confirmed" or "finalized"
    pub confirmation_status: Option<String>,
}

impl SignatureStatus {
    /// True once the cluster reports `confirmed` or `finalized`.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status.as_deref(),
            Some("confirmed") | Some("finalized")
        )
    }
}

/// HTTP JSON-RPC client bound to a single endpoint.
///
/// The endpoint is supplied at construction; nothing in this module reads
/// ambient configuration.
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Create a client for the given RPC endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, WalletError> {
        let id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        };

        debug!("RPC {} -> {}", method, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::NetworkFailure(format!("{}: {}", method, e)))?;

        if !response.status().is_success() {
            return Err(WalletError::NetworkFailure(format!(
                "{}: HTTP error {}",
                method,
                response.status()
            )));
        }

        let json_response: JsonRpcResponse<T> = response.json().await.map_err(|e| {
            WalletError::NetworkFailure(format!("{}: invalid response: {}", method, e))
        })?;

        if let Some(error) = json_response.error {
            return Err(WalletError::NetworkFailure(format!(
                "{}: RPC error {}: {}",
                method, error.code, error.message
            )));
        }

        json_response
            .result
            .ok_or_else(|| WalletError::NetworkFailure(format!("{}: missing result", method)))
    }

    /// Balance of `address` in lamports.
    pub async fn get_balance_lamports(&self, address: &str) -> Result<u64, WalletError> {
        let envelope: RpcEnvelope<u64> = self
            .call("getBalance", json!([address, { "commitment": COMMITMENT }]))
            .await?;
        Ok(envelope.value)
    }

    /// Balance of `address` in SOL.
    ///
    /// Failures are logged and reported as a zero balance. Callers that
    /// need to tell an empty account from a failed query use
    /// `get_balance_lamports`.
    pub async fn get_balance(&self, address: &str) -> f64 {
        match self.get_balance_lamports(address).await {
            Ok(lamports) => lamports_to_sol(lamports),
            Err(e) => {
                warn!("Failed to fetch balance for {}: {}", address, e);
                0.0
            }
        }
    }

    /// Latest blockhash plus the block height at which it expires.
    pub async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, WalletError> {
        let envelope: RpcEnvelope<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": COMMITMENT }]))
            .await?;
        Ok(envelope.value)
    }

    /// Current block height at `confirmed` commitment.
    pub async fn get_block_height(&self) -> Result<u64, WalletError> {
        self.call("getBlockHeight", json!([{ "commitment": COMMITMENT }]))
            .await
    }

    /// Submit a base64-encoded wire transaction, returning its signature.
    pub async fn send_raw_transaction(&self, tx_base64: &str) -> Result<String, WalletError> {
        self.call(
            "sendTransaction",
            json!([tx_base64, { "encoding": "base64", "preflightCommitment": COMMITMENT }]),
        )
        .await
    }

    /// Look up the status of a single signature.
    pub async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, WalletError> {
        let envelope: RpcEnvelope<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(envelope.value.into_iter().next().flatten())
    }

    /// Request an airdrop.
    ///
    /// Airdrops only exist on test clusters and this wallet talks to
    /// mainnet, so the request always fails.
    pub async fn request_airdrop(&self, _address: &str, _sol: f64) -> Result<String, WalletError> {
        Err(WalletError::NetworkFailure(
            "Airdrops are not available on Mainnet.".to_string(),
        ))
    }

    /// Send `amount_sol` from the holder of `secret_key` to `recipient` and
    /// wait until the transfer is confirmed. Returns the transaction
    /// signature.
    pub async fn send_transfer(
        &self,
        secret_key: &str,
        recipient: &str,
        amount_sol: f64,
    ) -> Result<String, WalletError> {
        let to = keys::decode_address(recipient)?;
        let signing_key = keys::decode_secret_key(secret_key)?;
        let lamports = sol_to_lamports(amount_sol);

        let blockhash = self.get_latest_blockhash().await?;
        let tx = build_transfer(
            &signing_key,
            to,
            lamports,
            decode_blockhash(&blockhash.blockhash)?,
        );

        let signature = self.send_raw_transaction(&tx.to_base64()).await?;
        debug!("Submitted transaction {}", signature);

        self.confirm_transaction(&signature).await?;
        Ok(signature)
    }

    /// Poll until `signature` reaches `confirmed` commitment.
    ///
    /// A fresh blockhash supplies the expiry height: once the chain height
    /// passes it without a confirmation, the transaction is abandoned.
    async fn confirm_transaction(&self, signature: &str) -> Result<(), WalletError> {
        let expiry = self.get_latest_blockhash().await?;

        loop {
            if let Some(status) = self.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(WalletError::NetworkFailure(format!(
                        "Transaction {} failed: {}",
                        signature, err
                    )));
                }
                if status.is_confirmed() {
                    return Ok(());
                }
            }

            let height = self.get_block_height().await?;
            if height > expiry.last_valid_block_height {
                return Err(WalletError::NetworkFailure(format!(
                    "Transaction {} was not confirmed before its blockhash expired",
                    signature
                )));
            }

            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }
}

/// Decode the base-58 blockhash string from an RPC response.
fn decode_blockhash(blockhash: &str) -> Result<[u8; 32], WalletError> {
    keys::decode_address(blockhash).map_err(|_| {
        WalletError::NetworkFailure(format!("Invalid blockhash in RPC response: {}", blockhash))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_response() {
        let raw = r#"{"jsonrpc":"2.0","result":{"context":{"slot":12345},"value":2039280},"id":1}"#;
        let resp: JsonRpcResponse<RpcEnvelope<u64>> = serde_json::from_str(raw).unwrap();

        assert!(resp.error.is_none());
        assert_eq!(resp.result.unwrap().value, 2_039_280);
    }

    #[test]
    fn test_parse_latest_blockhash_response() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "result": {
                "context": { "slot": 2792 },
                "value": {
                    "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                    "lastValidBlockHeight": 3090
                }
            },
            "id": 1
        }"#;
        let resp: JsonRpcResponse<RpcEnvelope<LatestBlockhash>> =
            serde_json::from_str(raw).unwrap();

        let value = resp.result.unwrap().value;
        assert_eq!(value.last_valid_block_height, 3090);
        assert!(decode_blockhash(&value.blockhash).is_ok());
    }

    #[test]
    fn test_parse_signature_statuses_response() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "result": {
                "context": { "slot": 82 },
                "value": [
                    null,
                    {
                        "slot": 72,
                        "confirmations": 10,
                        "err": null,
                        "confirmationStatus": "confirmed"
                    },
                    {
                        "slot": 48,
                        "confirmations": 0,
                        "err": null,
                        "confirmationStatus": "processed"
                    }
                ]
            },
            "id": 1
        }"#;
        let resp: JsonRpcResponse<RpcEnvelope<Vec<Option<SignatureStatus>>>> =
            serde_json::from_str(raw).unwrap();

        let statuses = resp.result.unwrap().value;
        assert!(statuses[0].is_none());
        assert!(statuses[1].as_ref().unwrap().is_confirmed());
        assert!(!statuses[2].as_ref().unwrap().is_confirmed());
    }

    #[test]
    fn test_parse_rpc_error() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "error": { "code": -32002, "message": "Transaction simulation failed" },
            "id": 1
        }"#;
        let resp: JsonRpcResponse<RpcEnvelope<u64>> = serde_json::from_str(raw).unwrap();

        assert!(resp.result.is_none());
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32002);
        assert!(error.message.contains("simulation failed"));
    }

    #[test]
    fn test_failed_transaction_status() {
        let raw = r#"{
            "slot": 72,
            "confirmations": null,
            "err": { "InstructionError": [0, { "Custom": 1 }] },
            "confirmationStatus": "finalized"
        }"#;
        let status: SignatureStatus = serde_json::from_str(raw).unwrap();

        assert!(status.err.is_some());
        assert!(status.is_confirmed());
    }

    #[tokio::test]
    async fn test_request_airdrop_always_fails() {
        let client = RpcClient::new(MAINNET_RPC_URL);
        let err = client.request_airdrop("anything", 1.0).await.unwrap_err();

        assert!(matches!(err, WalletError::NetworkFailure(_)));
        assert!(err.to_string().contains("not available on Mainnet"));
    }
}
