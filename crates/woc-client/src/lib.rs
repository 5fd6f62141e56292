//! WhatsOnChain REST client for fetching raw transactions, TSC merkle
//! proofs and block headers with request pacing and retry logic.

use std::time::Duration;

use backoff::ExponentialBackoff;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use spv_verify::TscProof;
use thiserror::Error;
use tracing::{debug, info};

/// Error types for WhatsOnChain client operations
#[derive(Debug, Error)]
pub enum WocClientError {
    /// HTTP transport or status errors
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Default API base URL (BSV mainnet).
pub const DEFAULT_API_BASE: &str = "https://api.whatsonchain.com/v1/bsv/main";

/// Default HTTP request timeout
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default delay between consecutive requests; the provider rate-limits
/// at 3 req/s.
pub const REQUEST_DELAY: Duration = Duration::from_millis(350);

/// Confirmation status of a transaction as reported by the provider.
/// The block fields are absent while the transaction sits in the mempool.
#[derive(Debug, Clone, Deserialize)]
pub struct TxStatus {
    pub blockhash: Option<String>,
    pub blockheight: Option<u32>,
    pub confirmations: Option<u32>,
}

/// An unspent output of an address.
#[derive(Debug, Clone, Deserialize)]
pub struct Utxo {
    pub tx_hash: String,
    pub tx_pos: u32,
    /// Value in satoshis.
    pub value: u64,
    pub height: u32,
}

/// WhatsOnChain REST client
pub struct WocClient {
    http: reqwest::Client,
    base_url: String,
    delay: Duration,
    backoff: ExponentialBackoff,
}

impl WocClient {
    /// Create a client for the given API base with default pacing, timeout
    /// and retry settings (exponential backoff).
    pub fn new(base_url: String) -> Result<Self, WocClientError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            delay: REQUEST_DELAY,
            backoff: ExponentialBackoff::default(),
        })
    }

    /// Override the inter-request delay (mainly for tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sleep between consecutive requests to respect the provider's rate
    /// limit. Callers insert this between dependent fetches.
    pub async fn pace(&self) {
        tokio::time::sleep(self.delay).await;
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, WocClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        request_with_retry(self.backoff.clone(), || async {
            let response = self.http.get(&url).send().await?;
            response.error_for_status().map_err(Into::into)
        })
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, WocClientError> {
        let response = self.get(path).await?;
        Ok(response.json().await?)
    }

    async fn get_text(&self, path: &str) -> Result<String, WocClientError> {
        let response = self.get(path).await?;
        Ok(response.text().await?.trim().to_string())
    }

    /// Get raw transaction hex by txid
    pub async fn get_raw_transaction(&self, txid: &str) -> Result<String, WocClientError> {
        self.get_text(&format!("/tx/{txid}/hex")).await
    }

    /// Get the TSC merkle proof for a mined transaction
    pub async fn get_merkle_proof(&self, txid: &str) -> Result<TscProof, WocClientError> {
        self.get_json(&format!("/tx/{txid}/proof/tsc")).await
    }

    /// Get confirmation status (block hash, height, confirmations) for a
    /// transaction
    pub async fn get_tx_status(&self, txid: &str) -> Result<TxStatus, WocClientError> {
        self.get_json(&format!("/tx/hash/{txid}")).await
    }

    /// Get the raw 80-byte block header as hex by block hash
    pub async fn get_block_header(&self, block_hash: &str) -> Result<String, WocClientError> {
        self.get_text(&format!("/block/{block_hash}/header")).await
    }

    /// List unspent outputs of an address
    pub async fn get_unspent(&self, address: &str) -> Result<Vec<Utxo>, WocClientError> {
        self.get_json(&format!("/address/{address}/unspent")).await
    }
}

/// Execute a request with retry logic using exponential backoff.
/// Only transport-level failures and server errors are retried.
async fn request_with_retry<F, Fut, T>(
    backoff: ExponentialBackoff,
    operation: F,
) -> Result<T, WocClientError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, WocClientError>>,
{
    use backoff::{future::retry_notify, Error};

    retry_notify(
        backoff,
        || async {
            match operation().await {
                Ok(result) => Ok(result),
                Err(err) => {
                    if is_retryable_error(&err) {
                        Err(Error::transient(err))
                    } else {
                        Err(Error::permanent(err))
                    }
                }
            }
        },
        |err, duration| {
            info!("Request failed, retrying in {:?}: {}", duration, err);
        },
    )
    .await
}

/// Determines if an error should be retried: timeouts, connection
/// failures and 5xx responses. Client errors (404 unknown txid, 400 bad
/// request) are permanent.
fn is_retryable_error(err: &WocClientError) -> bool {
    match err {
        WocClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().map_or(false, |s| s.is_server_error())
        }
    }
}
