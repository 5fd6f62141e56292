//! The `create` subcommand: fetch all components for a transaction and
//! write a checksummed envelope to disk.

use std::path::PathBuf;

use clap::Args;
use spv_verify::{Envelope, EnvelopeBuilder};
use tracing::info;
use woc_client::WocClient;

use crate::store::save_envelope;

/// CLI arguments for the `create` subcommand
#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    /// Transaction ID (64 hex characters)
    txid: String,
    /// Path to save the envelope (defaults to envelope-<txid[..8]>.json)
    #[arg(long)]
    out: Option<PathBuf>,
    /// WhatsOnChain API base URL
    #[arg(long, env = "WOC_API_URL", default_value = woc_client::DEFAULT_API_BASE)]
    api_url: String,
}

/// Run the `create` subcommand: build an envelope and write it to disk
pub async fn run(args: CreateArgs) -> Result<(), anyhow::Error> {
    let client = WocClient::new(args.api_url)?;
    let envelope = create_envelope(&client, &args.txid).await?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("envelope-{}.json", &args.txid[..8])));
    save_envelope(&envelope, &out)?;

    println!("Envelope created");
    println!("   TXID:   {}", envelope.txid);
    println!("   Block:  #{}", envelope.block_height);
    println!("   Confs:  {}", envelope.confirmations);
    println!("   Saved:  {}", out.display());
    Ok(())
}

/// Fetch all components for `txid` from the provider and assemble a
/// checksummed envelope.
///
/// Consecutive requests are paced to respect the provider's rate limit.
/// Fails if the txid is malformed, the transaction is not yet in a block,
/// or the fetched raw transaction does not hash to `txid`.
pub async fn create_envelope(client: &WocClient, txid: &str) -> Result<Envelope, anyhow::Error> {
    if txid.len() != 64 || !txid.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("invalid txid: must be 64 hex characters");
    }

    info!("Fetching raw transaction for {} ...", txid);
    let raw_tx = client.get_raw_transaction(txid).await?;
    client.pace().await;

    info!("Fetching merkle proof ...");
    let proof = client.get_merkle_proof(txid).await?;
    client.pace().await;

    info!("Fetching transaction status ...");
    let status = client.get_tx_status(txid).await?;
    client.pace().await;

    let block_hash = status
        .blockhash
        .ok_or_else(|| anyhow::anyhow!("transaction {} is not yet in a block", txid))?;

    info!("Fetching block header for {} ...", block_hash);
    let block_header = client.get_block_header(&block_hash).await?;

    let envelope = EnvelopeBuilder {
        txid: txid.to_string(),
        raw_tx,
        proof,
        block_hash,
        block_header,
        block_height: status.blockheight.unwrap_or_default(),
        confirmations: status.confirmations.unwrap_or_default(),
    }
    .build()?;

    Ok(envelope)
}
