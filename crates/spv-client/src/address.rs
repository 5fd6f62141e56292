//! The `address` subcommand: bulk envelope creation over the unspent
//! outputs of an address.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use spv_verify::Envelope;
use tracing::{info, warn};
use woc_client::WocClient;

use crate::create::create_envelope;
use crate::store::write_json;

/// Satoshis per whole coin.
const SATOSHIS_PER_COIN: f64 = 100_000_000.0;

/// An envelope annotated with the unspent output it was created for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEnvelope {
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Output index of the UTXO within the funding transaction.
    pub vout: u32,
    /// UTXO value in whole coins.
    pub value: f64,
}

/// CLI arguments for the `address` subcommand
#[derive(Clone, Debug, Args)]
pub struct AddressArgs {
    /// Address to enumerate UTXOs for
    address: String,
    /// Path to save the envelopes (defaults to envelopes-<address[..8]>.json)
    #[arg(long)]
    out: Option<PathBuf>,
    /// WhatsOnChain API base URL
    #[arg(long, env = "WOC_API_URL", default_value = woc_client::DEFAULT_API_BASE)]
    api_url: String,
}

/// Run the `address` subcommand: one envelope per UTXO, skipping and
/// logging individual failures
pub async fn run(args: AddressArgs) -> Result<(), anyhow::Error> {
    let client = WocClient::new(args.api_url)?;

    info!("Fetching UTXOs for {} ...", args.address);
    let utxos = client.get_unspent(&args.address).await?;
    if utxos.is_empty() {
        info!("No UTXOs found for {}", args.address);
        return Ok(());
    }

    let mut envelopes = Vec::with_capacity(utxos.len());
    for utxo in utxos {
        client.pace().await;
        match create_envelope(&client, &utxo.tx_hash).await {
            Ok(envelope) => envelopes.push(UtxoEnvelope {
                envelope,
                vout: utxo.tx_pos,
                value: utxo.value as f64 / SATOSHIS_PER_COIN,
            }),
            Err(err) => warn!("Skipping {}: {}", utxo.tx_hash, err),
        }
    }

    let out = args.out.unwrap_or_else(|| {
        let prefix: String = args.address.chars().take(8).collect();
        PathBuf::from(format!("envelopes-{prefix}.json"))
    });
    write_json(&envelopes, &out)?;

    println!("Created {} envelopes", envelopes.len());
    for entry in &envelopes {
        println!(
            "   {}... vout:{} {} BSV",
            &entry.envelope.txid[..8],
            entry.vout,
            entry.value
        );
    }
    println!("Saved: {}", out.display());
    Ok(())
}
