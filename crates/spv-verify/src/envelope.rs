//! Envelope assembly and the integrity checksum.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SpvError;
use crate::hex::{hash256_display, to_display_hex};
use crate::merkle::{MerkleProof, TscProof};
use crate::sha256::sha256;

/// Proof format tag attached to every envelope.
pub const PROOF_FORMAT_TSC: &str = "TSC";

/// Default `targetType` when the provider leaves it unset.
const TARGET_TYPE_HEADER: &str = "header";

/// Number of hex characters kept from the checksum digest.
const CHECKSUM_LEN: usize = 16;

/// A self-contained SPV proof bundle.
///
/// Created once by [`EnvelopeBuilder`] and thereafter only read,
/// serialized and verified — never edited in place. The checksum is a
/// function solely of `{txid, raw_tx, block_hash, block_header}` and is
/// always recomputed during verification, never trusted blindly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Transaction id, display hex.
    pub txid: String,
    /// Raw transaction bytes, hex.
    pub raw_tx: String,
    /// Hash of the containing block, display hex.
    pub block_hash: String,
    /// Raw 80-byte block header, hex.
    pub block_header: String,
    pub block_height: u32,
    pub confirmations: u32,
    pub proof: MerkleProof,
    pub proof_format: String,
    /// Creation timestamp, ISO-8601.
    pub archived_at: String,
    /// Accidental-corruption fingerprint over the four core fields. Not a
    /// tamper-proof commitment: anyone who knows the algorithm can forge it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Raw inputs for envelope construction, as supplied by the data provider.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    pub txid: String,
    pub raw_tx: String,
    pub proof: TscProof,
    pub block_hash: String,
    pub block_header: String,
    pub block_height: u32,
    pub confirmations: u32,
}

impl EnvelopeBuilder {
    /// Assemble a checksummed envelope.
    ///
    /// Recomputes hash256 of the raw transaction first and refuses to
    /// construct anything if it disagrees with `txid`, so every envelope
    /// that exists is self-consistent for the transaction-identity check.
    /// Unset proof fields default to the transaction id, the block hash
    /// and `"header"`. The checksum is attached last; from then on the
    /// envelope is complete and treated as immutable.
    pub fn build(self) -> Result<Envelope, SpvError> {
        let computed = hash256_display(&self.raw_tx)?;
        if computed != self.txid {
            return Err(SpvError::Mismatch {
                field: "txid",
                computed,
                expected: self.txid,
            });
        }

        let proof = MerkleProof {
            tx_or_id: self.proof.tx_or_id.unwrap_or_else(|| self.txid.clone()),
            target: self.proof.target.unwrap_or_else(|| self.block_hash.clone()),
            target_type: self
                .proof
                .target_type
                .unwrap_or_else(|| TARGET_TYPE_HEADER.to_string()),
            nodes: self.proof.nodes,
            index: self.proof.index,
        };

        let checksum = compute_checksum(
            &self.txid,
            &self.raw_tx,
            &self.block_hash,
            &self.block_header,
        );

        Ok(Envelope {
            txid: self.txid,
            raw_tx: self.raw_tx,
            block_hash: self.block_hash,
            block_header: self.block_header,
            block_height: self.block_height,
            confirmations: self.confirmations,
            proof,
            proof_format: PROOF_FORMAT_TSC.to_string(),
            archived_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            checksum: Some(checksum),
        })
    }
}

/// Compute the envelope checksum.
///
/// Single SHA-256 (not hash256) over the ASCII concatenation of the four
/// hex fields in fixed order, keeping the first 16 hex characters of the
/// display-order digest.
pub fn compute_checksum(txid: &str, raw_tx: &str, block_hash: &str, block_header: &str) -> String {
    let mut data =
        String::with_capacity(txid.len() + raw_tx.len() + block_hash.len() + block_header.len());
    data.push_str(txid);
    data.push_str(raw_tx);
    data.push_str(block_hash);
    data.push_str(block_header);

    let mut digest = to_display_hex(&sha256(data.as_bytes()));
    digest.truncate(CHECKSUM_LEN);
    digest
}
