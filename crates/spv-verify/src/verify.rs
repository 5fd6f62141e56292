//! Envelope verification: four independent checks, reported rather than
//! raised.

use serde::{Deserialize, Serialize};

use crate::envelope::{compute_checksum, Envelope};
use crate::error::SpvError;
use crate::header::extract_merkle_root;
use crate::hex::{decode_hex, hash256_display};
use crate::merkle::compute_merkle_root;

/// Outcome of verifying an envelope.
///
/// Each check is independent; `valid` is their conjunction. `errors`
/// holds one human-readable entry per failed or uncomputable check, in
/// check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub txid_valid: bool,
    pub merkle_valid: bool,
    pub header_valid: bool,
    pub checksum_valid: bool,
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Verify an envelope.
///
/// All four checks always run — a single malformed field degrades to a
/// reported failure instead of aborting the rest. Problems in data the
/// envelope carries (bad hex, wrong header length) become `false` plus an
/// entry in `errors`; this function never panics or errors for
/// inspectable input. Verification only reads the envelope, so repeated
/// calls yield identical results.
pub fn verify(envelope: &Envelope) -> VerificationResult {
    let mut errors = Vec::new();

    let txid_valid = record(check_txid(envelope), &mut errors);
    let merkle_valid = record(check_merkle(envelope), &mut errors);
    let header_valid = record(check_header(envelope), &mut errors);
    let checksum_valid = record(check_checksum(envelope), &mut errors);

    VerificationResult {
        txid_valid,
        merkle_valid,
        header_valid,
        checksum_valid,
        valid: txid_valid && merkle_valid && header_valid && checksum_valid,
        errors,
    }
}

fn record(check: Result<(), SpvError>, errors: &mut Vec<String>) -> bool {
    match check {
        Ok(()) => true,
        Err(err) => {
            errors.push(err.to_string());
            false
        }
    }
}

/// hash256 of the raw transaction must equal the claimed txid.
fn check_txid(envelope: &Envelope) -> Result<(), SpvError> {
    let computed = hash256_display(&envelope.raw_tx)?;
    if computed != envelope.txid {
        return Err(SpvError::Mismatch {
            field: "txid",
            computed,
            expected: envelope.txid.clone(),
        });
    }
    Ok(())
}

/// The merkle root rebuilt from the proof must equal the root carried in
/// the block header.
fn check_merkle(envelope: &Envelope) -> Result<(), SpvError> {
    let computed = compute_merkle_root(&envelope.txid, &envelope.proof)?;
    let header_root = extract_merkle_root(&decode_hex(&envelope.block_header)?)?;
    if computed != header_root {
        return Err(SpvError::Mismatch {
            field: "merkle root",
            computed,
            expected: header_root,
        });
    }
    Ok(())
}

/// hash256 of the header must equal the claimed block hash.
fn check_header(envelope: &Envelope) -> Result<(), SpvError> {
    let computed = hash256_display(&envelope.block_header)?;
    if computed != envelope.block_hash {
        return Err(SpvError::Mismatch {
            field: "block hash",
            computed,
            expected: envelope.block_hash.clone(),
        });
    }
    Ok(())
}

/// Recomputed checksum must equal the stored one; vacuously true when no
/// checksum is present.
fn check_checksum(envelope: &Envelope) -> Result<(), SpvError> {
    let stored = match &envelope.checksum {
        Some(stored) => stored,
        None => return Ok(()),
    };
    let computed = compute_checksum(
        &envelope.txid,
        &envelope.raw_tx,
        &envelope.block_hash,
        &envelope.block_header,
    );
    if &computed != stored {
        return Err(SpvError::Integrity(
            "envelope may be corrupted".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::MerkleProof;

    fn envelope_without_checksum() -> Envelope {
        // Genesis block: single transaction, empty proof path.
        Envelope {
            txid: "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b".to_string(),
            raw_tx: "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000".to_string(),
            block_hash: "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
                .to_string(),
            block_header: "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c".to_string(),
            block_height: 0,
            confirmations: 1000,
            proof: MerkleProof {
                tx_or_id: "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
                    .to_string(),
                target: "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
                    .to_string(),
                target_type: "header".to_string(),
                nodes: vec![],
                index: 0,
            },
            proof_format: "TSC".to_string(),
            archived_at: "2009-01-03T18:15:05.000Z".to_string(),
            checksum: None,
        }
    }

    #[test]
    fn test_missing_checksum_is_vacuously_valid() {
        let result = verify(&envelope_without_checksum());
        assert!(result.checksum_valid);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_malformed_header_degrades_two_checks() {
        let mut envelope = envelope_without_checksum();
        envelope.block_header = "zz".to_string();
        let result = verify(&envelope);
        // txid is still checked on its own.
        assert!(result.txid_valid);
        assert!(!result.merkle_valid);
        assert!(!result.header_valid);
        assert!(result.checksum_valid);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_short_header_is_reported_not_raised() {
        let mut envelope = envelope_without_checksum();
        envelope.block_header.truncate(100);
        let result = verify(&envelope);
        assert!(!result.merkle_valid);
        assert!(!result.header_valid);
        assert!(result.errors.iter().any(|e| e.contains("header length")));
    }
}
