//! Block header codec for the fixed 80-byte layout.

use serde::{Deserialize, Serialize};

use crate::error::SpvError;
use crate::hex::{decode_hex, from_display_hex, to_display_hex};
use crate::sha256::hash256;

/// Size of a serialized block header in bytes.
pub const HEADER_SIZE: usize = 80;

/// Parsed block header fields.
///
/// Integer fields are little-endian in the raw form. The two hash fields
/// are stored byte-reversed relative to their hash-function output and
/// exposed here in display order. `bits` is the compact difficulty target,
/// kept raw and never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub version: u32,
    /// Hash of the previous block, display hex.
    pub prev_hash: String,
    /// Merkle root of the block's transactions, display hex.
    pub merkle_root: String,
    /// Unix seconds.
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Parse an exact 80-byte header.
    pub fn parse(bytes: &[u8]) -> Result<Self, SpvError> {
        if bytes.len() != HEADER_SIZE {
            return Err(SpvError::Format(format!(
                "invalid header length {}, want {}",
                bytes.len(),
                HEADER_SIZE
            )));
        }
        Ok(BlockHeader {
            version: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            prev_hash: to_display_hex(&bytes[4..36]),
            merkle_root: to_display_hex(&bytes[36..68]),
            timestamp: u32::from_le_bytes([bytes[68], bytes[69], bytes[70], bytes[71]]),
            bits: u32::from_le_bytes([bytes[72], bytes[73], bytes[74], bytes[75]]),
            nonce: u32::from_le_bytes([bytes[76], bytes[77], bytes[78], bytes[79]]),
        })
    }

    /// Parse a header from hex text.
    pub fn from_hex(header_hex: &str) -> Result<Self, SpvError> {
        Self::parse(&decode_hex(header_hex)?)
    }

    /// Serialize back to the raw 80-byte form.
    ///
    /// Lossless inverse of [`BlockHeader::parse`]: re-serializing the six
    /// fields reproduces the original bytes exactly.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE], SpvError> {
        let prev = from_display_hex(&self.prev_hash)?;
        let root = from_display_hex(&self.merkle_root)?;
        if prev.len() != 32 || root.len() != 32 {
            return Err(SpvError::Format(
                "header hash fields must be 32 bytes".to_string(),
            ));
        }
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&prev);
        out[36..68].copy_from_slice(&root);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        Ok(out)
    }
}

/// hash256 of the raw header bytes in display order — the block hash.
pub fn header_hash(header: &[u8]) -> String {
    to_display_hex(&hash256(header))
}

/// Extract the merkle-root field (bytes 36..68) in display order without a
/// full parse.
pub fn extract_merkle_root(header: &[u8]) -> Result<String, SpvError> {
    if header.len() != HEADER_SIZE {
        return Err(SpvError::Format(format!(
            "invalid header length {}, want {}",
            header.len(),
            HEADER_SIZE
        )));
    }
    Ok(to_display_hex(&header[36..68]))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bitcoin genesis block header.
    const GENESIS_HEADER: &str = "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c";
    const GENESIS_HASH: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
    const GENESIS_MERKLE_ROOT: &str =
        "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    #[test]
    fn test_parse_genesis_fields() {
        let header = BlockHeader::from_hex(GENESIS_HEADER).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(
            header.prev_hash,
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(header.merkle_root, GENESIS_MERKLE_ROOT);
        assert_eq!(header.timestamp, 1231006505);
        assert_eq!(header.bits, 486604799);
        assert_eq!(header.nonce, 2083236893);
    }

    #[test]
    fn test_roundtrip_is_lossless() {
        let bytes = decode_hex(GENESIS_HEADER).unwrap();
        let header = BlockHeader::parse(&bytes).unwrap();
        assert_eq!(header.to_bytes().unwrap().to_vec(), bytes);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let bytes = decode_hex(GENESIS_HEADER).unwrap();
        assert!(matches!(
            BlockHeader::parse(&bytes[..79]),
            Err(SpvError::Format(_))
        ));
        let mut long = bytes.clone();
        long.push(0);
        assert!(matches!(BlockHeader::parse(&long), Err(SpvError::Format(_))));
    }

    #[test]
    fn test_header_hash() {
        let bytes = decode_hex(GENESIS_HEADER).unwrap();
        assert_eq!(header_hash(&bytes), GENESIS_HASH);
    }

    #[test]
    fn test_extract_merkle_root() {
        let bytes = decode_hex(GENESIS_HEADER).unwrap();
        assert_eq!(extract_merkle_root(&bytes).unwrap(), GENESIS_MERKLE_ROOT);
        assert!(matches!(
            extract_merkle_root(&bytes[..68]),
            Err(SpvError::Format(_))
        ));
    }
}
