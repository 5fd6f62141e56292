//! Merkle proof types and root reconstruction.

use serde::{Deserialize, Serialize};

use crate::error::SpvError;
use crate::hex::{from_display_hex, to_display_hex};
use crate::sha256::hash256;

/// Path entry meaning "pair the running hash with itself", used at levels
/// with an odd node count. The provider may also send an empty string.
pub const DUPLICATE_MARKER: &str = "*";

/// A TSC merkle proof as it arrives from the data provider.
///
/// `tx_or_id`, `target` and `target_type` are optional on the wire; the
/// envelope builder fills them with the transaction id, the block hash and
/// `"header"` respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TscProof {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_or_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    pub index: u64,
}

/// Normalized merkle proof carried inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// Transaction id (or full transaction hex) the path starts from.
    pub tx_or_id: String,
    /// Reference to the path root, usually the block hash.
    pub target: String,
    /// Kind of `target`.
    pub target_type: String,
    /// Sibling hashes from leaf to root, display hex, with
    /// [`DUPLICATE_MARKER`] (or an empty string) for self-pairing.
    pub nodes: Vec<String>,
    /// Position of the leaf at the bottom tree level.
    pub index: u64,
}

/// Reconstruct the merkle root implied by `txid` and `proof`, in display
/// order.
///
/// Walks the path from leaf to root. At each level the sibling is either
/// the path entry (converted from display order) or, for a duplicate
/// marker, the running hash itself. Index parity picks the concatenation
/// order — an odd index means the running hash is the right child — and
/// the index halves to address the parent level.
///
/// An empty path means the leaf is itself the root (single-transaction
/// block). The index is not cross-checked against the path length; an
/// inconsistent index yields a root that simply fails to match the header
/// downstream.
pub fn compute_merkle_root(txid: &str, proof: &MerkleProof) -> Result<String, SpvError> {
    let mut current = from_display_hex(txid)?;
    if current.len() != 32 {
        return Err(SpvError::Format(format!(
            "invalid txid length {}, want 32 bytes",
            current.len()
        )));
    }
    let mut index = proof.index;

    for node in &proof.nodes {
        let sibling = if is_duplicate(node) {
            current.clone()
        } else {
            let bytes = from_display_hex(node)?;
            if bytes.len() != 32 {
                return Err(SpvError::Format(format!(
                    "invalid proof node length {}, want 32 bytes",
                    bytes.len()
                )));
            }
            bytes
        };

        let mut combined = [0u8; 64];
        if index & 1 == 1 {
            combined[..32].copy_from_slice(&sibling);
            combined[32..].copy_from_slice(&current);
        } else {
            combined[..32].copy_from_slice(&current);
            combined[32..].copy_from_slice(&sibling);
        }
        current = hash256(&combined).to_vec();
        index >>= 1;
    }

    Ok(to_display_hex(&current))
}

fn is_duplicate(node: &str) -> bool {
    node == DUPLICATE_MARKER || node.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof(nodes: Vec<&str>, index: u64) -> MerkleProof {
        MerkleProof {
            tx_or_id: String::new(),
            target: String::new(),
            target_type: "header".to_string(),
            nodes: nodes.into_iter().map(String::from).collect(),
            index,
        }
    }

    // hash256(b"leaf-a") and hash256(b"leaf-b"), display order.
    const LEAF_A: &str = "0331066a965c6951a701566fbcc27810f8b52bb26417eb9a4787477eee06cbcf";
    const LEAF_B: &str = "cbb0b204e17bc5275f4bef57e00a547924cfd67bea967fa7541aa15bc5860d7a";

    #[test]
    fn test_empty_path_leaf_is_root() {
        let root = compute_merkle_root(LEAF_A, &proof(vec![], 0)).unwrap();
        assert_eq!(root, LEAF_A);
    }

    #[test]
    fn test_two_leaf_tree_index_zero() {
        // root = display(hash256(internal(A) || internal(B)))
        let root = compute_merkle_root(LEAF_A, &proof(vec![LEAF_B], 0)).unwrap();
        assert_eq!(
            root,
            "5a24c3bcbbd049c03189f0e2c7732fffaa343d916c583b910d06734229cdadf6"
        );
    }

    #[test]
    fn test_two_leaf_tree_index_one_flips_order() {
        // root = display(hash256(internal(B) || internal(A)))
        let root = compute_merkle_root(LEAF_A, &proof(vec![LEAF_B], 1)).unwrap();
        assert_eq!(
            root,
            "3376f26ce17bfc4e44d691c72e7b0cab6ff578e1d8669a917cf16133855f7c19"
        );
    }

    #[test]
    fn test_duplicate_marker_pairs_with_self() {
        // Last transaction of a 3-leaf block: level 0 pairs with itself,
        // level 1 takes the left parent as sibling.
        let txid = "d7fe80ac8ab19d90c21a99c7d08d550900b51d7a51f5bf40dccb42643b5e2854";
        let p01 = "ccc140f375a35b61490d224543fc09e29a55083c8b87929cddf127de098b0318";
        let root = compute_merkle_root(txid, &proof(vec!["*", p01], 2)).unwrap();
        assert_eq!(
            root,
            "cadb84080771035c0ae676eaa00f9b41f01977c24e4a00d87b2beacc22bdd03c"
        );
        // Empty string is an equivalent duplicate marker.
        let root2 = compute_merkle_root(txid, &proof(vec!["", p01], 2)).unwrap();
        assert_eq!(root2, root);
    }

    #[test]
    fn test_inconsistent_index_still_yields_a_root() {
        // No bounds checking between index and path length: the call
        // succeeds and the wrong root surfaces only as a mismatch later.
        let odd = compute_merkle_root(LEAF_A, &proof(vec![LEAF_B], 7)).unwrap();
        let one = compute_merkle_root(LEAF_A, &proof(vec![LEAF_B], 1)).unwrap();
        assert_eq!(odd, one);
    }

    #[test]
    fn test_rejects_short_node() {
        let err = compute_merkle_root(LEAF_A, &proof(vec!["abcd"], 0));
        assert!(matches!(err, Err(SpvError::Format(_))));
    }

    #[test]
    fn test_rejects_short_txid() {
        let err = compute_merkle_root("abcd", &proof(vec![], 0));
        assert!(matches!(err, Err(SpvError::Format(_))));
    }
}
