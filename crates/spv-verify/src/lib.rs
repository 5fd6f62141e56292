//! SPV envelope verification core.
//!
//! A portable "envelope" bundles a raw transaction, a TSC merkle proof and
//! an 80-byte block header so that a holder can demonstrate the
//! transaction's inclusion in a block without trusting a full node. This
//! crate is the pure, synchronous engine behind that: SHA-256 and hash256
//! primitives, hex and byte-order utilities, the block header codec,
//! merkle-root reconstruction, envelope assembly with an integrity
//! checksum, and the four-check verifier. Every operation is a pure
//! function of its inputs; fetching data from a provider and the CLI live
//! in the sibling crates.

pub mod envelope;
pub mod error;
pub mod header;
pub mod hex;
pub mod merkle;
pub mod sha256;
pub mod verify;

pub use envelope::{compute_checksum, Envelope, EnvelopeBuilder, PROOF_FORMAT_TSC};
pub use error::SpvError;
pub use header::{extract_merkle_root, header_hash, BlockHeader, HEADER_SIZE};
pub use merkle::{compute_merkle_root, MerkleProof, TscProof, DUPLICATE_MARKER};
pub use verify::{verify, VerificationResult};
