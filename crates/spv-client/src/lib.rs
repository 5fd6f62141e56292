//! SPV Envelope Client Library
//!
//! This library backs the `spv-client` binary: fetching envelope
//! components from a WhatsOnChain-compatible API, assembling and
//! verifying envelopes, and persisting them as JSON files.

pub mod address;
pub mod create;
pub mod store;
pub mod verify;

pub use create::create_envelope;
pub use store::{load_envelope, save_envelope};
