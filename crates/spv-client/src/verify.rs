//! The `verify` subcommand: load an envelope JSON file and report the
//! four verification checks.

use std::path::PathBuf;

use clap::Args;
use spv_verify::verify::verify;

use crate::store::load_envelope;

/// CLI arguments for the `verify` subcommand
#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Path to the envelope JSON file
    envelope_path: PathBuf,
}

/// Run the `verify` subcommand: print one line per check and exit
/// non-zero when the envelope is invalid
pub async fn run(args: VerifyArgs) -> Result<(), anyhow::Error> {
    let envelope = load_envelope(&args.envelope_path)?;
    let result = verify(&envelope);

    println!("TXID valid:     {}", mark(result.txid_valid));
    println!("Merkle valid:   {}", mark(result.merkle_valid));
    println!("Header valid:   {}", mark(result.header_valid));
    println!("Checksum valid: {}", mark(result.checksum_valid));

    if !result.errors.is_empty() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  - {err}");
        }
    }

    println!();
    if result.valid {
        println!("VALID ENVELOPE");
        Ok(())
    } else {
        println!("INVALID ENVELOPE");
        anyhow::bail!("envelope failed verification")
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAIL"
    }
}
