//! JSON persistence for envelopes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use spv_verify::Envelope;
use tracing::info;

/// Write a value as pretty-printed JSON, creating parent directories as
/// needed.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), anyhow::Error> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Save an envelope to a JSON file
pub fn save_envelope(envelope: &Envelope, path: &Path) -> Result<(), anyhow::Error> {
    write_json(envelope, path)?;
    info!("Envelope written to {}", path.display());
    Ok(())
}

/// Load an envelope from a JSON file
pub fn load_envelope(path: &Path) -> Result<Envelope, anyhow::Error> {
    let file = File::open(path)?;
    let envelope = serde_json::from_reader(BufReader::new(file))?;
    Ok(envelope)
}
