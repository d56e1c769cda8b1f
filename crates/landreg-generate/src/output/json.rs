use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use landreg_core::Application;

use crate::errors::GenerationError;

/// Write a batch as a pretty-printed JSON array.
pub fn write_batch_json(path: &Path, applications: &[Application]) -> Result<(), GenerationError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, applications)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a batch written by [`write_batch_json`].
pub fn read_batch_json(path: &Path) -> Result<Vec<Application>, GenerationError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
