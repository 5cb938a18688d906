// Fri Jan 17 2026 - Alex

use crate::output::OutputError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write rendered output to `path`, or to stdout when there is none.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), OutputError> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
            log::info!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(content.as_bytes())?;
            lock.flush()?;
        }
    }
    Ok(())
}
