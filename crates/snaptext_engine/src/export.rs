use std::path::{Path, PathBuf};

use snaptext_logging::{describe_len, snap_info};
use thiserror::Error;

use crate::filename::sanitize_export_filename;
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not save {filename}: {source}")]
    Persist {
        filename: String,
        #[source]
        source: PersistError,
    },
}

/// Saves `text` verbatim as UTF-8 into `dir`, under a sanitized `filename`.
pub fn export_text(dir: &Path, filename: &str, text: &str) -> Result<PathBuf, ExportError> {
    let filename = sanitize_export_filename(filename);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer
        .write(&filename, text)
        .map_err(|source| ExportError::Persist {
            filename: filename.clone(),
            source,
        })?;
    snap_info!(
        "Exported {} to {}",
        describe_len("text", text.len()),
        path.display()
    );
    Ok(path)
}
