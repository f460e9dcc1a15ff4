use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("export directory missing or not writable: {0}")]
    ExportDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Checks once, before any export, that `dir` exists (creating it if
/// missing) and accepts new files.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    prepare_dir(dir)?;
    Builder::new()
        .prefix(".snaptext-check")
        .tempfile_in(dir)
        .map_err(|e| PersistError::ExportDir(e.to_string()))?;
    Ok(())
}

/// Creates `dir` if missing. Writability shows up when the temp file is made.
fn prepare_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::ExportDir(format!(
            "{} is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::ExportDir(e.to_string()))
        }
        Err(err) => Err(PersistError::ExportDir(err.to_string())),
    }
}

/// Writes `{dir}/{filename}` through a temp file and a rename, so readers
/// never observe a half-written export.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        prepare_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = Builder::new()
            .prefix(".snaptext-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // `persist` replaces an existing target.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
