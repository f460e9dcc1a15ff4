use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snaptext_core::FileOffer;
use snaptext_logging::snap_info;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{0:?} is not a file")]
    NotAFile(PathBuf),
}

/// Reads the first path into an offer. Additional paths are not read.
pub fn offer_first(paths: &[PathBuf]) -> Result<Option<FileOffer>, IntakeError> {
    let Some((first, rest)) = paths.split_first() else {
        return Ok(None);
    };
    if !rest.is_empty() {
        snap_info!(
            "Ignoring {} additional file(s); one image is handled at a time",
            rest.len()
        );
    }
    read_offer(first).map(Some)
}

/// The declared type comes from the file extension, like a browser file picker.
pub fn read_offer(path: &Path) -> Result<FileOffer, IntakeError> {
    let metadata = fs::metadata(path).map_err(|source| IntakeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(IntakeError::NotAFile(path.to_path_buf()));
    }
    let data = fs::read(path).map_err(|source| IntakeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileOffer::new(name, declared_mime(path), data))
}

fn declared_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Splits what a terminal pastes when files are dropped onto it.
///
/// Handles single and double quotes, backslash-escaped spaces and
/// `file://` URIs.
pub fn parse_dropped_paths(input: &str) -> Vec<PathBuf> {
    split_words(input)
        .into_iter()
        .map(|word| file_uri_to_path(&word).unwrap_or_else(|| PathBuf::from(word)))
        .collect()
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn file_uri_to_path(word: &str) -> Option<PathBuf> {
    if !word.starts_with("file://") {
        return None;
    }
    Url::parse(word).ok()?.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn declared_type_follows_extension() {
        assert_eq!(declared_mime(Path::new("a/photo.PNG")), "image/png");
        assert_eq!(declared_mime(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(declared_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(declared_mime(Path::new("doc.pdf")), "application/pdf");
        assert_eq!(declared_mime(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn dropped_paths_respect_quotes_and_escapes() {
        assert_eq!(
            parse_dropped_paths(r#"'/tmp/my photo.png' "/tmp/a b.jpg" /tmp/c\ d.png plain.png"#),
            vec![
                PathBuf::from("/tmp/my photo.png"),
                PathBuf::from("/tmp/a b.jpg"),
                PathBuf::from("/tmp/c d.png"),
                PathBuf::from("plain.png"),
            ]
        );
        assert!(parse_dropped_paths("   ").is_empty());
        assert_eq!(parse_dropped_paths("''"), vec![PathBuf::from("")]);
    }

    #[cfg(unix)]
    #[test]
    fn file_uris_are_decoded() {
        assert_eq!(
            parse_dropped_paths("file:///tmp/my%20photo.png"),
            vec![PathBuf::from("/tmp/my photo.png")]
        );
    }

    #[test]
    fn reads_first_file_only() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first.png");
        fs::write(&first, b"png-bytes").unwrap();
        let missing = temp.path().join("missing.jpg");

        let offer = offer_first(&[first, missing]).unwrap().expect("offer");

        assert_eq!(offer.name, "first.png");
        assert_eq!(offer.declared_mime, "image/png");
        assert_eq!(offer.data.as_ref(), b"png-bytes");
    }

    #[test]
    fn unreadable_paths_are_errors() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            read_offer(&temp.path().join("missing.png")),
            Err(IntakeError::Read { .. })
        ));
        assert!(matches!(
            read_offer(temp.path()),
            Err(IntakeError::NotAFile(_))
        ));
        assert_eq!(offer_first(&[]).unwrap(), None);
    }
}
