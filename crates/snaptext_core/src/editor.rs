use crate::Effect;

/// File name used when a download does not name one.
pub const DEFAULT_EXPORT_FILENAME: &str = "extracted_text.txt";

/// Editable buffer holding the text returned by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultEditor {
    text: String,
}

impl ResultEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Unconditional overwrite; no validation and no length limit.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    pub fn append(&mut self, suffix: &str) {
        self.text.push_str(suffix);
    }

    /// Snapshot of the buffer for the clipboard, taken now.
    pub fn copy_to_clipboard(&self) -> Effect {
        Effect::CopyToClipboard {
            text: self.text.clone(),
        }
    }

    /// Snapshot of the buffer as a plain-text file, taken now.
    pub fn export_as_file(&self, filename: Option<&str>) -> Effect {
        let filename = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_EXPORT_FILENAME);
        Effect::ExportText {
            filename: filename.to_string(),
            text: self.text.clone(),
        }
    }
}
