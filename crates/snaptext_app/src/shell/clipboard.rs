/// Write-only access to a clipboard.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// The system clipboard, opened on first use.
///
/// On X11 the clipboard only serves its content while the owning handle is
/// alive, so the handle is kept for the lifetime of the shell.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            let opened = arboard::Clipboard::new().map_err(|err| err.to_string())?;
            self.inner = Some(opened);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(|err| err.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}
