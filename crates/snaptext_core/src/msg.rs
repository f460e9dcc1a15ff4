use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Files picked or dropped by the user. Only the first one is considered.
    FilesOffered(Vec<crate::FileOffer>),
    /// User clicked Convert.
    ConvertClicked,
    /// Extraction service answered (or failed) for the attempt with `token`.
    ExtractionFinished {
        token: crate::RequestToken,
        result: Result<String, crate::RequestError>,
    },
    /// User replaced the text buffer.
    TextEdited(String),
    /// User appended to the text buffer.
    TextAppended(String),
    /// User clicked Copy.
    CopyClicked,
    /// User clicked Download, optionally naming the file.
    DownloadClicked { filename: Option<String> },
    /// Clipboard write finished.
    CopyFinished(Result<(), String>),
    /// Export finished with the path written.
    ExportFinished(Result<PathBuf, String>),
    /// User clicked Start Over.
    StartOverClicked,
    /// Render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
