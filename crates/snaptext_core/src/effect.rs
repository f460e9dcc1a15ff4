use crate::{RequestToken, StagedImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the staged image once; the outcome returns as `Msg::ExtractionFinished`.
    StartExtraction {
        token: RequestToken,
        image: StagedImage,
    },
    CopyToClipboard {
        text: String,
    },
    ExportText {
        filename: String,
        text: String,
    },
}
