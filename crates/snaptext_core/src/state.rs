use std::fmt;
use std::path::PathBuf;

use crate::view_model::{AppViewModel, StagedImageView};
use crate::{ResultEditor, StagedImage};

/// Identifies one conversion attempt. Issued in increasing order.
pub type RequestToken = u64;

/// Payload-free tag of the current workflow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    ImageStaged,
    Converting,
    ResultReady,
}

/// Workflow mode together with the data that mode owns.
///
/// The staged image exists in every variant but `Idle`; the editor exists
/// only in `ResultReady`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Workflow {
    #[default]
    Idle,
    ImageStaged {
        image: StagedImage,
    },
    Converting {
        image: StagedImage,
        token: RequestToken,
    },
    ResultReady {
        image: StagedImage,
        editor: ResultEditor,
    },
}

impl Workflow {
    pub fn state(&self) -> WorkflowState {
        match self {
            Workflow::Idle => WorkflowState::Idle,
            Workflow::ImageStaged { .. } => WorkflowState::ImageStaged,
            Workflow::Converting { .. } => WorkflowState::Converting,
            Workflow::ResultReady { .. } => WorkflowState::ResultReady,
        }
    }

    pub fn staged_image(&self) -> Option<&StagedImage> {
        match self {
            Workflow::Idle => None,
            Workflow::ImageStaged { image }
            | Workflow::Converting { image, .. }
            | Workflow::ResultReady { image, .. } => Some(image),
        }
    }

    pub fn editor(&self) -> Option<&ResultEditor> {
        match self {
            Workflow::ResultReady { editor, .. } => Some(editor),
            _ => None,
        }
    }

    fn editor_mut(&mut self) -> Option<&mut ResultEditor> {
        match self {
            Workflow::ResultReady { editor, .. } => Some(editor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    Timeout,
    HttpStatus(u16),
    ResponseTooLarge,
    MalformedResponse,
    MissingText,
}

/// Why a conversion attempt failed. Kept for diagnostics until the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub cause: FailureCause,
    pub message: String,
}

impl RequestError {
    pub fn new(cause: FailureCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            FailureCause::Transport => write!(f, "network error: {}", self.message),
            FailureCause::Timeout => write!(f, "request timed out: {}", self.message),
            FailureCause::HttpStatus(code) => write!(f, "http status {code}: {}", self.message),
            FailureCause::ResponseTooLarge => write!(f, "response too large: {}", self.message),
            FailureCause::MalformedResponse => write!(f, "malformed response: {}", self.message),
            FailureCause::MissingText => write!(f, "no text in response: {}", self.message),
        }
    }
}

/// One-line outcome of the last user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UnsupportedFileType { name: String, declared_mime: String },
    ConversionFailed(RequestError),
    Copied,
    CopyFailed(String),
    Exported(PathBuf),
    ExportFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnsupportedFileType {
                name,
                declared_mime,
            } => write!(
                f,
                "{name} was not staged: {declared_mime} is not supported (use JPG or PNG)"
            ),
            Notice::ConversionFailed(error) => {
                write!(f, "Conversion failed ({error}). You can convert again.")
            }
            Notice::Copied => write!(f, "Text copied to clipboard."),
            Notice::CopyFailed(reason) => write!(f, "Copy failed: {reason}"),
            Notice::Exported(path) => write!(f, "Saved to {}", path.display()),
            Notice::ExportFailed(reason) => write!(f, "Download failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    workflow: Workflow,
    last_error: Option<RequestError>,
    notice: Option<Notice>,
    last_token: RequestToken,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn workflow_state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.workflow.staged_image()
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.workflow.editor().map(ResultEditor::text)
    }

    pub fn last_error(&self) -> Option<&RequestError> {
        self.last_error.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Token of the request currently in flight, if any.
    pub fn in_flight_token(&self) -> Option<RequestToken> {
        match self.workflow {
            Workflow::Converting { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let state = self.workflow.state();
        AppViewModel {
            state,
            image: self.workflow.staged_image().map(|image| StagedImageView {
                name: image.name().to_string(),
                mime: image.kind().mime_type(),
                byte_len: image.byte_len(),
            }),
            text: self.extracted_text().map(ToOwned::to_owned),
            can_convert: state == WorkflowState::ImageStaged,
            can_copy: state == WorkflowState::ResultReady,
            can_download: state == WorkflowState::ResultReady,
            can_start_over: state != WorkflowState::Idle,
            is_loading: state == WorkflowState::Converting,
            notice: self.notice.as_ref().map(ToString::to_string),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn editor(&self) -> Option<&ResultEditor> {
        self.workflow.editor()
    }

    pub(crate) fn editor_mut(&mut self) -> Option<&mut ResultEditor> {
        self.workflow.editor_mut()
    }

    /// Only `Idle` and `ImageStaged` take new files.
    pub(crate) fn accepts_files(&self) -> bool {
        matches!(
            self.workflow.state(),
            WorkflowState::Idle | WorkflowState::ImageStaged
        )
    }

    /// Replaces any staged image.
    pub(crate) fn stage(&mut self, image: StagedImage) -> bool {
        if !self.accepts_files() {
            return false;
        }
        self.workflow = Workflow::ImageStaged { image };
        self.notice = None;
        self.dirty = true;
        true
    }

    /// Moves `ImageStaged` to `Converting` under a fresh token.
    pub(crate) fn begin_conversion(&mut self) -> Option<(RequestToken, StagedImage)> {
        match std::mem::take(&mut self.workflow) {
            Workflow::ImageStaged { image } => {
                self.last_token += 1;
                let token = self.last_token;
                self.workflow = Workflow::Converting {
                    image: image.clone(),
                    token,
                };
                self.last_error = None;
                self.notice = None;
                self.dirty = true;
                Some((token, image))
            }
            other => {
                self.workflow = other;
                None
            }
        }
    }

    /// Applies a response if it belongs to the attempt in flight.
    ///
    /// Returns `false` when the response is stale and was dropped.
    pub(crate) fn finish_conversion(
        &mut self,
        token: RequestToken,
        result: Result<String, RequestError>,
    ) -> bool {
        match std::mem::take(&mut self.workflow) {
            Workflow::Converting {
                image,
                token: current,
            } if current == token => {
                match result {
                    Ok(text) => {
                        self.workflow = Workflow::ResultReady {
                            image,
                            editor: ResultEditor::new(text),
                        };
                        self.last_error = None;
                    }
                    Err(error) => {
                        self.workflow = Workflow::ImageStaged { image };
                        self.notice = Some(Notice::ConversionFailed(error.clone()));
                        self.last_error = Some(error);
                    }
                }
                self.dirty = true;
                true
            }
            other => {
                self.workflow = other;
                false
            }
        }
    }

    /// Back to `Idle` from anywhere. The token counter keeps counting.
    pub(crate) fn reset(&mut self) {
        self.workflow = Workflow::Idle;
        self.last_error = None;
        self.notice = None;
        self.dirty = true;
    }
}
