use std::fmt;

use bytes::Bytes;

pub type RequestToken = u64;

/// What gets uploaded: the bytes plus the metadata the multipart part carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadImage {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutput {
    pub extracted_text: String,
    pub response_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ExtractionCompleted {
        token: RequestToken,
        result: Result<ExtractionOutput, ExtractionError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    pub kind: FailureKind,
    pub message: String,
}

impl ExtractionError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    MissingText,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => f.write_str("endpoint is not a usable http(s) url"),
            FailureKind::HttpStatus(code) => write!(f, "service answered {code}"),
            FailureKind::Timeout => f.write_str("upload timed out"),
            FailureKind::Network => f.write_str("could not reach the service"),
            FailureKind::TooLarge {
                max_bytes,
                actual: Some(actual),
            } => write!(f, "reply of {actual} bytes exceeds the {max_bytes} byte limit"),
            FailureKind::TooLarge {
                max_bytes,
                actual: None,
            } => write!(f, "reply exceeds the {max_bytes} byte limit"),
            FailureKind::MalformedResponse => f.write_str("reply is not the expected JSON"),
            FailureKind::MissingText => f.write_str("reply has no extracted_text"),
        }
    }
}

impl std::error::Error for ExtractionError {}
