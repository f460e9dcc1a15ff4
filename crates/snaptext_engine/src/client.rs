use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use snaptext_logging::{describe_len, snap_debug, snap_info};
use url::Url;

use crate::{ExtractionError, ExtractionOutput, FailureKind, UploadImage};

/// Address of the extraction service when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";

const FILE_FIELD: &str = "file";
const EXTRACTED_TEXT_FIELD: &str = "extracted_text";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 8 * 1024 * 1024,
        }
    }
}

/// One upload, one answer. Implementations never retry.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, image: &UploadImage) -> Result<ExtractionOutput, ExtractionError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestExtractor {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestExtractor {
    pub fn new(settings: ClientSettings) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ExtractionError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> Result<Url, ExtractionError> {
        let url = Url::parse(&self.settings.endpoint)
            .map_err(|err| ExtractionError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ExtractionError::new(
                FailureKind::InvalidEndpoint,
                format!("unsupported scheme {other}"),
            )),
        }
    }

    async fn read_capped(&self, response: reqwest::Response) -> Result<Vec<u8>, ExtractionError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ExtractionError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ExtractionError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Extractor for ReqwestExtractor {
    async fn extract(&self, image: &UploadImage) -> Result<ExtractionOutput, ExtractionError> {
        let endpoint = self.endpoint()?;
        let length = image.data.len() as u64;
        let part = Part::stream_with_length(image.data.clone(), length)
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|err| ExtractionError::new(FailureKind::Network, err.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        snap_info!(
            "Uploading {} ({}) to {}",
            image.file_name,
            describe_len("image", image.data.len()),
            endpoint
        );

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_capped(response).await?;
        snap_debug!(
            "Extraction service answered {} with {}",
            status,
            describe_len("body", body.len())
        );

        if !status.is_success() {
            let message = service_error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(ExtractionError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let extracted_text = parse_payload(&body)?;
        Ok(ExtractionOutput {
            extracted_text,
            response_bytes: body.len() as u64,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// Success bodies must be a JSON object. An empty `extracted_text` is passed
/// through; the workflow decides what an empty page means.
fn parse_payload(body: &[u8]) -> Result<String, ExtractionError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|err| ExtractionError::new(FailureKind::MalformedResponse, err.to_string()))?;
    let Value::Object(mut fields) = payload else {
        return Err(ExtractionError::new(
            FailureKind::MalformedResponse,
            "reply is not a JSON object",
        ));
    };
    match fields.remove(EXTRACTED_TEXT_FIELD) {
        Some(Value::String(text)) => Ok(text),
        None | Some(Value::Null) => Err(ExtractionError::new(
            FailureKind::MissingText,
            "extracted_text is absent",
        )),
        Some(other) => Err(ExtractionError::new(
            FailureKind::MalformedResponse,
            format!("extracted_text is not a string: {other}"),
        )),
    }
}

/// The service reports failures as `{"error": "..."}`.
fn service_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ServiceErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
        .filter(|message| !message.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ExtractionError {
    if err.is_timeout() {
        return ExtractionError::new(FailureKind::Timeout, err.to_string());
    }
    ExtractionError::new(FailureKind::Network, err.to_string())
}
