//! SnapText engine: extraction-service IO and effect execution.
mod client;
mod engine;
mod export;
mod filename;
mod persist;
mod types;

pub use client::{ClientSettings, Extractor, ReqwestExtractor, DEFAULT_ENDPOINT};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use export::{export_text, ExportError};
pub use filename::sanitize_export_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, ExtractionError, ExtractionOutput, FailureKind, RequestToken, UploadImage,
};
