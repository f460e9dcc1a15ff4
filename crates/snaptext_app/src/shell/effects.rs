use std::path::PathBuf;
use std::sync::mpsc;

use snaptext_core::{Effect, FailureCause, Msg, RequestError};
use snaptext_engine::{export_text, EngineEvent, EngineHandle, EventSink, FailureKind, UploadImage};
use snaptext_logging::{describe_len, snap_error, snap_info};

use super::app::ShellEvent;
use super::clipboard::ClipboardWriter;

/// Executes effects produced by `update`.
///
/// Uploads go to the engine and come back later through [`MsgSink`];
/// clipboard and export run here and return their outcome immediately.
pub struct EffectRunner {
    engine: EngineHandle,
    clipboard: Box<dyn ClipboardWriter>,
    export_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        clipboard: Box<dyn ClipboardWriter>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            clipboard,
            export_dir,
        }
    }

    /// Runs `effects` in order and returns the messages they produced synchronously.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartExtraction { token, image } => {
                    snap_info!(
                        "StartExtraction token={} name={} {}",
                        token,
                        image.name(),
                        describe_len("image", image.byte_len())
                    );
                    let upload = UploadImage {
                        file_name: image.name().to_string(),
                        mime_type: image.kind().mime_type().to_string(),
                        data: image.data().clone(),
                    };
                    if !self.engine.submit(token, upload) {
                        snap_error!("Engine stopped; extraction {} cannot start", token);
                        follow_ups.push(Msg::ExtractionFinished {
                            token,
                            result: Err(RequestError::new(
                                FailureCause::Transport,
                                "extraction engine is not running",
                            )),
                        });
                    }
                }
                Effect::CopyToClipboard { text } => {
                    let result = self.clipboard.write_text(&text);
                    match &result {
                        Ok(()) => snap_info!("Copied {}", describe_len("text", text.len())),
                        Err(err) => snap_error!("Clipboard write failed: {}", err),
                    }
                    follow_ups.push(Msg::CopyFinished(result));
                }
                Effect::ExportText { filename, text } => {
                    let result = export_text(&self.export_dir, &filename, &text).map_err(|err| {
                        snap_error!("Export of {} failed: {}", filename, err);
                        err.to_string()
                    });
                    follow_ups.push(Msg::ExportFinished(result));
                }
            }
        }
        follow_ups
    }
}

/// Feeds engine completions back into the shell's event queue.
pub struct MsgSink {
    tx: mpsc::Sender<ShellEvent>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<ShellEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(ShellEvent::Dispatch(extraction_msg(event)));
    }
}

fn extraction_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ExtractionCompleted { token, result } => Msg::ExtractionFinished {
            token,
            result: result
                .map(|output| output.extracted_text)
                .map_err(|err| RequestError::new(map_failure(&err.kind), err.message)),
        },
    }
}

fn map_failure(kind: &FailureKind) -> FailureCause {
    match kind {
        FailureKind::InvalidEndpoint | FailureKind::Network => FailureCause::Transport,
        FailureKind::Timeout => FailureCause::Timeout,
        FailureKind::HttpStatus(code) => FailureCause::HttpStatus(*code),
        FailureKind::TooLarge { .. } => FailureCause::ResponseTooLarge,
        FailureKind::MalformedResponse => FailureCause::MalformedResponse,
        FailureKind::MissingText => FailureCause::MissingText,
    }
}
