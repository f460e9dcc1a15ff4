use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use snaptext_logging::{snap_debug, snap_info, snap_warn};

use crate::{EngineEvent, Extractor, RequestToken, UploadImage};

/// Receives engine events on whatever thread finished the work.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events into a standard channel.
pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Extract {
        token: RequestToken,
        image: UploadImage,
    },
}

/// Runs uploads on a background tokio runtime so the caller's event thread
/// never waits on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(extractor: Arc<dyn Extractor>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("snaptext-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let extractor = extractor.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(extractor.as_ref(), command, sink.as_ref()).await;
                    });
                }
                snap_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Queues one upload. Returns `false` if the engine thread is gone.
    pub fn submit(&self, token: RequestToken, image: UploadImage) -> bool {
        self.cmd_tx
            .send(EngineCommand::Extract { token, image })
            .is_ok()
    }
}

async fn handle_command(extractor: &dyn Extractor, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Extract { token, image } => {
            let result = extractor.extract(&image).await;
            match &result {
                Ok(output) => snap_info!(
                    "Extraction {} finished: {} chars of text",
                    token,
                    output.extracted_text.chars().count()
                ),
                Err(err) => snap_warn!("Extraction {} failed: {}", token, err),
            }
            sink.emit(EngineEvent::ExtractionCompleted { token, result });
        }
    }
}
