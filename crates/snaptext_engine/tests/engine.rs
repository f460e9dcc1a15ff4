use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use snaptext_engine::{
    ChannelEventSink, ClientSettings, EngineEvent, EngineHandle, ExtractionError,
    ExtractionOutput, Extractor, FailureKind, ReqwestExtractor, UploadImage,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image(name: &str) -> UploadImage {
    UploadImage {
        file_name: name.to_string(),
        mime_type: "image/jpeg".to_string(),
        data: Bytes::from_static(b"jpeg"),
    }
}

/// Answers with the uploaded file name, recording every call.
#[derive(Default)]
struct EchoExtractor {
    calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Extractor for EchoExtractor {
    async fn extract(&self, image: &UploadImage) -> Result<ExtractionOutput, ExtractionError> {
        self.calls.lock().unwrap().push(image.file_name.clone());
        Ok(ExtractionOutput {
            extracted_text: format!("text of {}", image.file_name),
            response_bytes: 0,
        })
    }
}

#[test]
fn submitted_job_reports_completion_with_its_token() {
    snaptext_logging::initialize_for_tests();
    let (tx, rx) = mpsc::channel();
    let extractor = Arc::new(EchoExtractor::default());
    let engine = EngineHandle::new(extractor.clone(), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine starts");

    assert!(engine.submit(7, image("photo.jpg")));

    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("completion event");
    assert_eq!(
        event,
        EngineEvent::ExtractionCompleted {
            token: 7,
            result: Ok(ExtractionOutput {
                extracted_text: "text of photo.jpg".to_string(),
                response_bytes: 0,
            }),
        }
    );
    assert_eq!(*extractor.calls.lock().unwrap(), vec!["photo.jpg".to_string()]);
}

#[test]
fn each_submission_is_one_request() {
    let (tx, rx) = mpsc::channel();
    let extractor = Arc::new(EchoExtractor::default());
    let engine = EngineHandle::new(extractor.clone(), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine starts");

    assert!(engine.submit(1, image("a.jpg")));
    assert!(engine.submit(2, image("b.jpg")));

    let mut tokens: Vec<_> = (0..2)
        .map(|_| match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
            EngineEvent::ExtractionCompleted { token, .. } => token,
        })
        .collect();
    tokens.sort_unstable();
    assert_eq!(tokens, vec![1, 2]);
    assert_eq!(extractor.calls.lock().unwrap().len(), 2);
}

#[test]
fn failure_from_service_is_delivered_as_event() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                r#"{"error": "Invalid file format. Only PNG, JPG, and JPEG are supported."}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let (tx, rx) = mpsc::channel();
    let extractor = ReqwestExtractor::new(ClientSettings {
        endpoint: format!("{}/upload", server.uri()),
        ..ClientSettings::default()
    })
    .unwrap();
    let engine = EngineHandle::new(Arc::new(extractor), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine starts");

    assert!(engine.submit(3, image("photo.jpg")));

    let EngineEvent::ExtractionCompleted { token, result } =
        rx.recv_timeout(Duration::from_secs(10)).expect("event");
    assert_eq!(token, 3);
    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(
        err.message,
        "Invalid file format. Only PNG, JPG, and JPEG are supported."
    );
    drop(server);
}
