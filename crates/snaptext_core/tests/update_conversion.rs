use std::sync::Once;

use pretty_assertions::assert_eq;
use snaptext_core::{
    update, AppState, Effect, FailureCause, FileOffer, Msg, RequestError, Workflow, WorkflowState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(snaptext_logging::initialize_for_tests);
}

fn staged(name: &str, mime: &str) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesOffered(vec![FileOffer::new(name, mime, b"image-bytes".to_vec())]),
    );
    state
}

fn convert(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::ConvertClicked);
    let token = match effects.as_slice() {
        [Effect::StartExtraction { token, .. }] => *token,
        other => panic!("expected one StartExtraction, got {other:?}"),
    };
    (state, token)
}

#[test]
fn convert_moves_to_converting_before_any_response() {
    init_logging();
    let state = staged("photo.png", "image/png");
    let image = state.staged_image().cloned().expect("staged");

    let (state, effects) = update(state, Msg::ConvertClicked);

    assert_eq!(state.workflow_state(), WorkflowState::Converting);
    assert_eq!(
        effects,
        vec![Effect::StartExtraction { token: 1, image }]
    );
    let view = state.view();
    assert!(view.is_loading);
    assert!(!view.can_convert);
}

#[test]
fn convert_is_ignored_unless_image_staged() {
    init_logging();
    let (idle, effects) = update(AppState::new(), Msg::ConvertClicked);
    assert_eq!(idle.workflow(), &Workflow::Idle);
    assert!(effects.is_empty());

    let (converting, _) = convert(staged("photo.png", "image/png"));
    let before = converting.clone();
    let (converting, effects) = update(converting, Msg::ConvertClicked);
    assert_eq!(converting, before);
    assert!(effects.is_empty());
}

#[test]
fn success_fills_buffer_exactly() {
    init_logging();
    let (state, token) = convert(staged("photo.png", "image/png"));

    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Ok("Hello world".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.workflow_state(), WorkflowState::ResultReady);
    assert_eq!(state.extracted_text(), Some("Hello world"));
    assert_eq!(state.last_error(), None);
    let view = state.view();
    assert!(view.can_copy && view.can_download && view.can_start_over);
    assert!(!view.can_convert);
}

#[test]
fn failure_returns_to_staged_with_same_image() {
    init_logging();
    let state = staged("photo.jpg", "image/jpeg");
    let original = state.staged_image().cloned().expect("staged");
    let (state, token) = convert(state);

    let error = RequestError::new(FailureCause::Timeout, "operation timed out");
    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Err(error.clone()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.workflow(), &Workflow::ImageStaged { image: original });
    assert_eq!(state.extracted_text(), None);
    assert_eq!(state.last_error(), Some(&error));
    let view = state.view();
    assert!(view.can_convert);
    assert_eq!(
        view.notice.as_deref(),
        Some("Conversion failed (request timed out: operation timed out). You can convert again.")
    );
}

#[test]
fn empty_text_is_treated_as_failure() {
    init_logging();
    let (state, token) = convert(staged("photo.png", "image/png"));

    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Ok(String::new()),
        },
    );

    assert_eq!(state.workflow_state(), WorkflowState::ImageStaged);
    assert_eq!(
        state.last_error().map(|e| e.cause),
        Some(FailureCause::MissingText)
    );
}

#[test]
fn retry_issues_a_new_token_and_clears_error() {
    init_logging();
    let (state, first) = convert(staged("photo.jpg", "image/jpeg"));
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token: first,
            result: Err(RequestError::new(FailureCause::HttpStatus(500), "boom")),
        },
    );
    assert!(state.last_error().is_some());

    let (state, second) = convert(state);

    assert!(second > first);
    assert_eq!(state.last_error(), None);
    assert_eq!(state.view().notice, None);
}

#[test]
fn stale_response_is_discarded() {
    init_logging();
    let (state, first) = convert(staged("photo.png", "image/png"));
    let (state, _) = update(state, Msg::StartOverClicked);
    let (state, _) = update(
        state,
        Msg::FilesOffered(vec![FileOffer::new("other.png", "image/png", b"o".to_vec())]),
    );
    let (state, second) = convert(state);
    assert_ne!(first, second);
    let before = state.clone();

    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            token: first,
            result: Ok("late text".to_string()),
        },
    );

    assert_eq!(state, before);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token: second,
            result: Ok("fresh text".to_string()),
        },
    );
    assert_eq!(state.extracted_text(), Some("fresh text"));
    assert_eq!(state.staged_image().map(|i| i.name()), Some("other.png"));
}

#[test]
fn response_after_start_over_is_discarded() {
    init_logging();
    let (state, token) = convert(staged("photo.png", "image/png"));
    let (state, _) = update(state, Msg::StartOverClicked);

    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Ok("late".to_string()),
        },
    );

    assert_eq!(state.workflow(), &Workflow::Idle);
}

#[test]
fn duplicate_response_is_applied_once() {
    init_logging();
    let (state, token) = convert(staged("photo.png", "image/png"));
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Ok("first".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            token,
            result: Err(RequestError::new(FailureCause::Transport, "reset")),
        },
    );

    assert_eq!(state.workflow_state(), WorkflowState::ResultReady);
    assert_eq!(state.extracted_text(), Some("first"));
}
