use crate::intake::{self, IntakeOutcome};
use crate::{AppState, Effect, FailureCause, Msg, Notice, RequestError, ResultEditor};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that are not enabled in the current workflow state leave the
/// state untouched and produce no effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesOffered(offers) => {
            if !state.accepts_files() {
                return (state, Vec::new());
            }
            match intake::evaluate(offers) {
                IntakeOutcome::Accepted(image) => {
                    state.stage(image);
                }
                IntakeOutcome::Rejected {
                    name,
                    declared_mime,
                } => {
                    state.set_notice(Notice::UnsupportedFileType {
                        name,
                        declared_mime,
                    });
                }
                IntakeOutcome::Empty => {}
            }
            Vec::new()
        }
        Msg::ConvertClicked => match state.begin_conversion() {
            Some((token, image)) => vec![Effect::StartExtraction { token, image }],
            None => Vec::new(),
        },
        Msg::ExtractionFinished { token, result } => {
            // An empty buffer would look like a successful blank page.
            let result = result.and_then(|text| {
                if text.is_empty() {
                    Err(RequestError::new(
                        FailureCause::MissingText,
                        "extracted_text is empty",
                    ))
                } else {
                    Ok(text)
                }
            });
            state.finish_conversion(token, result);
            Vec::new()
        }
        Msg::TextEdited(text) => {
            if let Some(editor) = state.editor_mut() {
                editor.set_text(text);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TextAppended(suffix) => {
            if let Some(editor) = state.editor_mut() {
                editor.append(&suffix);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CopyClicked => state
            .editor()
            .map(ResultEditor::copy_to_clipboard)
            .into_iter()
            .collect(),
        Msg::DownloadClicked { filename } => state
            .editor()
            .map(|editor| editor.export_as_file(filename.as_deref()))
            .into_iter()
            .collect(),
        Msg::CopyFinished(result) => {
            if state.editor().is_some() {
                state.set_notice(match result {
                    Ok(()) => Notice::Copied,
                    Err(reason) => Notice::CopyFailed(reason),
                });
            }
            Vec::new()
        }
        Msg::ExportFinished(result) => {
            if state.editor().is_some() {
                state.set_notice(match result {
                    Ok(path) => Notice::Exported(path),
                    Err(reason) => Notice::ExportFailed(reason),
                });
            }
            Vec::new()
        }
        Msg::StartOverClicked => {
            state.reset();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
