//! SnapText core: pure workflow state machine and view-model helpers.
mod editor;
mod effect;
mod intake;
mod msg;
mod state;
mod update;
mod view_model;

pub use editor::{ResultEditor, DEFAULT_EXPORT_FILENAME};
pub use effect::Effect;
pub use intake::{FileOffer, ImageKind, StagedImage};
pub use msg::Msg;
pub use state::{
    AppState, FailureCause, Notice, RequestError, RequestToken, Workflow, WorkflowState,
};
pub use update::update;
pub use view_model::{AppViewModel, StagedImageView};
