use crate::WorkflowState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImageView {
    pub name: String,
    pub mime: &'static str,
    pub byte_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub state: WorkflowState,
    pub image: Option<StagedImageView>,
    pub text: Option<String>,
    pub can_convert: bool,
    pub can_copy: bool,
    pub can_download: bool,
    pub can_start_over: bool,
    pub is_loading: bool,
    pub notice: Option<String>,
    pub last_error: Option<String>,
    pub dirty: bool,
}
