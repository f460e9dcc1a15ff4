use snaptext_core::{AppViewModel, StagedImageView, WorkflowState};

const RULE: &str = "----------------------------------------";

/// Turns the view into output lines. The text body is printed only when it
/// differs from what `previous` showed.
pub fn render(view: &AppViewModel, previous: Option<&AppViewModel>) -> Vec<String> {
    let mut lines = Vec::new();

    let status = match (view.state, view.image.as_ref()) {
        (WorkflowState::Idle, _) | (_, None) => {
            "Drop a JPG or PNG image here, or type `open <path>`.".to_string()
        }
        (WorkflowState::ImageStaged, Some(image)) => {
            format!("Staged {}. Type `convert` to extract its text.", describe(image))
        }
        (WorkflowState::Converting, Some(image)) => {
            format!("Converting {}... please wait.", image.name)
        }
        (WorkflowState::ResultReady, Some(image)) => format!(
            "Text extracted from {} ({}). Actions: {}.",
            image.name,
            describe_text(view.text.as_deref().unwrap_or_default()),
            actions(view)
        ),
    };
    lines.push(format!("[{}] {}", state_label(view.state), status));

    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    let text_changed = previous.map(|prev| prev.text != view.text).unwrap_or(true);
    if let (Some(text), true) = (&view.text, text_changed) {
        lines.push(RULE.to_string());
        lines.extend(text.lines().map(ToOwned::to_owned));
        lines.push(RULE.to_string());
    }

    lines
}

/// Full text, framed, regardless of what was printed before.
pub fn render_text(view: &AppViewModel) -> Vec<String> {
    match &view.text {
        Some(text) => {
            let mut lines = vec![RULE.to_string()];
            lines.extend(text.lines().map(ToOwned::to_owned));
            lines.push(RULE.to_string());
            lines
        }
        None => vec!["No text yet. Stage an image and `convert` it first.".to_string()],
    }
}

pub fn state_label(state: WorkflowState) -> &'static str {
    match state {
        WorkflowState::Idle => "idle",
        WorkflowState::ImageStaged => "staged",
        WorkflowState::Converting => "converting",
        WorkflowState::ResultReady => "ready",
    }
}

fn actions(view: &AppViewModel) -> String {
    let mut actions = Vec::new();
    if view.can_copy {
        actions.push("copy");
    }
    if view.can_download {
        actions.push("download [name]");
    }
    actions.push("edit/append");
    if view.can_start_over {
        actions.push("reset");
    }
    actions.join(", ")
}

fn describe(image: &StagedImageView) -> String {
    format!("{} ({}, {})", image.name, image.mime, format_size(image.byte_len))
}

fn describe_text(text: &str) -> String {
    let chars = text.chars().count();
    let lines = text.lines().count();
    format!(
        "{chars} character{}, {lines} line{}",
        if chars == 1 { "" } else { "s" },
        if lines == 1 { "" } else { "s" }
    )
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn staged_view(state: WorkflowState) -> AppViewModel {
        AppViewModel {
            state,
            image: Some(StagedImageView {
                name: "photo.png".to_string(),
                mime: "image/png",
                byte_len: 2048,
            }),
            can_convert: state == WorkflowState::ImageStaged,
            can_start_over: true,
            is_loading: state == WorkflowState::Converting,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn idle_invites_a_drop() {
        assert_eq!(
            render(&AppViewModel::default(), None),
            vec!["[idle] Drop a JPG or PNG image here, or type `open <path>`.".to_string()]
        );
    }

    #[test]
    fn staged_shows_name_type_and_size() {
        assert_eq!(
            render(&staged_view(WorkflowState::ImageStaged), None),
            vec![
                "[staged] Staged photo.png (image/png, 2.0 KiB). Type `convert` to extract its text."
                    .to_string()
            ]
        );
    }

    #[test]
    fn notice_follows_status() {
        let view = AppViewModel {
            notice: Some("Conversion failed (timeout). You can convert again.".to_string()),
            ..staged_view(WorkflowState::ImageStaged)
        };
        let lines = render(&view, None);
        assert_eq!(
            lines[1],
            "! Conversion failed (timeout). You can convert again."
        );
    }

    #[test]
    fn text_is_printed_once_until_it_changes() {
        let ready = AppViewModel {
            text: Some("ABC\n123".to_string()),
            can_copy: true,
            can_download: true,
            ..staged_view(WorkflowState::ResultReady)
        };

        let first = render(&ready, None);
        assert_eq!(
            first,
            vec![
                "[ready] Text extracted from photo.png (7 characters, 2 lines). Actions: copy, download [name], edit/append, reset."
                    .to_string(),
                RULE.to_string(),
                "ABC".to_string(),
                "123".to_string(),
                RULE.to_string(),
            ]
        );

        let again = render(&ready, Some(&ready));
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
