use std::path::PathBuf;

use snaptext_core::Msg;

use super::intake::parse_dropped_paths;

pub const HELP: &str = "\
How it works:
  1. Drop an image onto this window (or `open <path>`). JPG and PNG only.
  2. `convert` and wait for the extraction service.
  3. Edit the text if needed.
  4. `copy` it to the clipboard or `download` it as a text file.

Commands:
  open <path>...      stage an image (only the first path is used)
  convert             send the staged image to the extraction service
  show                print the extracted text
  edit <text>         replace the text (\\n for a new line)
  append <text>       add to the end of the text
  copy                copy the text to the clipboard
  download [name]     save the text (default extracted_text.txt)
  reset               start over
  help                this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Goes straight to the workflow.
    Dispatch(Msg),
    /// Needs file IO before it becomes a message.
    Open(Vec<PathBuf>),
    Show,
    Help,
    Quit,
    Empty,
    Usage(&'static str),
    Unknown(String),
}

pub fn parse(line: &str) -> ShellCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let line = line.trim_start();
    // Text arguments keep their leading spaces: `append  !` appends " !".
    let (word, raw_rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = raw_rest.trim();

    match word.to_ascii_lowercase().as_str() {
        "open" | "o" => {
            let paths = parse_dropped_paths(rest);
            if paths.is_empty() {
                ShellCommand::Usage("usage: open <path>")
            } else {
                ShellCommand::Open(paths)
            }
        }
        "convert" | "c" => ShellCommand::Dispatch(Msg::ConvertClicked),
        "show" | "s" => ShellCommand::Show,
        "edit" => ShellCommand::Dispatch(Msg::TextEdited(unescape(raw_rest))),
        "append" | "a" => ShellCommand::Dispatch(Msg::TextAppended(unescape(raw_rest))),
        "copy" => ShellCommand::Dispatch(Msg::CopyClicked),
        "download" | "save" => ShellCommand::Dispatch(Msg::DownloadClicked {
            filename: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "reset" | "start-over" | "restart" => ShellCommand::Dispatch(Msg::StartOverClicked),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ if looks_like_drop(trimmed) => ShellCommand::Open(parse_dropped_paths(trimmed)),
        _ => ShellCommand::Unknown(word.to_string()),
    }
}

/// Terminals paste dropped files as (possibly quoted) paths or file URIs.
fn looks_like_drop(line: &str) -> bool {
    line.starts_with(['\'', '"', '/', '~', '.'])
        || line.starts_with("file://")
        || line.contains(['/', '\\'])
        || line.rsplit_once('.').is_some_and(|(stem, ext)| {
            !stem.is_empty() && !ext.is_empty() && !ext.contains(char::is_whitespace)
        })
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
