/// Name used when the requested one sanitizes to nothing.
const FALLBACK_FILENAME: &str = "extracted_text.txt";
const MAX_NAME_CHARS: usize = 120;

/// Turns a user-supplied download name into a portable file name.
///
/// Path separators and characters Windows forbids become `_`, reserved
/// device names get a trailing `_`, and a name without extension gets `.txt`.
pub fn sanitize_export_filename(requested: &str) -> String {
    let replaced: String = requested
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let compacted = collapse_underscores(replaced.trim_matches(&['_', ' ', '.'][..]));
    let truncated: String = compacted.chars().take(MAX_NAME_CHARS).collect();
    let name = truncated.trim_end_matches(&['_', ' ', '.'][..]);
    if name.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, ext),
        _ => (name, "txt"),
    };
    let mut stem = stem.to_string();
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    format!("{stem}.{extension}")
}

fn collapse_underscores(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(stem: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
