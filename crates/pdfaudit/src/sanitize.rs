//! Helpers for keeping file paths out of span attributes and for turning
//! labels into safe folder names.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals the file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

fn illegal_path_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\n\r]"#).expect("static regex is valid"))
}

/// Turns a label into a single path component: trims, replaces spaces with
/// underscores, and replaces characters that are illegal in file names on
/// common platforms with underscores.
pub fn sanitize_component(label: &str) -> String {
    let underscored = label.trim().replace(' ', "_");
    illegal_path_chars()
        .replace_all(&underscored, "_")
        .into_owned()
}

/// Renders a path relative to `root` with `/` separators. Falls back to the
/// file name when `path` is not under `root`.
pub fn relative_id(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        _ => redact_path(path),
    }
}
