use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ApiError;

pub const LOADING_HTML: &str = r#"<div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading...</span></div>"#;

pub const GENERIC_ERROR: &str = "Unexpected error occurred";

pub const HIGHLIGHT_OPEN: &str = r#"<span class="text-primary">"#;

pub const HIGHLIGHT_CLOSE: &str = "</span>";

// a `"key": "string value"` pair as printed by the pretty printer, escaped
// quotes included
fn pair_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"("(?:[^"\\\n]|\\.)*":[ \t]*"(?:[^"\\\n]|\\.)*")"#).expect("static pattern")
    })
}

pub(crate) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Pretty prints `value` with two-space indentation and wraps every
/// key/string-value pair in the highlight marker.
pub fn render_results(value: &Value) -> String {
    let formatted = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    let escaped = escape_html(&formatted);
    let highlighted = pair_pattern().replace_all(
        &escaped,
        format!("{HIGHLIGHT_OPEN}${{1}}{HIGHLIGHT_CLOSE}").as_str(),
    );
    format!("<pre>{highlighted}</pre>")
}

/// Text shown for a failure: `<status> - <message>` when both are known.
pub fn error_text(error: &ApiError) -> String {
    match (error.status(), error.message()) {
        (Some(status), Some(message)) => format!("{status} - {message}"),
        _ => GENERIC_ERROR.to_string(),
    }
}

pub fn render_error(error: &ApiError) -> String {
    format!(
        r#"<div class="alert alert-danger">{}</div>"#,
        escape_html(&error_text(error))
    )
}

pub fn render_loading() -> String {
    LOADING_HTML.to_string()
}
