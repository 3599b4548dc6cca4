//! Best-effort recovery of a JSON object from untrusted model output.

use serde_json::Value;

/// Try to recover exactly one JSON object from `raw`.
///
/// Order of attempts:
/// 1. Strip one layer of code fences and parse directly when the cleaned
///    text is brace-delimited.
/// 2. Scan the original text for the first `{` and its balanced closing
///    brace (string-literal and escape aware) and parse that span.
///
/// Returns `None` when neither attempt yields JSON.
pub(crate) fn recover_json_object(raw: &str) -> Option<Value> {
    let cleaned = strip_code_fences(raw.trim());
    if cleaned.starts_with('{') && cleaned.ends_with('}') {
        if let Ok(value) = serde_json::from_str(cleaned) {
            return Some(value);
        }
    }
    let span = balanced_object_span(raw)?;
    serde_json::from_str(span).ok()
}

/// Strip a single leading code-fence marker (with or without a language
/// tag) and a single trailing marker. Textual best-effort, not a markdown
/// parser.
fn strip_code_fences(text: &str) -> &str {
    let mut stripped = text;
    if let Some(rest) = stripped.strip_prefix("```") {
        // The fence line may carry a language tag ("```json"); drop the
        // whole first line.
        stripped = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
    }
    if let Some(rest) = stripped.trim_end().strip_suffix("```") {
        stripped = rest;
    }
    stripped.trim()
}

/// Locate the span of the first balanced JSON object in `text`.
///
/// Tracks string literals and backslash escapes so braces inside strings
/// do not affect the depth count, and stops at the matching brace rather
/// than the last `}` in the text.
fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
