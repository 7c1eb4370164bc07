//! Line-oriented `key = value` parsing shared by the settings reader and writer.

/// What: Check if a line should be skipped (empty or comment).
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing `key = value`
///
/// Output:
/// - `Some((normalized_key, value))`, `None` for lines without `=`
///
/// Details:
/// - Splits on the first `=`
/// - Keys are lowercased and `.`, `-`, and spaces become `_`, so
///   `API-Base-URL` and `api_base_url` address the same setting
/// - Trailing inline comments are removed from the value
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (raw_key, raw_val) = line.trim().split_once('=')?;
    let key = normalize_key(raw_key);
    if key.is_empty() {
        return None;
    }
    Some((key, strip_inline_comment(raw_val).to_string()))
}

/// Canonical form of a settings key.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['.', '-', ' '], "_")
}

/// What: Remove a trailing `# comment` from a value.
///
/// Details:
/// - `#` only starts a comment when preceded by whitespace, so URL fragments
///   (`https://host/#x`) and colour values survive
#[must_use]
pub fn strip_inline_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return s[..i].trim();
        }
    }
    s.trim()
}

/// Parse the usual truthy/falsy spellings; `None` for anything else.
#[must_use]
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert!(skip_comment_or_empty(""));
        assert!(skip_comment_or_empty("   # note"));
        assert!(skip_comment_or_empty("// note"));
        assert!(skip_comment_or_empty("; note"));
        assert!(!skip_comment_or_empty("locale = ar"));
    }

    #[test]
    fn key_value_normalizes_and_strips_comments() {
        assert_eq!(
            parse_key_value("API-Base URL = https://api.example.com/#v1  # prod"),
            Some((
                "api_base_url".to_string(),
                "https://api.example.com/#v1".to_string()
            ))
        );
        assert_eq!(parse_key_value("no equals sign"), None);
        assert_eq!(parse_key_value(" = value"), None);
    }

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
