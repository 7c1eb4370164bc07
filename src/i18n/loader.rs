//! Message catalog loading: embedded YAML with optional on-disk overrides.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::locale::Locale;
use super::translations::TranslationMap;

/// Arabic catalog compiled into the binary.
const EMBEDDED_AR: &str = include_str!("../../config/locales/ar.yml");
/// English catalog compiled into the binary.
const EMBEDDED_EN: &str = include_str!("../../config/locales/en.yml");

/// What: Load the catalog for `locale`, merging an optional override file over the embedded one.
///
/// Inputs:
/// - `locale`: Catalog to load
/// - `override_dir`: Directory that may contain `{code}.yml`
///
/// Output:
/// - Flattened translation map (never fails; broken overrides are logged and skipped)
///
/// Details:
/// - Embedded keys are always present so a partial override cannot drop messages
/// - Override keys replace embedded keys one by one
#[must_use]
pub fn load_catalog(locale: Locale, override_dir: Option<&Path>) -> TranslationMap {
    let embedded = match locale {
        Locale::Ar => EMBEDDED_AR,
        Locale::En => EMBEDDED_EN,
    };
    let mut map = parse_locale_yaml(embedded).unwrap_or_else(|e| {
        tracing::error!(locale = %locale, error = %e, "embedded catalog is invalid");
        HashMap::new()
    });
    if let Some(dir) = override_dir {
        match load_locale_file(locale, dir) {
            Ok(overrides) => {
                tracing::debug!(locale = %locale, keys = overrides.len(), "applied catalog overrides");
                map.extend(overrides);
            }
            Err(e) => tracing::debug!(locale = %locale, error = %e, "no catalog override applied"),
        }
    }
    map
}

/// What: Load a locale YAML file and parse it into a `TranslationMap`.
///
/// Inputs:
/// - `locale`: Locale whose file to read
/// - `locales_dir`: Path to locales directory
///
/// Output:
/// - Parsed translations
///
/// # Errors
/// - Returns `Err` when the file does not exist, cannot be read, is empty, or is not valid YAML
pub fn load_locale_file(locale: Locale, locales_dir: &Path) -> Result<TranslationMap, String> {
    let file_path = locales_dir.join(format!("{}.yml", locale.code()));
    if !file_path.is_file() {
        return Err(format!("locale file not found: {}", file_path.display()));
    }
    let contents = fs::read_to_string(&file_path)
        .map_err(|e| format!("failed to read locale file {}: {e}", file_path.display()))?;
    if contents.trim().is_empty() {
        return Err(format!("locale file is empty: {}", file_path.display()));
    }
    parse_locale_yaml(&contents)
        .map_err(|e| format!("failed to parse locale file {}: {e}", file_path.display()))
}

/// What: Parse catalog YAML into dot-notation keys.
///
/// Details:
/// - The document has a single top-level key naming the locale (`ar:`), which is skipped
fn parse_locale_yaml(yaml_content: &str) -> Result<TranslationMap, String> {
    let doc: serde_norway::Value =
        serde_norway::from_str(yaml_content).map_err(|e| format!("invalid YAML: {e}"))?;
    let mut translations = HashMap::new();
    if let Some(root) = doc.as_mapping() {
        for (_locale_key, locale_value) in root {
            flatten_yaml_value(locale_value, "", &mut translations);
        }
    }
    Ok(translations)
}

/// Recursively flatten nested mappings into `a.b.c` keys; scalars are stringified.
fn flatten_yaml_value(value: &serde_norway::Value, prefix: &str, out: &mut TranslationMap) {
    match value {
        serde_norway::Value::Mapping(map) => {
            for (key, val) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml_value(val, &next, out);
            }
        }
        serde_norway::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_norway::Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        serde_norway::Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn embedded_catalogs_share_error_keys() {
        let ar = load_catalog(Locale::Ar, None);
        let en = load_catalog(Locale::En, None);
        for key in ["errors.connection", "errors.generic", "errors.session_expired"] {
            assert!(ar.contains_key(key), "ar catalog missing {key}");
            assert!(en.contains_key(key), "en catalog missing {key}");
        }
    }

    #[test]
    fn flatten_nested_keys() {
        let map = parse_locale_yaml("en:\n  a:\n    b: \"x\"\n    n: 3\n").expect("parse");
        assert_eq!(map.get("a.b").map(String::as_str), Some("x"));
        assert_eq!(map.get("a.n").map(String::as_str), Some("3"));
    }

    #[test]
    /// What: An override file replaces individual keys and keeps the rest.
    fn override_file_merges_over_embedded() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("en.yml"),
            "en:\n  errors:\n    connection: \"Offline, try again\"\n",
        )
        .expect("write override");
        let map = load_catalog(Locale::En, Some(dir.path()));
        assert_eq!(
            map.get("errors.connection").map(String::as_str),
            Some("Offline, try again")
        );
        assert!(map.contains_key("errors.generic"));
    }

    #[test]
    fn missing_or_empty_override_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        assert!(load_locale_file(Locale::Ar, dir.path()).is_err());
        fs::write(dir.path().join("ar.yml"), "   \n").expect("write empty");
        assert!(load_locale_file(Locale::Ar, dir.path()).is_err());
    }
}
