use std::fs;
use std::path::Path;

use super::SettingsError;
use super::skeleton::SETTINGS_SKELETON_CONTENT;
use crate::util::config::{normalize_key, skip_comment_or_empty};

/// What: Persist `key = value` into a settings file, preserving comments and other keys.
///
/// Inputs:
/// - `path`: Settings file
/// - `key`: Canonical key (already normalized)
/// - `value`: Value to write
///
/// Output:
/// - `Ok(())` once the file has been rewritten
///
/// # Errors
/// - `SettingsError::Io` when the directory cannot be created or the file cannot be read/written
///
/// Details:
/// - Missing or empty files start from the skeleton
/// - Every uncommented line whose normalized key matches is replaced; when none
///   matches the entry is appended
/// - A commented-out hint (`# dark_mode = false`) is left alone
pub fn save_key(path: &Path, key: &str, value: &str) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| SettingsError::io(path, e))?;
    }
    let file_empty = fs::metadata(path).map_or(true, |m| m.len() == 0);
    let mut lines: Vec<String> = if file_empty {
        SETTINGS_SKELETON_CONTENT.lines().map(str::to_string).collect()
    } else {
        fs::read_to_string(path)
            .map_err(|e| SettingsError::io(path, e))?
            .lines()
            .map(str::to_string)
            .collect()
    };
    let entry = format!("{key} = {value}");
    let mut replaced = false;
    for line in &mut lines {
        if skip_comment_or_empty(line) {
            continue;
        }
        if let Some((raw_key, _)) = line.split_once('=')
            && normalize_key(raw_key) == key
        {
            line.clone_from(&entry);
            replaced = true;
        }
    }
    if !replaced {
        lines.push(entry);
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).map_err(|e| SettingsError::io(path, e))
}
