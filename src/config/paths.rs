use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that pins the configuration directory (tests, portable installs).
pub const CONFIG_DIR_ENV: &str = "LISAN_CONFIG_DIR";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// What: Configuration directory for Lisan, created if missing.
///
/// Output:
/// - `$LISAN_CONFIG_DIR` when set, else `$XDG_CONFIG_HOME/lisan`, else `$HOME/.config/lisan`
///
/// Details:
/// - Creation failures are logged; the path is returned regardless so callers
///   surface the real I/O error when they try to write
#[must_use]
pub fn config_dir() -> PathBuf {
    let dir = match env::var(CONFIG_DIR_ENV) {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join("lisan"),
    };
    ensure_dir(&dir);
    dir
}

/// Logs directory under config: `<config>/logs` (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    ensure_dir(&dir);
    dir
}

/// Settings file path inside `dir`.
#[must_use]
pub fn settings_path_in(dir: &Path) -> PathBuf {
    dir.join("settings.conf")
}

/// Session token file path inside `dir`.
#[must_use]
pub fn session_path_in(dir: &Path) -> PathBuf {
    dir.join("session.token")
}

fn ensure_dir(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::warn!(path = %dir.display(), error = %e, "failed to create directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_stable() {
        let base = Path::new("/tmp/lisan-cfg");
        assert!(settings_path_in(base).ends_with("settings.conf"));
        assert!(session_path_in(base).ends_with("session.token"));
    }

    #[test]
    fn xdg_base_prefers_variable() {
        // PATH is always set and non-empty in a test process.
        let p = xdg_base_dir("PATH", &[".config"]);
        assert!(!p.as_os_str().is_empty());
    }
}
