//! Where the bearer token lives between requests.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use zeroize::Zeroizing;

/// Storage for the session token.
pub trait SessionStore: Send + Sync {
    /// Current token, if signed in.
    fn token(&self) -> Option<Zeroizing<String>>;

    /// Store a new token.
    ///
    /// # Errors
    /// - Propagates storage failures (file stores)
    fn set_token(&self, token: &str) -> io::Result<()>;

    /// Forget the token.
    ///
    /// # Errors
    /// - Propagates storage failures (file stores)
    fn clear(&self) -> io::Result<()>;
}

/// Token held in memory only; wiped when cleared or dropped.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<Zeroizing<String>>>,
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("signed_in", &self.token().is_some())
            .finish()
    }
}

impl MemorySessionStore {
    /// Signed-out store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(Zeroizing::new(token.to_string()))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<Zeroizing<String>> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Zeroizing::new(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        // Dropping the Zeroizing wrapper wipes the buffer.
        let _ = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Token persisted in a single file (`session.token` in the config dir).
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store backed by `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// What: Open `path` for writing so the token is never readable by other users.
///
/// Details:
/// - New files are created with mode `0600`
/// - An existing file is narrowed to `0600` before anything is written to it
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<Zeroizing<String>> {
        let raw = Zeroizing::new(fs::read_to_string(&self.path).ok()?);
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Zeroizing::new(trimmed.to_string()))
    }

    fn set_token(&self, token: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = open_private(&self.path)?;
        file.write_all(token.trim().as_bytes())?;
        file.sync_all()
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
