use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

/// Durable storage for the credential token — a single file holding the
/// opaque bearer string, absent when the client is anonymous.
///
/// Ownership rule: only the session manager writes here; the request gateway
/// only reads. Cloning is cheap so both sides can hold the same store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the stored token, if any. An unreadable or empty file counts as
    /// "no token" — the caller ends up anonymous rather than erroring.
    pub fn load(&self) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read token store");
                return None;
            }
        };
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    /// Removes the stored token. Missing files are fine — clearing an
    /// already-anonymous store is a no-op.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
