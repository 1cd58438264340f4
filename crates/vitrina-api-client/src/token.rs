//! Where the bearer token comes from.
//!
//! The token is read on every request, so logging in or out through a
//! [`FileTokenStore`] takes effect for clients that are already built.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use vitrina_core::AppResult;

pub trait TokenProvider: Send + Sync + std::fmt::Debug {
    /// Current token, or `None` to send requests unauthenticated.
    fn token(&self) -> Option<String>;
}

/// A fixed token (or none), e.g. from `VITRINA_TOKEN`.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Token persisted in a single file, surviving across runs.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())?;
        tracing::debug!(path = %self.path.display(), "Stored auth token");
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl TokenProvider for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "Failed to read auth token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        store.save("  secreto\n").unwrap();
        assert_eq!(store.token().as_deref(), Some("secreto"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(FileTokenStore::new(path).token(), None);
    }
}
