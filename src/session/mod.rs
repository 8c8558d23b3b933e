//! Remembered sign-in: the mock token and the public user record, kept as a
//! small TOML file so a restart stays signed in.

use crate::api::models::{AuthSession, PublicUser};
use crate::config::SessionConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

impl From<AuthSession> for Session {
    fn from(auth: AuthSession) -> Self {
        Self {
            token: auth.token,
            user: auth.user,
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        if !config.remember {
            return Self { path: None };
        }
        match config.path.clone().or_else(|| {
            dirs::data_dir().map(|d| d.join("eventdeck").join("session.toml"))
        }) {
            Some(path) => Self::at(path),
            None => Self { path: None },
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A missing file means nobody is signed in. A file that no longer parses
    /// is treated the same way and logged.
    pub fn load(&self) -> Result<Option<Session>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;
        match toml::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let contents = toml::to_string(session).context("Failed to serialize session")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "mock-jwt-token-abc".into(),
            user: PublicUser {
                id: "2".into(),
                name: "Jane Smith".into(),
                email: "jane@example.com".into(),
                avatar_url: "https://i.pravatar.cc/150?img=5".into(),
            },
        }
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("nested").join("session.toml"));

        assert!(store.load().unwrap().is_none());
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "token = ").unwrap();
        let store = SessionStore::at(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_disabled_store_is_noop() {
        let cfg = SessionConfig {
            remember: false,
            path: None,
        };
        let store = SessionStore::new(&cfg);
        assert!(store.path().is_none());
        store.save(&session()).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
