// ABOUTME: Durable client-side storage for the bearer token and cached identity
// ABOUTME: File-backed storage under the platform data directory plus an in-memory variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult};
use crate::models::Identity;

/// What survives a restart of the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token
    pub token: String,
    /// Last identity the server confirmed
    #[serde(default)]
    pub identity: Option<Identity>,
}

/// Durable session storage
pub trait TokenStorage: Send + Sync + Debug {
    /// Read the stored session, `None` when nothing is stored
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn load(&self) -> AppResult<Option<StoredSession>>;

    /// Replace the stored session
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn save(&self, session: &StoredSession) -> AppResult<()>;

    /// Remove the stored session; clearing an empty store succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn clear(&self) -> AppResult<()>;
}

/// JSON file storage
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `$FITTRACK_SESSION_PATH`, or `session.json` under the
    /// platform data directory
    ///
    /// # Errors
    ///
    /// Returns a config error if no data directory can be determined
    pub fn default_location() -> AppResult<Self> {
        if let Ok(path) = std::env::var(env_vars::SESSION_PATH) {
            return Ok(Self::new(path));
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| AppError::config("Cannot determine a data directory for the session file"))?;

        Ok(Self::new(
            base.join(defaults::CLIENT_DATA_DIR)
                .join(defaults::SESSION_FILE),
        ))
    }

    /// Location of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::internal(format!(
                    "Failed to read session file {}: {e}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let mut file = open_private(&self.path).map_err(|e| {
            AppError::internal(format!(
                "Failed to open session file {}: {e}",
                self.path.display()
            ))
        })?;
        file.write_all(&json)
            .map_err(|e| AppError::internal(format!("Failed to write session file: {e}")))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!(
                "Failed to remove session file {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Process-local storage, for tests and ephemeral clients
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    session: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStorage {
    /// Storage pre-populated with `session`
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Option<StoredSession>>> {
        self.session
            .lock()
            .map_err(|_| AppError::internal("Session storage lock poisoned"))
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}
