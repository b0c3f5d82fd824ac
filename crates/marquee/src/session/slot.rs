//! Durable key-value slots holding the bearer token.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Result;
use crate::auth::Token;
use crate::error::StorageError;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// The fixed key the session token is stored under.
pub const TOKEN_KEY: &str = "token";

/// A durable slot for the session token.
///
/// Implementations must make a stored token visible to every later
/// `load`, including loads from other processes sharing the slot.
pub trait TokenSlot: Send + Sync {
    /// Read the stored token, if any.
    fn load(&self) -> Result<Option<Token>>;

    /// Replace the stored token.
    fn store(&self, token: &Token) -> Result<()>;

    /// Remove the stored token. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<()>;

    /// Filesystem location backing the slot, for change watching.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Process-local slot, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlot {
    token: Mutex<Option<Token>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenSlot for MemorySlot {
    fn load(&self) -> Result<Option<Token>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, token: &Token) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// On-disk slot contents.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// A slot stored as `<dir>/<key>.json`, readable across restarts and
/// shared by every process pointing at the same directory.
///
/// Writes go through a temporary file and a rename under an exclusive
/// lock, and the file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSlot {
    /// Create a slot for `key` in `dir`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            path: dir.join(format!("{}.json", key)),
            lock_path: dir.join(format!(".{}.lock", key)),
        }
    }

    /// Create the session token slot in `dir`.
    pub fn token_in(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, TOKEN_KEY)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn with_lock<T>(&self, exclusive: bool, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| self.io_error(e))?;

        let locked = if exclusive {
            lock_file.lock_exclusive()
        } else {
            FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|e| self.io_error(e))?;

        let result = f();
        FileExt::unlock(&lock_file).map_err(|e| self.io_error(e))?;
        result
    }
}

impl TokenSlot for FileSlot {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<Token>> {
        if !self.path.exists() {
            return Ok(None);
        }

        self.with_lock(false, || {
            let json = match fs::read_to_string(&self.path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(self.io_error(e).into()),
            };

            let stored: StoredToken =
                serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })?;

            debug!(saved_at = %stored.saved_at, "Loaded session token");
            Ok(Some(Token::new(stored.token)))
        })
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    fn store(&self, token: &Token) -> Result<()> {
        let stored = StoredToken {
            token: token.expose().to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        self.with_lock(true, || {
            let tmp = self.path.with_extension("json.tmp");
            let mut file = fs::File::create(&tmp).map_err(|e| self.io_error(e))?;

            // Set restrictive permissions before the token hits the disk
            #[cfg(unix)]
            {
                let mut perms = file.metadata().map_err(|e| self.io_error(e))?.permissions();
                perms.set_mode(0o600);
                fs::set_permissions(&tmp, perms).map_err(|e| self.io_error(e))?;
            }

            file.write_all(json.as_bytes())
                .map_err(|e| self.io_error(e))?;
            file.sync_data().map_err(|e| self.io_error(e))?;
            fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

            debug!("Stored session token");
            Ok(())
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        self.with_lock(true, || match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared session token");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e).into()),
        })
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
