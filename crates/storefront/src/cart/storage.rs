//! Persistence of the active cart id between sessions.
//!
//! Only the id is stored; the cart itself always comes from the backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use medusa_storefront_core::CartId;
use thiserror::Error;

/// Errors reading or writing the stored cart id.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not a usable cart id.
    #[error("Invalid stored cart id: {0}")]
    Invalid(String),
}

/// Where the active cart id lives between sessions.
pub trait CartIdStorage: Send + Sync {
    /// Read the stored id; `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be read or is malformed.
    fn load(&self) -> Result<Option<CartId>, StorageError>;

    /// Store `id`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save(&self, id: &CartId) -> Result<(), StorageError>;

    /// Forget the stored id. Clearing empty storage succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FileCartIdStorage
// =============================================================================

/// Stores the id as the only line of a text file.
#[derive(Debug, Clone)]
pub struct FileCartIdStorage {
    path: PathBuf,
}

impl FileCartIdStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartIdStorage for FileCartIdStorage {
    fn load(&self) -> Result<Option<CartId>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let id = contents.trim();
        if id.is_empty() {
            return Ok(None);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(StorageError::Invalid(id.to_string()));
        }

        Ok(Some(CartId::new(id)))
    }

    fn save(&self, id: &CartId) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{id}\n"))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemoryCartIdStorage
// =============================================================================

/// Keeps the id in memory; used by tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryCartIdStorage {
    id: Mutex<Option<CartId>>,
}

impl MemoryCartIdStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `id`.
    #[must_use]
    pub fn with_id(id: CartId) -> Self {
        Self {
            id: Mutex::new(Some(id)),
        }
    }

    /// Currently stored id.
    #[must_use]
    pub fn current(&self) -> Option<CartId> {
        self.id.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl CartIdStorage for MemoryCartIdStorage {
    fn load(&self) -> Result<Option<CartId>, StorageError> {
        Ok(self.current())
    }

    fn save(&self, id: &CartId) -> Result<(), StorageError> {
        *self.id.lock().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.id.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
