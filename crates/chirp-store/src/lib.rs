pub mod models;
pub mod ops;

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;
use tracing::info;

use crate::models::Document;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a user with that email already exists")]
    AlreadyExists,
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Single-file JSON record store. Owns the backing file and the lock that
/// serializes access to it; share across request workers behind an `Arc`.
///
/// Every operation re-reads the file, so a read always reflects the on-disk
/// state at the moment its lock was acquired. There is no cache.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Open the store at `path`, creating an empty document if the file does
    /// not exist. Fails if the path is unreadable or holds data that does
    /// not parse.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: RwLock::new(()),
        };
        store.ensure()?;
        info!("store opened at {}", store.path.display());
        Ok(store)
    }

    fn ensure(&self) -> Result<(), StoreError> {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;
        match fs::read(&self.path) {
            // Validate existing data up front rather than on first use.
            Ok(bytes) => {
                serde_json::from_slice::<Document>(&bytes)?;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("creating store file at {}", self.path.display());
                self.persist(&Document::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn load(&self) -> Result<Document, StoreError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rewrite the backing file in full. No append log, no partial patch.
    fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(doc)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// Run a read-only operation against the document under the shared lock.
    pub(crate) fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Document) -> Result<T, StoreError>,
    {
        let _guard = self.lock.read().map_err(|_| StoreError::LockPoisoned)?;
        let doc = self.load()?;
        f(&doc)
    }

    /// Run a mutation under the exclusive lock. The lock spans the whole
    /// load-mutate-persist cycle so two writers can never interleave and
    /// clobber each other's update.
    pub(crate) fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Document) -> Result<T, StoreError>,
    {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.persist(&doc)?;
        Ok(out)
    }
}
