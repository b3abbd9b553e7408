//! Durable ledger storage backends.

use super::{
    errors::{PersistenceError, PersistenceResult},
    models::LedgerSnapshot,
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// Storage medium behind a [`WalletManager`](super::WalletManager).
///
/// `save` receives the complete ledger on every mutation and must either
/// commit all of it or fail without leaving a partial file behind.
#[async_trait]
pub trait WalletStorage: Send + Sync {
    /// Load the full ledger, creating an empty one if none exists yet
    async fn load(&self) -> PersistenceResult<LedgerSnapshot>;

    /// Replace the stored ledger with `snapshot`
    async fn save(&self, snapshot: &LedgerSnapshot) -> PersistenceResult<()>;
}

/// JSON file storage
///
/// Writes go to a `.tmp` sibling that is synced and renamed over the ledger,
/// so a crash mid-write leaves the previous ledger intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl WalletStorage for JsonFileStorage {
    async fn load(&self) -> PersistenceResult<LedgerSnapshot> {
        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        if !exists {
            log::info!("Creating empty ledger at {}", self.path.display());
            let empty = LedgerSnapshot::new();
            self.save(&empty).await?;
            return Ok(empty);
        }

        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, snapshot: &LedgerSnapshot) -> PersistenceResult<()> {
        let encoded = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();

        let mut file = fs::File::create(&temp)
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        file.write_all(&encoded)
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        file.sync_all()
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))
    }
}

/// In-memory storage for tests and throwaway ledgers
///
/// Supports injecting write failures to exercise the persistence error path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<LedgerSnapshot>,
    failing_writes: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            data: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    /// Make the next `count` writes fail
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the last committed ledger
    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.data.lock().await.clone()
    }
}

#[async_trait]
impl WalletStorage for MemoryStorage {
    async fn load(&self) -> PersistenceResult<LedgerSnapshot> {
        Ok(self.data.lock().await.clone())
    }

    async fn save(&self, snapshot: &LedgerSnapshot) -> PersistenceResult<()> {
        let injected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(PersistenceError::Unavailable(
                "injected write failure".to_string(),
            ));
        }

        *self.data.lock().await = snapshot.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
