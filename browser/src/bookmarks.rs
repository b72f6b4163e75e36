//! Bookmark persistence
//!
//! Bookmarks live under a single well-known key as a JSON array of
//! [`BookmarkRecord`]s. Each record carries the full job payload as a
//! JSON string so saved jobs can be shown without the network.
//!
//! # Stored format
//!
//! ```json
//! [
//!   { "id": 5, "job_data": "{\"id\":5,\"title\":\"Cook\",...}", "bookmarked_at": 1718000000000 }
//! ]
//! ```

use crate::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Result};
use chrono::Utc;
use common::{Job, JobId};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Key used by the file backend.
pub const FILE_STORAGE_KEY: &str = "@bookmarked_jobs";

/// Key used by the in-memory backend.
pub const MEMORY_STORAGE_KEY: &str = "bookmarked_jobs";

/// One persisted bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkRecord {
    pub id: JobId,
    /// The bookmarked job, serialized as JSON.
    pub job_data: String,
    /// Epoch milliseconds.
    pub bookmarked_at: i64,
}

/// Which key-value backend bookmarks are kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files in the data directory
    #[default]
    File,
    /// Process memory, lost on exit
    Memory,
}

/// Bookmark operations over any [`KeyValueStore`].
#[derive(Debug)]
pub struct BookmarkRepository<K> {
    kv: K,
    key: String,
    /// Serializes read-modify-write cycles on the shared collection.
    write_lock: Mutex<()>,
}

impl<K: KeyValueStore> BookmarkRepository<K> {
    pub fn new(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn setup(&self) -> Result<()> {
        self.kv.setup().await
    }

    async fn read_records(&self) -> Result<Vec<BookmarkRecord>> {
        match self.kv.get_item(&self.key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_records(&self, records: &[BookmarkRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.set_item(&self.key, &raw).await
    }

    /// Insert or overwrite the bookmark for `job.id`, stamping it as the newest.
    pub async fn add_bookmark(&self, job: &Job) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        debug!("Adding bookmark for job: {}", job.id);

        let mut records = self.read_records().await?;
        let record = BookmarkRecord {
            id: job.id,
            job_data: serde_json::to_string(job)?,
            bookmarked_at: next_timestamp(&records),
        };

        match records.iter_mut().find(|r| r.id == job.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        self.write_records(&records).await?;
        info!("Bookmarked job {}", job.id);
        Ok(())
    }

    /// Delete the bookmark for `id`. Unknown ids are not an error.
    pub async fn remove_bookmark(&self, id: JobId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        debug!("Removing bookmark for job: {}", id);

        let mut records = self.read_records().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(());
        }

        self.write_records(&records).await?;
        info!("Removed bookmark for job {}", id);
        Ok(())
    }

    /// All bookmarked jobs, most recently bookmarked first.
    pub async fn list_bookmarks(&self) -> Result<Vec<Job>> {
        let mut records = self.read_records().await?;
        records.sort_by(|a, b| b.bookmarked_at.cmp(&a.bookmarked_at));

        let jobs = records
            .iter()
            .map(|r| serde_json::from_str::<Job>(&r.job_data))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Retrieved bookmarked jobs: {}", jobs.len());
        Ok(jobs)
    }

    pub async fn is_bookmarked(&self, id: JobId) -> Result<bool> {
        Ok(self.read_records().await?.iter().any(|r| r.id == id))
    }
}

/// Current time in millis, bumped past every existing stamp so the newest
/// bookmark always sorts first even within one millisecond.
fn next_timestamp(records: &[BookmarkRecord]) -> i64 {
    let now = Utc::now().timestamp_millis();
    match records.iter().map(|r| r.bookmarked_at).max() {
        Some(latest) if latest >= now => latest.saturating_add(1),
        _ => now,
    }
}

/// The bookmark backend picked once at startup.
#[derive(Debug)]
pub enum BookmarkStore {
    File(BookmarkRepository<FileKeyValueStore>),
    Memory(BookmarkRepository<MemoryKeyValueStore>),
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            BookmarkStore::File($repo) => $call,
            BookmarkStore::Memory($repo) => $call,
        }
    };
}

impl BookmarkStore {
    pub fn open(backend: StorageBackend, data_dir: impl Into<PathBuf>) -> Self {
        match backend {
            StorageBackend::File => Self::file(data_dir),
            StorageBackend::Memory => Self::memory(MemoryKeyValueStore::new()),
        }
    }

    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        BookmarkStore::File(BookmarkRepository::new(
            FileKeyValueStore::new(data_dir),
            FILE_STORAGE_KEY,
        ))
    }

    pub fn memory(kv: MemoryKeyValueStore) -> Self {
        BookmarkStore::Memory(BookmarkRepository::new(kv, MEMORY_STORAGE_KEY))
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            BookmarkStore::File(_) => StorageBackend::File,
            BookmarkStore::Memory(_) => StorageBackend::Memory,
        }
    }

    pub async fn setup(&self) -> Result<()> {
        dispatch!(self, repo => repo.setup().await)
    }

    pub async fn add_bookmark(&self, job: &Job) -> Result<()> {
        dispatch!(self, repo => repo.add_bookmark(job).await)
    }

    pub async fn remove_bookmark(&self, id: JobId) -> Result<()> {
        dispatch!(self, repo => repo.remove_bookmark(id).await)
    }

    pub async fn list_bookmarks(&self) -> Result<Vec<Job>> {
        dispatch!(self, repo => repo.list_bookmarks().await)
    }

    pub async fn is_bookmarked(&self, id: JobId) -> Result<bool> {
        dispatch!(self, repo => repo.is_bookmarked(id).await)
    }
}
