//! File-backed session store.
//!
//! Keeps the tables in memory and rewrites a JSON snapshot after every
//! mutation. The snapshot is written to a temporary file and renamed over the
//! previous one, so a crash mid-write leaves the last good snapshot intact.

use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::memory::Tables;
use crate::core::{BookingError, ClassSession, Enrollment, SeatClaim, SessionStore, WaitlistEntry};
use crate::util::clock::TimestampMs;

/// Session store persisted as a JSON snapshot on local disk.
pub struct FileSessionStore {
    path: PathBuf,
    stream: String,
    tables: Mutex<Tables>,
}

impl FileSessionStore {
    /// Open (or create) the store `stream` under directory `path`.
    pub fn open(path: impl AsRef<Path>, stream: impl Into<String>) -> Result<Self, BookingError> {
        let path = path.as_ref().to_path_buf();
        let stream = stream.into();
        create_dir_all(&path).map_err(BookingError::storage)?;
        let mut store = Self {
            path,
            stream,
            tables: Mutex::new(Tables::default()),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    /// Location of the snapshot file.
    pub fn file_path(&self) -> PathBuf {
        self.path.join(format!("{}.json", self.stream))
    }

    fn load_from_disk(&mut self) -> Result<(), BookingError> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .read(true)
            .open(&file_path)
            .map_err(BookingError::storage)?;
        let tables: Tables =
            serde_json::from_reader(BufReader::new(file)).map_err(BookingError::storage)?;
        *self.tables.get_mut() = tables;
        tracing::debug!(path = %file_path.display(), "loaded booking snapshot");
        Ok(())
    }

    fn rewrite_disk(&self, tables: &Tables) -> Result<(), BookingError> {
        let file_path = self.file_path();
        let tmp_path = self.path.join(format!("{}.json.tmp", self.stream));
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(BookingError::storage)?;
        let bytes = serde_json::to_vec(tables).map_err(BookingError::storage)?;
        file.write_all(&bytes).map_err(BookingError::storage)?;
        file.sync_all().map_err(BookingError::storage)?;
        std::fs::rename(&tmp_path, &file_path).map_err(BookingError::storage)
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        f(&*self.tables.lock())
    }

    /// Apply `f` and persist. On a write failure the in-memory tables are
    /// restored so memory never runs ahead of disk.
    fn mutate<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> Result<R, BookingError> {
        let mut tables = self.tables.lock();
        let before = tables.clone();
        let out = f(&mut *tables);
        if let Err(e) = self.rewrite_disk(&*tables) {
            *tables = before;
            tracing::error!("failed to persist booking snapshot: {}", e);
            return Err(e);
        }
        Ok(out)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn upsert_session(&self, session: ClassSession) -> Result<(), BookingError> {
        self.mutate(|t| t.upsert_session(session))
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ClassSession>, BookingError> {
        Ok(self.read(|t| t.get_session(session_id)))
    }

    async fn list_sessions_in_range(
        &self,
        site_id: &str,
        from_ms: TimestampMs,
        to_ms: TimestampMs,
    ) -> Result<Vec<ClassSession>, BookingError> {
        Ok(self.read(|t| t.sessions_in_range(site_id, from_ms, to_ms)))
    }

    async fn count_enrollments(&self, session_id: &str) -> Result<usize, BookingError> {
        Ok(self.read(|t| t.count_enrollments(session_id)))
    }

    async fn list_enrollments(&self, session_id: &str) -> Result<Vec<Enrollment>, BookingError> {
        Ok(self.read(|t| t.enrollments_of(session_id)))
    }

    async fn find_enrollment(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Enrollment>, BookingError> {
        Ok(self.read(|t| t.find_enrollment(session_id, user_id)))
    }

    async fn insert_enrollment_capped(
        &self,
        enrollment: Enrollment,
        capacity: u32,
    ) -> Result<SeatClaim, BookingError> {
        self.mutate(|t| t.insert_enrollment_capped(enrollment, capacity))
    }

    async fn delete_enrollment(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError> {
        self.mutate(|t| t.delete_enrollment(session_id, user_id))
    }

    async fn upsert_waitlist_entry(&self, entry: WaitlistEntry) -> Result<(), BookingError> {
        self.mutate(|t| t.upsert_waitlist_entry(entry))
    }

    async fn delete_waitlist_entry(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError> {
        self.mutate(|t| t.delete_waitlist_entry(session_id, user_id))
    }

    async fn delete_waitlist_entry_by_id(&self, entry_id: &str) -> Result<bool, BookingError> {
        self.mutate(|t| t.delete_waitlist_entry_by_id(entry_id))
    }

    async fn list_waitlist(&self, session_id: &str) -> Result<Vec<WaitlistEntry>, BookingError> {
        Ok(self.read(|t| t.waitlist_of(session_id)))
    }

    async fn first_unnotified(&self, session_id: &str) -> Result<Option<WaitlistEntry>, BookingError> {
        Ok(self.read(|t| t.first_unnotified(session_id)))
    }

    async fn set_notified(&self, entry_id: &str, at_ms: TimestampMs) -> Result<bool, BookingError> {
        self.mutate(|t| t.set_notified(entry_id, at_ms))
    }

    async fn find_waitlist_entry(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<WaitlistEntry>, BookingError> {
        Ok(self.read(|t| t.find_waitlist_entry(session_id, user_id)))
    }

    async fn list_notified_before(&self, cutoff_ms: TimestampMs) -> Result<Vec<WaitlistEntry>, BookingError> {
        Ok(self.read(|t| t.notified_before(cutoff_ms)))
    }
}
