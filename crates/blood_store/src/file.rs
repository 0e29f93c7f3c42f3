//! JSON document blood store.
//!
//! The whole store lives in one JSON document:
//!
//! ```json
//! { "users": [], "bloodRequests": [], "donations": [], "currentUser": null, "revision": 0 }
//! ```
//!
//! Every write goes to a sibling temp file which is then renamed over the
//! document, so a reader sees either the old or the new revision in full.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use entities::{BloodRequest, Donation, User};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{BloodStore, StoreError, StoreResult, StoreSnapshot};

/// Blood store persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonFileBloodStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileBloodStore {
    /// Creates a store backed by the document at `path`.
    ///
    /// The file does not need to exist yet; it is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoreResult<StoreSnapshot> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(StoreSnapshot::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreSnapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &StoreSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp_path = OsString::from(self.path.as_os_str());
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let contents = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(
            path = %self.path.display(),
            revision = document.revision,
            "Wrote store document"
        );
        Ok(())
    }

    /// Read-modify-write of the whole document under the write lock.
    async fn update<F>(&self, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut StoreSnapshot) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        apply(&mut document);
        document.revision += 1;
        self.write_document(&document).await
    }
}

#[async_trait]
impl BloodStore for JsonFileBloodStore {
    async fn load_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read_document().await?.users)
    }

    async fn save_users(&self, users: &[User]) -> StoreResult<()> {
        self.update(|doc| doc.users = users.to_vec()).await
    }

    async fn load_requests(&self) -> StoreResult<Vec<BloodRequest>> {
        Ok(self.read_document().await?.requests)
    }

    async fn save_requests(&self, requests: &[BloodRequest]) -> StoreResult<()> {
        self.update(|doc| doc.requests = requests.to_vec()).await
    }

    async fn load_donations(&self) -> StoreResult<Vec<Donation>> {
        Ok(self.read_document().await?.donations)
    }

    async fn save_donations(&self, donations: &[Donation]) -> StoreResult<()> {
        self.update(|doc| doc.donations = donations.to_vec()).await
    }

    async fn load_current_user(&self) -> StoreResult<Option<User>> {
        Ok(self.read_document().await?.current_user)
    }

    async fn save_current_user(&self, user: Option<&User>) -> StoreResult<()> {
        let user = user.cloned();
        self.update(move |doc| doc.current_user = user).await
    }

    async fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        self.read_document().await
    }

    async fn commit(&self, mut snapshot: StoreSnapshot) -> StoreResult<u64> {
        let _guard = self.write_lock.lock().await;
        let current = self.read_document().await?.revision;
        if current != snapshot.revision {
            return Err(StoreError::Conflict {
                expected: snapshot.revision,
                actual: current,
            });
        }
        snapshot.revision += 1;
        self.write_document(&snapshot).await?;
        Ok(snapshot.revision)
    }
}
