//! Blood store trait definitions.

use async_trait::async_trait;
use entities::{BloodRequest, Donation, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreResult;

/// Every collection in the store, read at one revision.
///
/// Transactional operations load a snapshot, mutate it in memory and hand it
/// back to [`BloodStore::commit`], which writes all collections together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Registered users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Blood requests, in creation order.
    #[serde(default, rename = "bloodRequests")]
    pub requests: Vec<BloodRequest>,
    /// Donations, in creation order.
    #[serde(default)]
    pub donations: Vec<Donation>,
    /// The logged-in user, if any.
    #[serde(default)]
    pub current_user: Option<User>,
    /// Incremented by every write.
    #[serde(default)]
    pub revision: u64,
}

impl StoreSnapshot {
    /// Finds a user by ID.
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Finds a user by ID for modification.
    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Finds a user by email, ignoring case.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim().to_lowercase();
        self.users.iter().find(|u| u.email.to_lowercase() == email)
    }

    /// Finds a blood request by ID.
    pub fn request(&self, id: Uuid) -> Option<&BloodRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Finds a blood request by ID for modification.
    pub fn request_mut(&mut self, id: Uuid) -> Option<&mut BloodRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }
}

/// Trait for blood bank storage operations.
///
/// The per-collection `load_*`/`save_*` pairs mirror the key-value layout of
/// the store. Anything that must change more than one collection goes through
/// [`snapshot`](BloodStore::snapshot) and [`commit`](BloodStore::commit).
#[async_trait]
pub trait BloodStore: Send + Sync {
    // =========================================================================
    // Collections
    // =========================================================================

    /// Loads all users.
    async fn load_users(&self) -> StoreResult<Vec<User>>;

    /// Replaces all users.
    async fn save_users(&self, users: &[User]) -> StoreResult<()>;

    /// Loads all blood requests.
    async fn load_requests(&self) -> StoreResult<Vec<BloodRequest>>;

    /// Replaces all blood requests.
    async fn save_requests(&self, requests: &[BloodRequest]) -> StoreResult<()>;

    /// Loads all donations.
    async fn load_donations(&self) -> StoreResult<Vec<Donation>>;

    /// Replaces all donations.
    async fn save_donations(&self, donations: &[Donation]) -> StoreResult<()>;

    // =========================================================================
    // Session
    // =========================================================================

    /// Loads the logged-in user.
    async fn load_current_user(&self) -> StoreResult<Option<User>>;

    /// Sets or clears the logged-in user.
    async fn save_current_user(&self, user: Option<&User>) -> StoreResult<()>;

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Reads every collection at a single revision.
    async fn snapshot(&self) -> StoreResult<StoreSnapshot>;

    /// Writes every collection of `snapshot` at once.
    ///
    /// Fails with [`StoreError::Conflict`](crate::StoreError::Conflict) and
    /// writes nothing if the store moved past `snapshot.revision`. Returns the
    /// new revision.
    async fn commit(&self, snapshot: StoreSnapshot) -> StoreResult<u64>;
}
