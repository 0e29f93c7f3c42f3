//! In-memory blood store implementation for testing.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{BloodRequest, Donation, User};
use tokio::sync::RwLock;

use crate::{BloodStore, StoreError, StoreResult, StoreSnapshot};

/// In-memory blood store for testing purposes.
///
/// All collections sit behind one lock so a commit swaps them in a single step.
#[derive(Debug, Default, Clone)]
pub struct MemoryBloodStore {
    state: Arc<RwLock<StoreSnapshot>>,
}

impl MemoryBloodStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given collections.
    pub fn with_data(
        users: Vec<User>,
        requests: Vec<BloodRequest>,
        donations: Vec<Donation>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreSnapshot {
                users,
                requests,
                donations,
                current_user: None,
                revision: 0,
            })),
        }
    }
}

#[async_trait]
impl BloodStore for MemoryBloodStore {
    async fn load_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn save_users(&self, users: &[User]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.users = users.to_vec();
        state.revision += 1;
        Ok(())
    }

    async fn load_requests(&self) -> StoreResult<Vec<BloodRequest>> {
        Ok(self.state.read().await.requests.clone())
    }

    async fn save_requests(&self, requests: &[BloodRequest]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.requests = requests.to_vec();
        state.revision += 1;
        Ok(())
    }

    async fn load_donations(&self) -> StoreResult<Vec<Donation>> {
        Ok(self.state.read().await.donations.clone())
    }

    async fn save_donations(&self, donations: &[Donation]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.donations = donations.to_vec();
        state.revision += 1;
        Ok(())
    }

    async fn load_current_user(&self) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.current_user.clone())
    }

    async fn save_current_user(&self, user: Option<&User>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.current_user = user.cloned();
        state.revision += 1;
        Ok(())
    }

    async fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        Ok(self.state.read().await.clone())
    }

    async fn commit(&self, mut snapshot: StoreSnapshot) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        if state.revision != snapshot.revision {
            return Err(StoreError::Conflict {
                expected: snapshot.revision,
                actual: state.revision,
            });
        }
        snapshot.revision += 1;
        *state = snapshot;
        Ok(state.revision)
    }
}
