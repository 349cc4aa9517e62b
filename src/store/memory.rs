//! In-memory identity store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{CreateSuperuser, User};
use crate::store::IdentityStore;

/// Username-keyed store held in process memory.
///
/// Counts successful writes so callers can tell a no-op run from a create.
#[derive(Debug)]
pub struct MemoryIdentityStore {
    users: RwLock<HashMap<String, User>>,
    writes: AtomicUsize,
    hash_cost: u32,
}

impl MemoryIdentityStore {
    pub fn new(hash_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            hash_cost,
        }
    }

    /// Seed an existing account without counting it as a write
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.username.clone(), user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl IdentityStore for MemoryIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_superuser(&self, request: CreateSuperuser) -> Result<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&request.username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                request.username
            )));
        }

        let user = User::new_superuser(request, self.hash_cost)?;
        users.insert(user.username.clone(), user.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(user)
    }
}
