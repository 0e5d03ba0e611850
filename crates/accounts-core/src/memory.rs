//! In-memory [`UserStore`] used for local runs and tests.
//!
//! Ids start at the configured counter (0 by default) and grow by one per
//! insert. Listing preserves insertion order.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{User, UserWithHash};
use crate::traits::UserStore;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i32,
    users: Vec<UserWithHash>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows. `next_id` is the id the next insert receives.
    pub fn with_users(next_id: i32, users: Vec<UserWithHash>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState { next_id, users })),
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("User ID {id} doesn't exist"))
}

impl UserStore for InMemoryUserStore {
    async fn create(&self, username: &str, email: &str, hash: &str) -> Result<User, AppError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.user.email == email) {
            return Err(AppError::Conflict("Email address already exist".into()));
        }

        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("User id space exhausted".into()))?;

        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
        };
        state.users.push(UserWithHash {
            user: user.clone(),
            hash: hash.to_string(),
        });

        Ok(user)
    }

    async fn select_by_id(&self, id: i32) -> Result<User, AppError> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone())
            .ok_or_else(|| not_found(id))
    }

    async fn select_by_email(&self, email: &str) -> Result<User, AppError> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone())
            .ok_or_else(|| AppError::NotFound(format!("No user with email {email}")))
    }

    async fn select_hash_by_id(&self, id: i32) -> Result<String, AppError> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.hash.clone())
            .ok_or_else(|| not_found(id))
    }

    async fn select_all(&self) -> Result<Vec<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.iter().map(|u| u.user.clone()).collect())
    }

    async fn remove(&self, id: i32) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        match state.users.iter().filter(|u| u.user.id == id).count() {
            0 => Err(not_found(id)),
            1 => {
                state.users.retain(|u| u.user.id != id);
                Ok(())
            }
            n => Err(AppError::Conflict(format!(
                "There was {n} users with id {id}. User not removed."
            ))),
        }
    }

    async fn update_username(&self, id: i32, username: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        match state.users.iter().filter(|u| u.user.id == id).count() {
            0 => Err(not_found(id)),
            1 => {
                for entry in state.users.iter_mut().filter(|u| u.user.id == id) {
                    entry.user.username = username.to_string();
                }
                Ok(())
            }
            n => Err(AppError::Conflict(format!(
                "There was {n} users with id {id}. User not updated."
            ))),
        }
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.users.iter().any(|u| u.user.id == id))
    }
}
