use std::future::Future;

use crate::error::AppError;
use crate::models::User;

/// Persists and retrieves user accounts.
///
/// Implementations must enforce email uniqueness (surfacing violations as
/// [`AppError::Conflict`]) and must never let a single `remove` or
/// `update_username` touch more than one row: if that happens the change is
/// rolled back and a `Conflict` is returned.
pub trait UserStore: Send + Sync + Clone {
    /// Insert a user and return it with its storage-assigned id.
    fn create(
        &self,
        username: &str,
        email: &str,
        hash: &str,
    ) -> impl Future<Output = Result<User, AppError>> + Send;

    /// Fetch one user. A missing id yields [`AppError::NotFound`].
    fn select_by_id(&self, id: i32) -> impl Future<Output = Result<User, AppError>> + Send;

    /// Fetch the user owning `email`, or [`AppError::NotFound`].
    fn select_by_email(&self, email: &str) -> impl Future<Output = Result<User, AppError>> + Send;

    /// Stored bcrypt hash for the user. Never leaves the service layer.
    fn select_hash_by_id(&self, id: i32) -> impl Future<Output = Result<String, AppError>> + Send;

    /// All users in insertion order. No pagination.
    // TODO: add limit/offset pagination to select_all and GET /users
    fn select_all(&self) -> impl Future<Output = Result<Vec<User>, AppError>> + Send;

    /// Delete by id. Zero matching rows yields [`AppError::NotFound`].
    fn remove(&self, id: i32) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Replace the username. Zero matching rows yields [`AppError::NotFound`].
    fn update_username(
        &self,
        id: i32,
        username: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Whether a user with this id is stored.
    fn exists(&self, id: i32) -> impl Future<Output = Result<bool, AppError>> + Send;
}
