//! Identity store abstraction and its implementations

use std::future::Future;

use crate::error::Result;
use crate::models::{CreateSuperuser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Account lookup and superuser creation.
///
/// Implementations own uniqueness: `create_superuser` must fail with
/// [`AppError::Conflict`](crate::error::AppError::Conflict) when the username
/// is already taken.
pub trait IdentityStore {
    /// Find an account by username, active or not
    fn find_by_username(&self, username: &str)
        -> impl Future<Output = Result<Option<User>>> + Send;

    /// Create an account with administrative privileges
    fn create_superuser(&self, request: CreateSuperuser)
        -> impl Future<Output = Result<User>> + Send;
}
