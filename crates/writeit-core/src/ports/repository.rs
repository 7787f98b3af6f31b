use async_trait::async_trait;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Persistence service for a single resource kind.
///
/// Each write runs in its own transaction: committed on success, rolled
/// back on any failure. Writes do not check pre-conditions; they rely on
/// the store's row matching.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Insert an entity, stamping `created_at`. Returns it with its new id.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Fetch exactly one entity. Ids `<= 0` fail before touching the store.
    async fn find_by_id(&self, id: i64) -> Result<T, RepoError>;

    /// All entities, newest id first. An empty store is not an error.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Write mutable fields, stamping `updated_at`. Returns the written entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Hard delete by id.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Post persistence. `update` is owner-scoped: it only matches a row whose
/// `id` and `creator_id` both equal the given post's.
pub trait PostRepository: Repository<Post> {}

impl<R> PostRepository for R where R: Repository<Post> {}

/// User persistence with login lookup.
#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}
