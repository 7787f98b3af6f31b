//! In-memory persistence services - used when no database is configured.
//!
//! They honour the same contract as the PostgreSQL services: ids ascend
//! from 1, lists are newest first, post updates are owner-scoped, and a
//! write that matches nothing is an error. Each map sits behind one async
//! lock, so every operation is atomic. Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use writeit_core::domain::{Post, User};
use writeit_core::error::RepoError;
use writeit_core::now_timestamp;
use writeit_core::ports::{Repository, UserRepository};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, assign: impl FnOnce(&mut T, i64), mut row: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        assign(&mut row, id);
        self.rows.insert(id, row.clone());
        row
    }

    fn newest_first(&self) -> Vec<T> {
        self.rows.values().rev().cloned().collect()
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Post> for InMemoryPostRepository {
    async fn create(&self, mut post: Post) -> Result<Post, RepoError> {
        if post.is_blank() {
            return Err(RepoError::EmptyInput("Post"));
        }
        post.created_at = now_timestamp();

        let mut table = self.table.write().await;
        Ok(table.insert(|p, id| p.id = id, post))
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound { entity: "Post", id })
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.table.read().await.newest_first())
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        post.updated_at = Some(now_timestamp());

        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get_mut(&post.id)
            .filter(|stored| stored.creator_id == post.creator_id)
            .ok_or_else(|| {
                RepoError::UpdateFailed(format!(
                    "no post with id {} owned by user {}",
                    post.id, post.creator_id
                ))
            })?;

        stored.title = post.title.clone();
        stored.body = post.body.clone();
        stored.updated_at = post.updated_at;
        post.created_at = stored.created_at;

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound { entity: "Post", id })
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<User> for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> Result<User, RepoError> {
        if user.is_blank() {
            return Err(RepoError::EmptyInput("User"));
        }
        user.created_at = now_timestamp();

        let mut table = self.table.write().await;
        if table
            .rows
            .values()
            .any(|u| u.email_address == user.email_address)
        {
            return Err(RepoError::Duplicate(format!(
                "email address {} already registered",
                user.email_address
            )));
        }

        Ok(table.insert(|u, id| u.id = id, user))
    }

    async fn find_by_id(&self, id: i64) -> Result<User, RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound { entity: "User", id })
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.table.read().await.newest_first())
    }

    async fn update(&self, mut user: User) -> Result<User, RepoError> {
        user.updated_at = Some(now_timestamp());

        let mut table = self.table.write().await;
        if table
            .rows
            .values()
            .any(|u| u.id != user.id && u.email_address == user.email_address)
        {
            return Err(RepoError::Duplicate(format!(
                "email address {} already registered",
                user.email_address
            )));
        }

        let stored = table
            .rows
            .get_mut(&user.id)
            .ok_or_else(|| RepoError::UpdateFailed(format!("no user with id {}", user.id)))?;

        stored.email_address = user.email_address.clone();
        stored.password = user.password.clone();
        stored.updated_at = user.updated_at;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound { entity: "User", id })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.email_address == email)
            .cloned())
    }
}
