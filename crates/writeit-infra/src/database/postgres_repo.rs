//! PostgreSQL persistence services for posts and users.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use writeit_core::domain::{Post, User};
use writeit_core::error::RepoError;
use writeit_core::now_timestamp;
use writeit_core::ports::{Repository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, insert_error, query_error, update_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl Repository<Post> for PostgresPostRepository {
    async fn create(&self, mut post: Post) -> Result<Post, RepoError> {
        if post.is_blank() {
            return Err(RepoError::EmptyInput("Post"));
        }
        post.created_at = now_timestamp();

        let active: post::ActiveModel = post.into();
        let saved = self
            .in_transaction(move |txn| {
                Box::pin(async move { active.insert(txn).await.map_err(insert_error) })
            })
            .await?;

        tracing::debug!(post_id = saved.id, creator_id = saved.creator_id, "Post created");
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(Into::into)
            .ok_or(RepoError::NotFound { entity: "Post", id })
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        post.updated_at = Some(now_timestamp());

        let (id, creator_id) = (post.id, post.creator_id);
        let (title, body, updated_at) = (post.title.clone(), post.body.clone(), post.updated_at);

        // created_at is never part of the SET list.
        self.in_transaction(move |txn| {
            Box::pin(async move {
                let result = PostEntity::update_many()
                    .col_expr(post::Column::PostTitle, Expr::value(title))
                    .col_expr(post::Column::PostBody, Expr::value(body))
                    .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
                    .filter(post::Column::Id.eq(id))
                    .filter(post::Column::CreatorId.eq(creator_id))
                    .exec(txn)
                    .await
                    .map_err(update_error)?;

                if result.rows_affected == 0 {
                    return Err(RepoError::UpdateFailed(format!(
                        "no post with id {id} owned by user {creator_id}"
                    )));
                }
                Ok(())
            })
        })
        .await?;

        tracing::debug!(post_id = id, "Post updated");
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        self.in_transaction(move |txn| {
            Box::pin(async move {
                let result = PostEntity::delete_by_id(id)
                    .exec(txn)
                    .await
                    .map_err(|e| RepoError::DeleteFailed(e.to_string()))?;

                if result.rows_affected == 0 {
                    return Err(RepoError::NotFound { entity: "Post", id });
                }
                Ok(())
            })
        })
        .await?;

        tracing::debug!(post_id = id, "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl Repository<User> for PostgresUserRepository {
    async fn create(&self, mut user: User) -> Result<User, RepoError> {
        if user.is_blank() {
            return Err(RepoError::EmptyInput("User"));
        }
        user.created_at = now_timestamp();

        let active: user::ActiveModel = user.into();
        let saved = self
            .in_transaction(move |txn| {
                Box::pin(async move { active.insert(txn).await.map_err(insert_error) })
            })
            .await?;

        tracing::debug!(user_id = saved.id, "User created");
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<User, RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(Into::into)
            .ok_or(RepoError::NotFound { entity: "User", id })
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, mut user: User) -> Result<User, RepoError> {
        user.updated_at = Some(now_timestamp());

        let id = user.id;
        let (email, password, updated_at) =
            (user.email_address.clone(), user.password.clone(), user.updated_at);

        self.in_transaction(move |txn| {
            Box::pin(async move {
                let result = UserEntity::update_many()
                    .col_expr(user::Column::EmailAddress, Expr::value(email))
                    .col_expr(user::Column::Password, Expr::value(password))
                    .col_expr(user::Column::UpdatedAt, Expr::value(updated_at))
                    .filter(user::Column::Id.eq(id))
                    .exec(txn)
                    .await
                    .map_err(update_error)?;

                if result.rows_affected == 0 {
                    return Err(RepoError::UpdateFailed(format!("no user with id {id}")));
                }
                Ok(())
            })
        })
        .await?;

        tracing::debug!(user_id = id, "User updated");
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if id <= 0 {
            return Err(RepoError::MissingId);
        }

        self.in_transaction(move |txn| {
            Box::pin(async move {
                let result = UserEntity::delete_by_id(id)
                    .exec(txn)
                    .await
                    .map_err(|e| RepoError::DeleteFailed(e.to_string()))?;

                if result.rows_affected == 0 {
                    return Err(RepoError::NotFound { entity: "User", id });
                }
                Ok(())
            })
        })
        .await?;

        tracing::debug!(user_id = id, "User deleted");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::EmailAddress.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}
