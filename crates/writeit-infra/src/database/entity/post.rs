//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub creator_id: i64,
    pub post_title: String,
    #[sea_orm(column_type = "Text")]
    pub post_body: String,
    pub created_at: i64,
    pub deleted_at: Option<i64>,
    pub updated_at: Option<i64>,
}

// `creator_id` is a plain reference; ownership is not a foreign key.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for writeit_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            creator_id: model.creator_id,
            title: model.post_title,
            body: model.post_body,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// Insert form of a domain Post: the id is left for the store to assign.
impl From<writeit_core::domain::Post> for ActiveModel {
    fn from(post: writeit_core::domain::Post) -> Self {
        Self {
            creator_id: Set(post.creator_id),
            post_title: Set(post.title),
            post_body: Set(post.body),
            created_at: Set(post.created_at),
            deleted_at: Set(post.deleted_at),
            updated_at: Set(post.updated_at),
            ..Default::default()
        }
    }
}
