//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email_address: String,
    pub password: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for writeit_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email_address: model.email_address,
            password: model.password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Insert form of a domain User: the id is left for the store to assign.
impl From<writeit_core::domain::User> for ActiveModel {
    fn from(user: writeit_core::domain::User) -> Self {
        Self {
            email_address: Set(user.email_address),
            password: Set(user.password),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
    }
}
