use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity record. Rows are created at signup and looked up by email at
/// login; the password column always holds an argon2 hash, never plaintext.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTimeUtc,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
