use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photographer")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// (name, url) is the dedup key used by get-or-create.
    #[sea_orm(unique_key = "photographer_name_url", indexed)]
    pub name: String,
    #[sea_orm(unique_key = "photographer_name_url", column_type = "Text")]
    pub url: String,

    #[sea_orm(has_many)]
    pub photos: HasMany<super::photo::Entity>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
