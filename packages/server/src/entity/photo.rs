use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub width: i32,
    pub height: i32,
    #[sea_orm(column_type = "Text")]
    pub url: String,

    /// Photographers cannot be deleted while photos still reference them.
    pub photographer_id: Uuid,
    #[sea_orm(belongs_to, from = "photographer_id", to = "id", on_delete = "Restrict")]
    pub photographer: HasOne<super::photographer::Entity>,

    /// Hex colour such as `#7A6F5D`.
    #[sea_orm(indexed)]
    pub avg_color: String,

    #[sea_orm(column_type = "Text")]
    pub src_original: String,
    #[sea_orm(column_type = "Text")]
    pub src_large2x: String,
    #[sea_orm(column_type = "Text")]
    pub src_large: String,
    #[sea_orm(column_type = "Text")]
    pub src_medium: String,
    #[sea_orm(column_type = "Text")]
    pub src_small: String,
    #[sea_orm(column_type = "Text")]
    pub src_portrait: String,
    #[sea_orm(column_type = "Text")]
    pub src_landscape: String,
    #[sea_orm(column_type = "Text")]
    pub src_tiny: String,

    #[sea_orm(column_type = "Text")]
    pub alt: String,

    /// NULL for seeded/imported photos. Cleared when the owning user is deleted.
    #[sea_orm(indexed)]
    pub owner_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "owner_id", to = "id", on_delete = "SetNull")]
    pub owner: Option<super::user::Entity>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
