//! Product entity for inventory items

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub category_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub brand: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub model: Option<String>,

    /// Optional, but unique when present
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub sku: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Retail price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price: Option<Decimal>,

    /// Cost price for profit tracking
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub cost_price: Option<Decimal>,

    pub quantity_in_stock: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,

    /// Open attribute bag; valid keys vary by category
    /// e.g. {"gauge": "1.25mm", "color": "black", "material": "polyester"}
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub specifications: Option<Json>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::CategoryId",
        to = "super::product_category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::client_racket::Entity")]
    ClientRackets,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::client_racket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientRackets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
