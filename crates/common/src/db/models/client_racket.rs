//! Client racket entity - rackets owned by shop clients

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_rackets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub client_id: Uuid,

    /// Set when the racket came from the product catalog
    pub product_id: Option<Uuid>,

    /// e.g. "My Wilson Pro Staff"
    #[sea_orm(column_type = "Text", nullable)]
    pub custom_name: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub brand: String,

    #[sea_orm(column_type = "Text")]
    pub model: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub serial_number: Option<String>,

    pub purchase_date: Option<Date>,

    /// Weight in grams
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub weight_unstrung: Option<Decimal>,

    /// e.g. "4 1/4", "4 3/8"
    #[sea_orm(column_type = "Text")]
    pub grip_size: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// False once the client no longer owns it
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,

    #[sea_orm(has_many = "super::maintenance_record::Entity")]
    MaintenanceRecords,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::maintenance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
