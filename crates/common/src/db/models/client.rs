//! Client entity for shop customers

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub first_name: String,

    #[sea_orm(column_type = "Text")]
    pub last_name: String,

    /// Optional, but unique when present
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub email: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub phone_number: String,

    pub date_of_birth: Option<Date>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address_line1: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address_line2: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub city: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub postal_code: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub country: Option<String>,

    /// Special preferences or notes
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::client_racket::Entity")]
    Rackets,
}

impl Related<super::client_racket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rackets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
