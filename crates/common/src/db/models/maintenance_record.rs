//! Maintenance record entity for stringing history and services

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service type enum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[default]
    Stringing,
    Repair,
    Other,
}

impl From<String> for ServiceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "stringing" => ServiceType::Stringing,
            "repair" => ServiceType::Repair,
            _ => ServiceType::Other,
        }
    }
}

impl From<ServiceType> for String {
    fn from(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Stringing => "stringing".to_string(),
            ServiceType::Repair => "repair".to_string(),
            ServiceType::Other => "other".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Immutable after creation
    pub client_racket_id: Uuid,

    /// Immutable after creation
    pub performed_by_user_id: Uuid,

    /// Immutable after creation
    pub service_date: DateTimeWithTimeZone,

    /// Service type as text: "stringing" | "repair" | "other"
    #[sea_orm(column_type = "Text")]
    pub service_type: String,

    // String configuration
    pub main_string_id: Option<Uuid>,

    /// Crosses can legitimately differ from mains
    pub cross_string_id: Option<Uuid>,

    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub main_tension_kg: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub cross_tension_kg: Option<Decimal>,

    /// e.g. "16x19"
    #[sea_orm(column_type = "Text", nullable)]
    pub string_pattern: Option<String>,

    // Grip configuration
    pub base_grip_id: Option<Uuid>,

    pub overgrip_id: Option<Uuid>,

    pub number_of_overgrips: i32,

    // Accessories
    pub dampener_id: Option<Uuid>,

    /// e.g. "center", "bottom"
    #[sea_orm(column_type = "Text", nullable)]
    pub dampener_position: Option<String>,

    // Service details
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub service_cost: Decimal,

    pub duration_minutes: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub is_warranty_service: bool,

    pub next_service_due_date: Option<Date>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the service type as an enum
    pub fn service_kind(&self) -> ServiceType {
        ServiceType::from(self.service_type.clone())
    }

    /// True when any of the five product roles is referenced
    pub fn references_products(&self) -> bool {
        self.main_string_id.is_some()
            || self.cross_string_id.is_some()
            || self.base_grip_id.is_some()
            || self.overgrip_id.is_some()
            || self.dampener_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_racket::Entity",
        from = "Column::ClientRacketId",
        to = "super::client_racket::Column::Id"
    )]
    Racket,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PerformedByUserId",
        to = "super::user::Column::Id"
    )]
    PerformedBy,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::MainStringId",
        to = "super::product::Column::Id"
    )]
    MainString,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::CrossStringId",
        to = "super::product::Column::Id"
    )]
    CrossString,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::BaseGripId",
        to = "super::product::Column::Id"
    )]
    BaseGrip,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::OvergripId",
        to = "super::product::Column::Id"
    )]
    Overgrip,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::DampenerId",
        to = "super::product::Column::Id"
    )]
    Dampener,
}

impl Related<super::client_racket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Racket.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_roundtrip() {
        assert_eq!(
            ServiceType::from(String::from(ServiceType::Stringing)),
            ServiceType::Stringing
        );
        assert_eq!(
            ServiceType::from(String::from(ServiceType::Repair)),
            ServiceType::Repair
        );
        // Unknown values degrade to Other
        assert_eq!(ServiceType::from("regrind".to_string()), ServiceType::Other);
    }
}
