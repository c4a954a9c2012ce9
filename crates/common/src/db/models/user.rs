//! User entity for shop staff and administrators

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Staff,
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "admin" => UserRole::Admin,
            _ => UserRole::Staff,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => "admin".to_string(),
            UserRole::Staff => "staff".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    #[sea_orm(column_type = "Text", unique)]
    pub username: String,

    #[sea_orm(column_type = "Text")]
    pub hashed_password: String,

    #[sea_orm(column_type = "Text")]
    pub first_name: String,

    #[sea_orm(column_type = "Text")]
    pub last_name: String,

    /// Role as text: "admin" | "staff"
    #[sea_orm(column_type = "Text")]
    pub role: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub phone_number: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the role as an enum
    pub fn user_role(&self) -> UserRole {
        UserRole::from(self.role.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.user_role() == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::maintenance_record::Entity")]
    MaintenanceRecords,
}

impl Related<super::maintenance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(UserRole::from(String::from(UserRole::Admin)), UserRole::Admin);
        assert_eq!(UserRole::from(String::from(UserRole::Staff)), UserRole::Staff);
        // Unknown roles degrade to the least-privileged role
        assert_eq!(UserRole::from("superuser".to_string()), UserRole::Staff);
    }
}
