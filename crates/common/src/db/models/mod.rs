//! SeaORM entity models
//!
//! Database entities for the Courtside shop management system

pub mod client;
pub mod client_racket;
pub mod maintenance_record;
pub mod product;
pub mod product_category;
pub mod user;

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
    UserRole,
};

pub use client::{
    Entity as ClientEntity,
    Model as Client,
    ActiveModel as ClientActiveModel,
    Column as ClientColumn,
};

pub use product_category::{
    Entity as ProductCategoryEntity,
    Model as ProductCategory,
    ActiveModel as ProductCategoryActiveModel,
    Column as ProductCategoryColumn,
};

pub use product::{
    Entity as ProductEntity,
    Model as Product,
    ActiveModel as ProductActiveModel,
    Column as ProductColumn,
};

pub use client_racket::{
    Entity as ClientRacketEntity,
    Model as ClientRacket,
    ActiveModel as ClientRacketActiveModel,
    Column as ClientRacketColumn,
};

pub use maintenance_record::{
    Entity as MaintenanceRecordEntity,
    Model as MaintenanceRecord,
    ActiveModel as MaintenanceRecordActiveModel,
    Column as MaintenanceRecordColumn,
    ServiceType,
};
