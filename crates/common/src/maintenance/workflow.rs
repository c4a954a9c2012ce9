//! Create/update workflow for maintenance records
//!
//! Pipeline for both paths: resolve the racket and performer, resolve
//! product references, validate numerics, apply defaults, persist
//! atomically. The record itself has no status field; it either exists
//! or it does not.

use crate::config::BusinessConfig;
use crate::db::models::{
    MaintenanceRecord, MaintenanceRecordActiveModel, ServiceType,
};
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::maintenance::resolver::{CategoryFitPolicy, ReferenceResolver, RoleReferences};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use uuid::Uuid;

/// Maximum plausible string tension in kg
const MAX_TENSION_KG: i64 = 50;

/// Maximum overgrip layers on one handle
const MAX_OVERGRIPS: i32 = 10;

/// String configuration group
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConfig {
    pub main_string_id: Option<Uuid>,
    pub cross_string_id: Option<Uuid>,
    pub main_tension_kg: Option<Decimal>,
    pub cross_tension_kg: Option<Decimal>,
}

/// Grip configuration group
#[derive(Debug, Clone, Copy, Default)]
pub struct GripConfig {
    pub base_grip_id: Option<Uuid>,
    pub overgrip_id: Option<Uuid>,
    pub number_of_overgrips: Option<i32>,
}

/// Dampener configuration group
#[derive(Debug, Clone, Default)]
pub struct DampenerConfig {
    pub dampener_id: Option<Uuid>,
    pub dampener_position: Option<String>,
}

/// Input for creating a maintenance record
#[derive(Debug, Clone, Default)]
pub struct NewMaintenanceRecord {
    pub client_racket_id: Uuid,
    pub performed_by_user_id: Uuid,
    pub service_type: ServiceType,
    /// Defaults to now when unspecified
    pub service_date: Option<DateTime<Utc>>,
    pub strings: StringConfig,
    pub string_pattern: Option<String>,
    pub grips: GripConfig,
    pub dampener: DampenerConfig,
    pub service_cost: Decimal,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub is_warranty_service: bool,
    pub next_service_due_date: Option<NaiveDate>,
}

impl NewMaintenanceRecord {
    /// Collect the supplied product ids, tagged by role
    pub fn role_references(&self) -> RoleReferences {
        RoleReferences {
            main_string: self.strings.main_string_id,
            cross_string: self.strings.cross_string_id,
            base_grip: self.grips.base_grip_id,
            overgrip: self.grips.overgrip_id,
            dampener: self.dampener.dampener_id,
        }
    }
}

/// Delta update for a maintenance record.
///
/// `client_racket_id`, `performed_by_user_id` and `service_date` are
/// fixed at creation; supplying any of them fails with `ImmutableField`.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceRecordPatch {
    pub client_racket_id: Option<Uuid>,
    pub performed_by_user_id: Option<Uuid>,
    pub service_date: Option<DateTime<Utc>>,

    pub service_type: Option<ServiceType>,
    pub service_cost: Option<Decimal>,

    pub main_string_id: Option<Uuid>,
    pub cross_string_id: Option<Uuid>,
    pub main_tension_kg: Option<Decimal>,
    pub cross_tension_kg: Option<Decimal>,
    pub string_pattern: Option<String>,

    pub base_grip_id: Option<Uuid>,
    pub overgrip_id: Option<Uuid>,
    pub number_of_overgrips: Option<i32>,

    pub dampener_id: Option<Uuid>,
    pub dampener_position: Option<String>,

    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub is_warranty_service: Option<bool>,
    pub next_service_due_date: Option<NaiveDate>,
}

impl MaintenanceRecordPatch {
    fn role_references(&self) -> RoleReferences {
        RoleReferences {
            main_string: self.main_string_id,
            cross_string: self.cross_string_id,
            base_grip: self.base_grip_id,
            overgrip: self.overgrip_id,
            dampener: self.dampener_id,
        }
    }
}

// ============================================================================
// Pure validation and defaulting rules
// ============================================================================

fn validate_cost(cost: Decimal) -> Result<()> {
    if cost < Decimal::ZERO {
        return Err(AppError::invalid_field(
            "service_cost",
            "must be non-negative",
        ));
    }
    Ok(())
}

fn validate_tension(field: &'static str, tension: Option<Decimal>) -> Result<()> {
    let Some(t) = tension else { return Ok(()) };
    if t <= Decimal::ZERO {
        return Err(AppError::invalid_field(field, "tension must be positive"));
    }
    if t > Decimal::from(MAX_TENSION_KG) {
        return Err(AppError::invalid_field(
            field,
            format!("tension must not exceed {} kg", MAX_TENSION_KG),
        ));
    }
    Ok(())
}

fn validate_overgrip_count(count: Option<i32>) -> Result<()> {
    let Some(n) = count else { return Ok(()) };
    if !(0..=MAX_OVERGRIPS).contains(&n) {
        return Err(AppError::invalid_field(
            "number_of_overgrips",
            format!("must be between 0 and {}", MAX_OVERGRIPS),
        ));
    }
    Ok(())
}

fn validate_duration(minutes: Option<i32>) -> Result<()> {
    let Some(m) = minutes else { return Ok(()) };
    if m < 0 {
        return Err(AppError::invalid_field(
            "duration_minutes",
            "must be non-negative",
        ));
    }
    Ok(())
}

/// One layer when an overgrip product is referenced, otherwise zero
fn default_overgrip_count(overgrip_id: Option<Uuid>, requested: Option<i32>) -> i32 {
    match requested {
        Some(n) => n,
        None if overgrip_id.is_some() => 1,
        None => 0,
    }
}

/// Advisory only: a stringing service normally sets at least one string
fn stringing_without_strings(service_type: ServiceType, strings: &StringConfig) -> bool {
    service_type == ServiceType::Stringing
        && strings.main_string_id.is_none()
        && strings.cross_string_id.is_none()
}

/// Stock consumed by the referenced products, one unit per role except
/// overgrips which consume one unit per layer
fn depletion_plan(refs: &RoleReferences, overgrip_count: i32) -> Vec<(Uuid, i32)> {
    let mut plan = Vec::new();
    if let Some(id) = refs.main_string {
        plan.push((id, 1));
    }
    if let Some(id) = refs.cross_string {
        plan.push((id, 1));
    }
    if let Some(id) = refs.base_grip {
        plan.push((id, 1));
    }
    if let Some(id) = refs.overgrip {
        if overgrip_count > 0 {
            plan.push((id, overgrip_count));
        }
    }
    if let Some(id) = refs.dampener {
        plan.push((id, 1));
    }
    plan
}

fn reject_immutable_fields(patch: &MaintenanceRecordPatch) -> Result<()> {
    if patch.client_racket_id.is_some() {
        return Err(AppError::ImmutableField {
            field: "client_racket_id",
        });
    }
    if patch.performed_by_user_id.is_some() {
        return Err(AppError::ImmutableField {
            field: "performed_by_user_id",
        });
    }
    if patch.service_date.is_some() {
        return Err(AppError::ImmutableField {
            field: "service_date",
        });
    }
    Ok(())
}

// ============================================================================
// Workflow
// ============================================================================

/// Orchestrates maintenance record creation and update
// Clone mirrors `Repository`/`DbPool`: unavailable under the `mock` feature.
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct MaintenanceWorkflow {
    repo: Repository,
    policy: CategoryFitPolicy,
    deplete_stock: bool,
}

impl MaintenanceWorkflow {
    pub fn new(repo: Repository, policy: CategoryFitPolicy, deplete_stock: bool) -> Self {
        Self {
            repo,
            policy,
            deplete_stock,
        }
    }

    pub fn from_config(repo: Repository, business: &BusinessConfig) -> Self {
        Self::new(
            repo,
            CategoryFitPolicy::from_name(&business.category_fit_policy),
            business.deplete_stock_on_service,
        )
    }

    /// Create a maintenance record.
    ///
    /// Either the full record with every resolved reference commits, or
    /// nothing does.
    pub async fn create_record(&self, input: NewMaintenanceRecord) -> Result<MaintenanceRecord> {
        let racket = self
            .repo
            .find_racket_by_id(input.client_racket_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(AppError::NotFound {
                resource: "Racket",
                id: input.client_racket_id.to_string(),
            })?;

        let performer = self
            .repo
            .find_user_by_id(input.performed_by_user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::NotFound {
                resource: "User",
                id: input.performed_by_user_id.to_string(),
            })?;

        let refs = input.role_references();
        ReferenceResolver::new(&self.repo, self.policy)
            .resolve(&refs)
            .await?;

        validate_cost(input.service_cost)?;
        validate_tension("main_tension_kg", input.strings.main_tension_kg)?;
        validate_tension("cross_tension_kg", input.strings.cross_tension_kg)?;
        validate_overgrip_count(input.grips.number_of_overgrips)?;
        validate_duration(input.duration_minutes)?;

        if stringing_without_strings(input.service_type, &input.strings) {
            tracing::warn!(
                racket_id = %racket.id,
                "Stringing service recorded without a main or cross string"
            );
        }

        let service_date = input.service_date.unwrap_or_else(Utc::now);
        let overgrip_count =
            default_overgrip_count(input.grips.overgrip_id, input.grips.number_of_overgrips);

        let depletions = if self.deplete_stock {
            depletion_plan(&refs, overgrip_count)
        } else {
            Vec::new()
        };

        let now = Utc::now();
        let record = MaintenanceRecordActiveModel {
            id: Set(Uuid::new_v4()),
            client_racket_id: Set(racket.id),
            performed_by_user_id: Set(performer.id),
            service_date: Set(service_date.into()),
            service_type: Set(String::from(input.service_type)),
            main_string_id: Set(input.strings.main_string_id),
            cross_string_id: Set(input.strings.cross_string_id),
            main_tension_kg: Set(input.strings.main_tension_kg),
            cross_tension_kg: Set(input.strings.cross_tension_kg),
            string_pattern: Set(input.string_pattern),
            base_grip_id: Set(input.grips.base_grip_id),
            overgrip_id: Set(input.grips.overgrip_id),
            number_of_overgrips: Set(overgrip_count),
            dampener_id: Set(input.dampener.dampener_id),
            dampener_position: Set(input.dampener.dampener_position),
            service_cost: Set(input.service_cost),
            duration_minutes: Set(input.duration_minutes),
            notes: Set(input.notes),
            is_warranty_service: Set(input.is_warranty_service),
            next_service_due_date: Set(input.next_service_due_date),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let record = self
            .repo
            .insert_maintenance_record(record, &depletions)
            .await?;

        tracing::info!(
            record_id = %record.id,
            racket_id = %record.client_racket_id,
            service_type = %record.service_type,
            "Maintenance record created"
        );

        Ok(record)
    }

    /// Update a maintenance record over the supplied delta fields only
    pub async fn update_record(
        &self,
        id: Uuid,
        patch: MaintenanceRecordPatch,
    ) -> Result<MaintenanceRecord> {
        reject_immutable_fields(&patch)?;

        let existing = self
            .repo
            .find_record_by_id(id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(AppError::NotFound {
                resource: "Maintenance record",
                id: id.to_string(),
            })?;

        let refs = patch.role_references();
        ReferenceResolver::new(&self.repo, self.policy)
            .resolve(&refs)
            .await?;

        if let Some(cost) = patch.service_cost {
            validate_cost(cost)?;
        }
        validate_tension("main_tension_kg", patch.main_tension_kg)?;
        validate_tension("cross_tension_kg", patch.cross_tension_kg)?;
        validate_overgrip_count(patch.number_of_overgrips)?;
        validate_duration(patch.duration_minutes)?;

        let mut record = MaintenanceRecordActiveModel {
            id: Set(existing.id),
            ..Default::default()
        };

        if let Some(v) = patch.service_type {
            record.service_type = Set(String::from(v));
        }
        if let Some(v) = patch.service_cost {
            record.service_cost = Set(v);
        }
        if let Some(v) = patch.main_string_id {
            record.main_string_id = Set(Some(v));
        }
        if let Some(v) = patch.cross_string_id {
            record.cross_string_id = Set(Some(v));
        }
        if let Some(v) = patch.main_tension_kg {
            record.main_tension_kg = Set(Some(v));
        }
        if let Some(v) = patch.cross_tension_kg {
            record.cross_tension_kg = Set(Some(v));
        }
        if let Some(v) = patch.string_pattern {
            record.string_pattern = Set(Some(v));
        }
        if let Some(v) = patch.base_grip_id {
            record.base_grip_id = Set(Some(v));
        }
        if let Some(v) = patch.overgrip_id {
            record.overgrip_id = Set(Some(v));
        }
        if let Some(v) = patch.number_of_overgrips {
            record.number_of_overgrips = Set(v);
        }
        if let Some(v) = patch.dampener_id {
            record.dampener_id = Set(Some(v));
        }
        if let Some(v) = patch.dampener_position {
            record.dampener_position = Set(Some(v));
        }
        if let Some(v) = patch.duration_minutes {
            record.duration_minutes = Set(Some(v));
        }
        if let Some(v) = patch.notes {
            record.notes = Set(Some(v));
        }
        if let Some(v) = patch.is_warranty_service {
            record.is_warranty_service = Set(v);
        }
        if let Some(v) = patch.next_service_due_date {
            record.next_service_due_date = Set(Some(v));
        }
        record.updated_at = Set(Utc::now().into());

        let record = self.repo.update_maintenance_record(record).await?;

        tracing::info!(record_id = %record.id, "Maintenance record updated");

        Ok(record)
    }
}

// Requires sea-orm's MockDatabase, available only under the `mock` feature.
#[cfg(all(test, feature = "mock"))]
mod mock_db_tests {
    use super::*;
    use crate::db::models::{client_racket, product, product_category, user};
    use crate::db::DbPool;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn repo(db: DatabaseConnection) -> Repository {
        Repository::new(DbPool {
            primary: db,
            replica: None,
        })
    }

    fn workflow(db: DatabaseConnection, policy: CategoryFitPolicy) -> MaintenanceWorkflow {
        MaintenanceWorkflow::new(repo(db), policy, false)
    }

    fn test_racket(is_active: bool) -> client_racket::Model {
        let now = Utc::now().fixed_offset();
        client_racket::Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            product_id: None,
            custom_name: None,
            brand: "Wilson".into(),
            model: "Pro Staff 97".into(),
            serial_number: None,
            purchase_date: None,
            weight_unstrung: None,
            grip_size: "4 1/4".into(),
            notes: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_user() -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: Uuid::new_v4(),
            email: "stringer@example.com".into(),
            username: "stringer".into(),
            hashed_password: "hash".into(),
            first_name: "Sam".into(),
            last_name: "Stringer".into(),
            role: "staff".into(),
            phone_number: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_product(category_id: Uuid) -> product::Model {
        let now = Utc::now().fixed_offset();
        product::Model {
            id: Uuid::new_v4(),
            category_id,
            name: "RPM Blast 1.25".into(),
            brand: "Babolat".into(),
            model: None,
            sku: None,
            description: None,
            price: None,
            cost_price: None,
            quantity_in_stock: 12,
            image_url: None,
            specifications: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_category(slug: &str) -> product_category::Model {
        let now = Utc::now().fixed_offset();
        product_category::Model {
            id: Uuid::new_v4(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn base_input(racket: &client_racket::Model, performer: &user::Model) -> NewMaintenanceRecord {
        NewMaintenanceRecord {
            client_racket_id: racket.id,
            performed_by_user_id: performer.id,
            service_type: ServiceType::Stringing,
            service_cost: Decimal::new(1500, 2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_fails_for_unknown_racket() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<client_racket::Model>::new()])
            .into_connection();

        let input = NewMaintenanceRecord {
            client_racket_id: Uuid::new_v4(),
            performed_by_user_id: Uuid::new_v4(),
            service_cost: Decimal::new(1500, 2),
            ..Default::default()
        };

        let err = workflow(db, CategoryFitPolicy::Warn)
            .create_record(input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { resource: "Racket", .. }));
    }

    #[tokio::test]
    async fn create_fails_for_inactive_racket() {
        let racket = test_racket(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![racket.clone()]])
            .into_connection();

        let input = NewMaintenanceRecord {
            client_racket_id: racket.id,
            performed_by_user_id: Uuid::new_v4(),
            service_cost: Decimal::new(1500, 2),
            ..Default::default()
        };

        let err = workflow(db, CategoryFitPolicy::Warn)
            .create_record(input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { resource: "Racket", .. }));
    }

    #[tokio::test]
    async fn create_propagates_reference_not_found_without_persisting() {
        let racket = test_racket(true);
        let performer = test_user();

        // Racket and performer resolve; the main string id matches nothing.
        // The mock has no insert result appended, so reaching the insert
        // would surface a database error instead of ReferenceNotFound.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![racket.clone()]])
            .append_query_results([vec![performer.clone()]])
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let mut input = base_input(&racket, &performer);
        input.strings.main_string_id = Some(Uuid::new_v4());

        let err = workflow(db, CategoryFitPolicy::Warn)
            .create_record(input)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ReferenceNotFound {
                role: "main_string",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_rejects_negative_cost() {
        let racket = test_racket(true);
        let performer = test_user();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![racket.clone()]])
            .append_query_results([vec![performer.clone()]])
            .into_connection();

        let mut input = base_input(&racket, &performer);
        input.service_cost = Decimal::new(-1, 0);

        let err = workflow(db, CategoryFitPolicy::Warn)
            .create_record(input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn create_with_empty_groups_persists_without_references() {
        let racket = test_racket(true);
        let performer = test_user();
        let now = Utc::now().fixed_offset();

        let persisted = MaintenanceRecord {
            id: Uuid::new_v4(),
            client_racket_id: racket.id,
            performed_by_user_id: performer.id,
            service_date: now,
            service_type: "stringing".into(),
            main_string_id: None,
            cross_string_id: None,
            main_tension_kg: None,
            cross_tension_kg: None,
            string_pattern: None,
            base_grip_id: None,
            overgrip_id: None,
            number_of_overgrips: 0,
            dampener_id: None,
            dampener_position: None,
            service_cost: Decimal::new(1500, 2),
            duration_minutes: None,
            notes: None,
            is_warranty_service: false,
            next_service_due_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![racket.clone()]])
            .append_query_results([vec![performer.clone()]])
            .append_query_results([vec![persisted.clone()]])
            .into_connection();

        let record = workflow(db, CategoryFitPolicy::Warn)
            .create_record(base_input(&racket, &performer))
            .await
            .unwrap();

        assert!(!record.references_products());
        assert_eq!(record.number_of_overgrips, 0);
    }

    #[tokio::test]
    async fn create_enforce_policy_rejects_category_mismatch() {
        let racket = test_racket(true);
        let performer = test_user();
        let strings_category = test_category("strings");
        let string_product = test_product(strings_category.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![racket.clone()]])
            .append_query_results([vec![performer.clone()]])
            .append_query_results([vec![string_product.clone()]])
            .append_query_results([vec![strings_category.clone()]])
            .into_connection();

        // A string product supplied in the dampener role
        let mut input = base_input(&racket, &performer);
        input.dampener.dampener_id = Some(string_product.id);

        let err = workflow(db, CategoryFitPolicy::Enforce)
            .create_record(input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn update_rejects_immutable_fields_before_touching_the_store() {
        // No query results appended: any DB access would error differently
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let patch = MaintenanceRecordPatch {
            client_racket_id: Some(Uuid::new_v4()),
            ..Default::default()
        };

        let err = workflow(db, CategoryFitPolicy::Warn)
            .update_record(Uuid::new_v4(), patch)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ImmutableField {
                field: "client_racket_id"
            }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(mantissa: i64, scale: u32) -> Decimal {
        Decimal::new(mantissa, scale)
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = validate_cost(dec(-1, 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(validate_cost(Decimal::ZERO).is_ok());
        assert!(validate_cost(dec(1500, 2)).is_ok());
    }

    #[test]
    fn test_tension_bounds() {
        assert!(validate_tension("main_tension_kg", None).is_ok());
        assert!(validate_tension("main_tension_kg", Some(dec(245, 1))).is_ok());

        let err = validate_tension("main_tension_kg", Some(Decimal::ZERO)).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = validate_tension("cross_tension_kg", Some(dec(-230, 1))).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = validate_tension("main_tension_kg", Some(dec(51, 0))).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_overgrip_count_bounds() {
        assert!(validate_overgrip_count(None).is_ok());
        assert!(validate_overgrip_count(Some(0)).is_ok());
        assert!(validate_overgrip_count(Some(10)).is_ok());
        assert!(validate_overgrip_count(Some(-1)).is_err());
        assert!(validate_overgrip_count(Some(11)).is_err());
    }

    #[test]
    fn test_overgrip_default_only_when_referenced() {
        let overgrip = Some(Uuid::new_v4());

        // Referenced without a count: one layer
        assert_eq!(default_overgrip_count(overgrip, None), 1);
        // No overgrip at all: zero layers
        assert_eq!(default_overgrip_count(None, None), 0);
        // An explicit count always wins
        assert_eq!(default_overgrip_count(overgrip, Some(3)), 3);
        assert_eq!(default_overgrip_count(None, Some(2)), 2);
    }

    #[test]
    fn test_stringing_advisory() {
        let empty = StringConfig::default();
        assert!(stringing_without_strings(ServiceType::Stringing, &empty));
        assert!(!stringing_without_strings(ServiceType::Repair, &empty));

        // Cross-only is a legitimate configuration
        let cross_only = StringConfig {
            cross_string_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!stringing_without_strings(ServiceType::Stringing, &cross_only));
    }

    #[test]
    fn test_depletion_plan() {
        let main = Uuid::new_v4();
        let overgrip = Uuid::new_v4();
        let refs = RoleReferences {
            main_string: Some(main),
            overgrip: Some(overgrip),
            ..Default::default()
        };

        let plan = depletion_plan(&refs, 2);
        assert_eq!(plan, vec![(main, 1), (overgrip, 2)]);

        // Zero layers consume nothing
        let plan = depletion_plan(&refs, 0);
        assert_eq!(plan, vec![(main, 1)]);

        assert!(depletion_plan(&RoleReferences::default(), 1).is_empty());
    }

    #[test]
    fn test_immutable_fields_rejected() {
        let patch = MaintenanceRecordPatch {
            client_racket_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = reject_immutable_fields(&patch).unwrap_err();
        assert!(matches!(
            err,
            AppError::ImmutableField {
                field: "client_racket_id"
            }
        ));

        let patch = MaintenanceRecordPatch {
            service_date: Some(Utc::now()),
            ..Default::default()
        };
        let err = reject_immutable_fields(&patch).unwrap_err();
        assert!(matches!(
            err,
            AppError::ImmutableField {
                field: "service_date"
            }
        ));

        // Clerical corrections pass through
        let patch = MaintenanceRecordPatch {
            notes: Some("restrung after tournament".into()),
            ..Default::default()
        };
        assert!(reject_immutable_fields(&patch).is_ok());
    }
}
