//! Reference resolution for maintenance product roles
//!
//! A maintenance record can reference up to five products, each in a
//! distinct role. Every supplied id must resolve to an existing product;
//! an id that matches nothing is fatal for the record. Inactive products
//! still resolve (history must stay valid) but referencing one in a new
//! record is worth a warning.

use crate::db::models::Product;
use crate::db::Repository;
use crate::errors::{AppError, Result};
use uuid::Uuid;

/// The five product roles a maintenance record can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductRole {
    MainString,
    CrossString,
    BaseGrip,
    Overgrip,
    Dampener,
}

impl ProductRole {
    pub const ALL: [ProductRole; 5] = [
        ProductRole::MainString,
        ProductRole::CrossString,
        ProductRole::BaseGrip,
        ProductRole::Overgrip,
        ProductRole::Dampener,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductRole::MainString => "main_string",
            ProductRole::CrossString => "cross_string",
            ProductRole::BaseGrip => "base_grip",
            ProductRole::Overgrip => "overgrip",
            ProductRole::Dampener => "dampener",
        }
    }

    /// Category slugs conventionally holding products for this role.
    ///
    /// Naming convention only; the schema does not enforce it.
    pub fn expected_category_slugs(&self) -> &'static [&'static str] {
        match self {
            ProductRole::MainString | ProductRole::CrossString => &["strings"],
            ProductRole::BaseGrip => &["grips"],
            ProductRole::Overgrip => &["overgrips", "grips"],
            ProductRole::Dampener => &["dampeners"],
        }
    }
}

/// How strictly role-to-category fit is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFitPolicy {
    /// No check at all
    Off,
    /// Log a warning on mismatch
    #[default]
    Warn,
    /// Reject the record on mismatch
    Enforce,
}

impl CategoryFitPolicy {
    /// Parse from a config string; unknown values fall back to Warn
    pub fn from_name(name: &str) -> Self {
        match name {
            "off" => CategoryFitPolicy::Off,
            "enforce" => CategoryFitPolicy::Enforce,
            _ => CategoryFitPolicy::Warn,
        }
    }
}

/// Candidate product ids tagged by role
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleReferences {
    pub main_string: Option<Uuid>,
    pub cross_string: Option<Uuid>,
    pub base_grip: Option<Uuid>,
    pub overgrip: Option<Uuid>,
    pub dampener: Option<Uuid>,
}

impl RoleReferences {
    pub fn get(&self, role: ProductRole) -> Option<Uuid> {
        match role {
            ProductRole::MainString => self.main_string,
            ProductRole::CrossString => self.cross_string,
            ProductRole::BaseGrip => self.base_grip,
            ProductRole::Overgrip => self.overgrip,
            ProductRole::Dampener => self.dampener,
        }
    }

    /// Iterate over the supplied (role, id) pairs only
    pub fn iter(&self) -> impl Iterator<Item = (ProductRole, Uuid)> + '_ {
        ProductRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|id| (role, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Products resolved per role
#[derive(Debug, Clone, Default)]
pub struct ResolvedReferences {
    resolved: Vec<(ProductRole, Product)>,
}

impl ResolvedReferences {
    pub fn get(&self, role: ProductRole) -> Option<&Product> {
        self.resolved
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ProductRole, Product)> {
        self.resolved.iter()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// True when the product's category slug matches the role's convention
pub fn category_fits(role: ProductRole, category_slug: &str) -> bool {
    role.expected_category_slugs().contains(&category_slug)
}

/// Read-only resolver over the repository
pub struct ReferenceResolver<'a> {
    repo: &'a Repository,
    policy: CategoryFitPolicy,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(repo: &'a Repository, policy: CategoryFitPolicy) -> Self {
        Self { repo, policy }
    }

    /// Resolve every supplied reference.
    ///
    /// Fails with `ReferenceNotFound` on the first id that matches no
    /// product at all. Inactive products resolve with a warning.
    pub async fn resolve(&self, refs: &RoleReferences) -> Result<ResolvedReferences> {
        let mut resolved = Vec::new();

        for (role, id) in refs.iter() {
            let product = self
                .repo
                .find_product_by_id(id)
                .await?
                .ok_or(AppError::ReferenceNotFound {
                    role: role.as_str(),
                    id: id.to_string(),
                })?;

            if !product.is_active {
                tracing::warn!(
                    product_id = %product.id,
                    role = role.as_str(),
                    "New record references an inactive product"
                );
            }

            self.check_category_fit(role, &product).await?;

            resolved.push((role, product));
        }

        Ok(ResolvedReferences { resolved })
    }

    async fn check_category_fit(&self, role: ProductRole, product: &Product) -> Result<()> {
        if self.policy == CategoryFitPolicy::Off {
            return Ok(());
        }

        let Some(category) = self.repo.find_category_by_id(product.category_id).await? else {
            // Orphaned category reference; nothing to compare against
            return Ok(());
        };

        if category_fits(role, &category.slug) {
            return Ok(());
        }

        match self.policy {
            CategoryFitPolicy::Warn => {
                tracing::warn!(
                    product_id = %product.id,
                    role = role.as_str(),
                    category = %category.slug,
                    "Product category does not match its maintenance role"
                );
                Ok(())
            }
            CategoryFitPolicy::Enforce => Err(AppError::invalid_field(
                role.as_str(),
                format!(
                    "product {} belongs to category '{}', expected one of {:?}",
                    product.id,
                    category.slug,
                    role.expected_category_slugs()
                ),
            )),
            CategoryFitPolicy::Off => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!(CategoryFitPolicy::from_name("off"), CategoryFitPolicy::Off);
        assert_eq!(CategoryFitPolicy::from_name("warn"), CategoryFitPolicy::Warn);
        assert_eq!(
            CategoryFitPolicy::from_name("enforce"),
            CategoryFitPolicy::Enforce
        );
        // Unknown values degrade to the advisory default
        assert_eq!(
            CategoryFitPolicy::from_name("strict"),
            CategoryFitPolicy::Warn
        );
    }

    #[test]
    fn test_category_fits() {
        assert!(category_fits(ProductRole::MainString, "strings"));
        assert!(category_fits(ProductRole::CrossString, "strings"));
        assert!(category_fits(ProductRole::Overgrip, "overgrips"));
        // Overgrips are often filed under a generic grips category
        assert!(category_fits(ProductRole::Overgrip, "grips"));
        assert!(!category_fits(ProductRole::Dampener, "strings"));
        assert!(!category_fits(ProductRole::BaseGrip, "dampeners"));
    }

    #[test]
    fn test_role_references_iter_skips_absent() {
        let id = Uuid::new_v4();
        let refs = RoleReferences {
            cross_string: Some(id),
            ..Default::default()
        };

        let supplied: Vec<_> = refs.iter().collect();
        assert_eq!(supplied, vec![(ProductRole::CrossString, id)]);
        assert!(!refs.is_empty());
        assert!(RoleReferences::default().is_empty());
    }

    #[test]
    fn test_resolved_lookup() {
        let resolved = ResolvedReferences::default();
        assert!(resolved.get(ProductRole::Dampener).is_none());
        assert!(resolved.is_empty());
    }
}
