//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling and transaction support.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::pagination::{PageParams, Paginated};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// New client input
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
}

/// Delta update for a client; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// New racket input
#[derive(Debug, Clone, Default)]
pub struct NewRacket {
    pub client_id: Uuid,
    pub product_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub grip_size: String,
    pub notes: Option<String>,
}

/// Delta update for a racket
#[derive(Debug, Clone, Default)]
pub struct RacketPatch {
    pub product_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub grip_size: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// New product input
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub quantity_in_stock: i32,
    pub image_url: Option<String>,
    pub specifications: Option<serde_json::Value>,
}

/// Delta update for a product
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub image_url: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// Delta update for a user profile
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Filters for client listing
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Substring match on name, email, or phone
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring match on name, brand, or model
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Only products below this stock level
    pub below_stock: Option<i32>,
}

/// Filters for racket listing
#[derive(Debug, Clone, Default)]
pub struct RacketFilter {
    pub client_id: Option<Uuid>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for maintenance record listing
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub client_racket_id: Option<Uuid>,
    pub service_type: Option<ServiceType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Aggregated usage of one product across the five maintenance roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUsage {
    pub product_id: Uuid,
    pub name: String,
    pub brand: String,
    pub usage_count: i64,
}

/// Repository for data access operations
// Clone mirrors `DbPool`: available except under the `mock` feature, where
// `DatabaseConnection` (and thus `DbPool`) is not `Clone`.
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user account
    pub async fn create_user(
        &self,
        email: String,
        username: String,
        hashed_password: String,
        first_name: String,
        last_name: String,
        role: UserRole,
        phone_number: Option<String>,
    ) -> Result<User> {
        let now = Utc::now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            username: Set(username),
            hashed_password: Set(hashed_password),
            first_name: Set(first_name),
            last_name: Set(last_name),
            role: Set(String::from(role)),
            phone_number: Set(phone_number),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List users with pagination
    pub async fn list_users(
        &self,
        is_active: Option<bool>,
        params: PageParams,
    ) -> Result<Paginated<User>> {
        let mut query = UserEntity::find();

        if let Some(active) = is_active {
            query = query.filter(UserColumn::IsActive.eq(active));
        }

        let paginator = query
            .order_by_asc(UserColumn::Username)
            .paginate(self.read_conn(), params.limit);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(params.page.max(1) - 1).await?;

        Ok(Paginated::new(users, total, params))
    }

    /// Update user profile fields
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let mut user: UserActiveModel = self
            .find_user_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "User",
                id: id.to_string(),
            })?
            .into();

        if let Some(v) = patch.first_name {
            user.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            user.last_name = Set(v);
        }
        if let Some(v) = patch.phone_number {
            user.phone_number = Set(Some(v));
        }
        if let Some(v) = patch.role {
            user.role = Set(String::from(v));
        }
        if let Some(v) = patch.is_active {
            user.is_active = Set(v);
        }
        user.updated_at = Set(Utc::now().into());

        user.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Soft delete a user
    pub async fn deactivate_user(&self, id: Uuid) -> Result<()> {
        self.update_user(
            id,
            UserPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    // ========================================================================
    // Client Operations
    // ========================================================================

    /// Create a new client
    pub async fn create_client(&self, input: NewClient) -> Result<Client> {
        let client = Self::client_active_model(&input);
        client.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Create a client together with their rackets in one transaction
    pub async fn create_client_with_rackets(
        &self,
        input: NewClient,
        rackets: Vec<NewRacket>,
    ) -> Result<(Client, Vec<ClientRacket>)> {
        let txn = self.write_conn().begin().await?;

        let client = Self::client_active_model(&input).insert(&txn).await?;

        let mut created = Vec::with_capacity(rackets.len());
        for mut racket in rackets {
            racket.client_id = client.id;
            created.push(Self::racket_active_model(&racket).insert(&txn).await?);
        }

        txn.commit().await?;

        Ok((client, created))
    }

    fn client_active_model(input: &NewClient) -> ClientActiveModel {
        let now = Utc::now();
        ClientActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            email: Set(input.email.clone()),
            phone_number: Set(input.phone_number.clone()),
            date_of_birth: Set(input.date_of_birth),
            address_line1: Set(input.address_line1.clone()),
            address_line2: Set(input.address_line2.clone()),
            city: Set(input.city.clone()),
            postal_code: Set(input.postal_code.clone()),
            country: Set(input.country.clone()),
            notes: Set(input.notes.clone()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }

    /// Find client by ID
    pub async fn find_client_by_id(&self, id: Uuid) -> Result<Option<Client>> {
        ClientEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find client by email
    pub async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>> {
        ClientEntity::find()
            .filter(ClientColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List clients with search and pagination
    pub async fn list_clients(
        &self,
        filter: ClientFilter,
        params: PageParams,
    ) -> Result<Paginated<Client>> {
        let mut query = ClientEntity::find();

        if let Some(ref term) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(ClientColumn::FirstName.contains(term))
                    .add(ClientColumn::LastName.contains(term))
                    .add(ClientColumn::Email.contains(term))
                    .add(ClientColumn::PhoneNumber.contains(term)),
            );
        }

        if let Some(active) = filter.is_active {
            query = query.filter(ClientColumn::IsActive.eq(active));
        }

        let paginator = query
            .order_by_asc(ClientColumn::LastName)
            .order_by_asc(ClientColumn::FirstName)
            .paginate(self.read_conn(), params.limit);

        let total = paginator.num_items().await?;
        let clients = paginator.fetch_page(params.page.max(1) - 1).await?;

        Ok(Paginated::new(clients, total, params))
    }

    /// Update client fields
    pub async fn update_client(&self, id: Uuid, patch: ClientPatch) -> Result<Client> {
        let mut client: ClientActiveModel = self
            .find_client_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Client",
                id: id.to_string(),
            })?
            .into();

        if let Some(v) = patch.first_name {
            client.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            client.last_name = Set(v);
        }
        if let Some(v) = patch.email {
            client.email = Set(Some(v));
        }
        if let Some(v) = patch.phone_number {
            client.phone_number = Set(v);
        }
        if let Some(v) = patch.date_of_birth {
            client.date_of_birth = Set(Some(v));
        }
        if let Some(v) = patch.address_line1 {
            client.address_line1 = Set(Some(v));
        }
        if let Some(v) = patch.address_line2 {
            client.address_line2 = Set(Some(v));
        }
        if let Some(v) = patch.city {
            client.city = Set(Some(v));
        }
        if let Some(v) = patch.postal_code {
            client.postal_code = Set(Some(v));
        }
        if let Some(v) = patch.country {
            client.country = Set(Some(v));
        }
        if let Some(v) = patch.notes {
            client.notes = Set(Some(v));
        }
        if let Some(v) = patch.is_active {
            client.is_active = Set(v);
        }
        client.updated_at = Set(Utc::now().into());

        client.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Soft delete a client and cascade-deactivate their rackets.
    ///
    /// Maintenance history under those rackets is left untouched.
    pub async fn deactivate_client(&self, id: Uuid) -> Result<()> {
        let client = self.find_client_by_id(id).await?.ok_or(AppError::NotFound {
            resource: "Client",
            id: id.to_string(),
        })?;

        let txn = self.write_conn().begin().await?;
        let now = Utc::now();

        let mut active: ClientActiveModel = client.into();
        active.is_active = Set(false);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE client_rackets SET is_active = FALSE, updated_at = $1 WHERE client_id = $2",
            vec![chrono::DateTime::<chrono::FixedOffset>::from(now).into(), id.into()],
        );
        txn.execute(stmt).await?;

        txn.commit().await?;
        Ok(())
    }

    // ========================================================================
    // Product Category Operations
    // ========================================================================

    /// Create a new product category
    pub async fn create_category(
        &self,
        name: String,
        slug: String,
        description: Option<String>,
        sort_order: i32,
    ) -> Result<ProductCategory> {
        let now = Utc::now();

        let category = ProductCategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            sort_order: Set(sort_order),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        category.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find category by ID
    pub async fn find_category_by_id(&self, id: Uuid) -> Result<Option<ProductCategory>> {
        ProductCategoryEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a category matching either name or slug (for uniqueness checks)
    pub async fn find_category_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<Option<ProductCategory>> {
        ProductCategoryEntity::find()
            .filter(
                Condition::any()
                    .add(ProductCategoryColumn::Name.eq(name))
                    .add(ProductCategoryColumn::Slug.eq(slug)),
            )
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List active categories in display order
    pub async fn list_categories(&self) -> Result<Vec<ProductCategory>> {
        ProductCategoryEntity::find()
            .filter(ProductCategoryColumn::IsActive.eq(true))
            .order_by_asc(ProductCategoryColumn::SortOrder)
            .order_by_asc(ProductCategoryColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Update category fields
    pub async fn update_category(
        &self,
        id: Uuid,
        name: Option<String>,
        slug: Option<String>,
        description: Option<String>,
        sort_order: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<ProductCategory> {
        let mut category: ProductCategoryActiveModel = self
            .find_category_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Category",
                id: id.to_string(),
            })?
            .into();

        if let Some(v) = name {
            category.name = Set(v);
        }
        if let Some(v) = slug {
            category.slug = Set(v);
        }
        if let Some(v) = description {
            category.description = Set(Some(v));
        }
        if let Some(v) = sort_order {
            category.sort_order = Set(v);
        }
        if let Some(v) = is_active {
            category.is_active = Set(v);
        }
        category.updated_at = Set(Utc::now().into());

        category.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Soft delete a category
    pub async fn deactivate_category(&self, id: Uuid) -> Result<()> {
        self.update_category(id, None, None, None, None, Some(false))
            .await?;
        Ok(())
    }

    // ========================================================================
    // Product Operations
    // ========================================================================

    /// Create a new product
    pub async fn create_product(&self, input: NewProduct) -> Result<Product> {
        let now = Utc::now();

        let product = ProductActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            name: Set(input.name),
            brand: Set(input.brand),
            model: Set(input.model),
            sku: Set(input.sku),
            description: Set(input.description),
            price: Set(input.price),
            cost_price: Set(input.cost_price),
            quantity_in_stock: Set(input.quantity_in_stock),
            image_url: Set(input.image_url),
            specifications: Set(input.specifications),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        product.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find product by ID
    pub async fn find_product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        ProductEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find product by SKU
    pub async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        ProductEntity::find()
            .filter(ProductColumn::Sku.eq(sku))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List products with search, filters and pagination
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        params: PageParams,
    ) -> Result<Paginated<Product>> {
        let mut query = ProductEntity::find();

        if let Some(ref term) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(ProductColumn::Name.contains(term))
                    .add(ProductColumn::Brand.contains(term))
                    .add(ProductColumn::Model.contains(term)),
            );
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(ProductColumn::CategoryId.eq(category_id));
        }

        if let Some(active) = filter.is_active {
            query = query.filter(ProductColumn::IsActive.eq(active));
        }

        if let Some(threshold) = filter.below_stock {
            query = query.filter(ProductColumn::QuantityInStock.lt(threshold));
        }

        let paginator = query
            .order_by_asc(ProductColumn::Brand)
            .order_by_asc(ProductColumn::Name)
            .paginate(self.read_conn(), params.limit);

        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(params.page.max(1) - 1).await?;

        Ok(Paginated::new(products, total, params))
    }

    /// Active products with stock strictly below the threshold, lowest first
    pub async fn low_stock_products(&self, threshold: i32) -> Result<Vec<Product>> {
        ProductEntity::find()
            .filter(ProductColumn::QuantityInStock.lt(threshold))
            .filter(ProductColumn::IsActive.eq(true))
            .order_by_asc(ProductColumn::QuantityInStock)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Update product fields
    pub async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product> {
        let mut product: ProductActiveModel = self
            .find_product_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Product",
                id: id.to_string(),
            })?
            .into();

        if let Some(v) = patch.category_id {
            product.category_id = Set(v);
        }
        if let Some(v) = patch.name {
            product.name = Set(v);
        }
        if let Some(v) = patch.brand {
            product.brand = Set(v);
        }
        if let Some(v) = patch.model {
            product.model = Set(Some(v));
        }
        if let Some(v) = patch.sku {
            product.sku = Set(Some(v));
        }
        if let Some(v) = patch.description {
            product.description = Set(Some(v));
        }
        if let Some(v) = patch.price {
            product.price = Set(Some(v));
        }
        if let Some(v) = patch.cost_price {
            product.cost_price = Set(Some(v));
        }
        if let Some(v) = patch.quantity_in_stock {
            product.quantity_in_stock = Set(v);
        }
        if let Some(v) = patch.image_url {
            product.image_url = Set(Some(v));
        }
        if let Some(v) = patch.specifications {
            product.specifications = Set(Some(v));
        }
        if let Some(v) = patch.is_active {
            product.is_active = Set(v);
        }
        product.updated_at = Set(Utc::now().into());

        product.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Soft delete a product
    pub async fn deactivate_product(&self, id: Uuid) -> Result<()> {
        self.update_product(
            id,
            ProductPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    // ========================================================================
    // Client Racket Operations
    // ========================================================================

    /// Add a racket for a client
    pub async fn create_racket(&self, input: NewRacket) -> Result<ClientRacket> {
        Self::racket_active_model(&input)
            .insert(self.write_conn())
            .await
            .map_err(Into::into)
    }

    fn racket_active_model(input: &NewRacket) -> ClientRacketActiveModel {
        let now = Utc::now();
        ClientRacketActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(input.client_id),
            product_id: Set(input.product_id),
            custom_name: Set(input.custom_name.clone()),
            brand: Set(input.brand.clone()),
            model: Set(input.model.clone()),
            serial_number: Set(input.serial_number.clone()),
            purchase_date: Set(input.purchase_date),
            weight_unstrung: Set(input.weight_unstrung),
            grip_size: Set(input.grip_size.clone()),
            notes: Set(input.notes.clone()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }

    /// Find racket by ID
    pub async fn find_racket_by_id(&self, id: Uuid) -> Result<Option<ClientRacket>> {
        ClientRacketEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List rackets with filters and pagination
    pub async fn list_rackets(
        &self,
        filter: RacketFilter,
        params: PageParams,
    ) -> Result<Paginated<ClientRacket>> {
        let mut query = ClientRacketEntity::find();

        if let Some(client_id) = filter.client_id {
            query = query.filter(ClientRacketColumn::ClientId.eq(client_id));
        }

        if let Some(ref brand) = filter.brand {
            query = query.filter(ClientRacketColumn::Brand.contains(brand));
        }

        if let Some(active) = filter.is_active {
            query = query.filter(ClientRacketColumn::IsActive.eq(active));
        }

        let paginator = query
            .order_by_asc(ClientRacketColumn::Brand)
            .order_by_asc(ClientRacketColumn::Model)
            .paginate(self.read_conn(), params.limit);

        let total = paginator.num_items().await?;
        let rackets = paginator.fetch_page(params.page.max(1) - 1).await?;

        Ok(Paginated::new(rackets, total, params))
    }

    /// Update racket fields
    pub async fn update_racket(&self, id: Uuid, patch: RacketPatch) -> Result<ClientRacket> {
        let mut racket: ClientRacketActiveModel = self
            .find_racket_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Racket",
                id: id.to_string(),
            })?
            .into();

        if let Some(v) = patch.product_id {
            racket.product_id = Set(Some(v));
        }
        if let Some(v) = patch.custom_name {
            racket.custom_name = Set(Some(v));
        }
        if let Some(v) = patch.brand {
            racket.brand = Set(v);
        }
        if let Some(v) = patch.model {
            racket.model = Set(v);
        }
        if let Some(v) = patch.serial_number {
            racket.serial_number = Set(Some(v));
        }
        if let Some(v) = patch.purchase_date {
            racket.purchase_date = Set(Some(v));
        }
        if let Some(v) = patch.weight_unstrung {
            racket.weight_unstrung = Set(Some(v));
        }
        if let Some(v) = patch.grip_size {
            racket.grip_size = Set(v);
        }
        if let Some(v) = patch.notes {
            racket.notes = Set(Some(v));
        }
        if let Some(v) = patch.is_active {
            racket.is_active = Set(v);
        }
        racket.updated_at = Set(Utc::now().into());

        racket.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Soft delete a racket
    pub async fn deactivate_racket(&self, id: Uuid) -> Result<()> {
        self.update_racket(
            id,
            RacketPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }

    // ========================================================================
    // Maintenance Record Operations
    // ========================================================================

    /// Persist a fully-validated maintenance record.
    ///
    /// Optional stock depletions run inside the same transaction: either
    /// the record and every stock adjustment commit, or nothing does.
    pub async fn insert_maintenance_record(
        &self,
        record: MaintenanceRecordActiveModel,
        depletions: &[(Uuid, i32)],
    ) -> Result<MaintenanceRecord> {
        let txn = self.write_conn().begin().await?;

        let model = record.insert(&txn).await?;

        for (product_id, quantity) in depletions {
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                UPDATE products
                SET quantity_in_stock = GREATEST(quantity_in_stock - $1, 0),
                    updated_at = NOW()
                WHERE id = $2
                "#,
                vec![(*quantity).into(), (*product_id).into()],
            );
            txn.execute(stmt).await?;
        }

        txn.commit().await?;

        Ok(model)
    }

    /// Apply a column-selective update built by the maintenance workflow
    pub async fn update_maintenance_record(
        &self,
        record: MaintenanceRecordActiveModel,
    ) -> Result<MaintenanceRecord> {
        record.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Find maintenance record by ID
    pub async fn find_record_by_id(&self, id: Uuid) -> Result<Option<MaintenanceRecord>> {
        MaintenanceRecordEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List maintenance records with filters and pagination
    pub async fn list_records(
        &self,
        filter: RecordFilter,
        params: PageParams,
    ) -> Result<Paginated<MaintenanceRecord>> {
        let mut query =
            MaintenanceRecordEntity::find().filter(MaintenanceRecordColumn::IsActive.eq(true));

        if let Some(racket_id) = filter.client_racket_id {
            query = query.filter(MaintenanceRecordColumn::ClientRacketId.eq(racket_id));
        }

        if let Some(service_type) = filter.service_type {
            query =
                query.filter(MaintenanceRecordColumn::ServiceType.eq(String::from(service_type)));
        }

        if let Some(from) = filter.date_from {
            let start = from.and_time(NaiveTime::MIN).and_utc().fixed_offset();
            query = query.filter(MaintenanceRecordColumn::ServiceDate.gte(start));
        }

        if let Some(to) = filter.date_to {
            // Exclusive upper bound at the start of the following day
            let end = to
                .succ_opt()
                .unwrap_or(to)
                .and_time(NaiveTime::MIN)
                .and_utc()
                .fixed_offset();
            query = query.filter(MaintenanceRecordColumn::ServiceDate.lt(end));
        }

        let paginator = query
            .order_by_desc(MaintenanceRecordColumn::ServiceDate)
            .order_by_asc(MaintenanceRecordColumn::Id)
            .paginate(self.read_conn(), params.limit);

        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(params.page.max(1) - 1).await?;

        Ok(Paginated::new(records, total, params))
    }

    /// Soft delete a maintenance record
    pub async fn deactivate_record(&self, id: Uuid) -> Result<()> {
        let mut record: MaintenanceRecordActiveModel = self
            .find_record_by_id(id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Maintenance record",
                id: id.to_string(),
            })?
            .into();

        record.is_active = Set(false);
        record.updated_at = Set(Utc::now().into());
        record.update(self.write_conn()).await?;
        Ok(())
    }

    // ========================================================================
    // Reporting (read-only)
    // ========================================================================

    /// Full maintenance history for a racket, most recent first.
    ///
    /// Ties on service_date are broken by id so the order is stable.
    /// Returns an empty vec when the racket has no history.
    pub async fn history_for_racket(&self, racket_id: Uuid) -> Result<Vec<MaintenanceRecord>> {
        MaintenanceRecordEntity::find()
            .filter(MaintenanceRecordColumn::ClientRacketId.eq(racket_id))
            .filter(MaintenanceRecordColumn::IsActive.eq(true))
            .order_by_desc(MaintenanceRecordColumn::ServiceDate)
            .order_by_asc(MaintenanceRecordColumn::Id)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count maintenance references per product across all five roles
    pub async fn product_usage_counts(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<ProductUsage>> {
        let mut values: Vec<sea_orm::Value> = Vec::new();
        let mut date_filter = String::new();

        if let Some(from) = date_from {
            let start = from.and_time(NaiveTime::MIN).and_utc().fixed_offset();
            values.push(start.into());
            date_filter.push_str(&format!(" AND refs.service_date >= ${}", values.len()));
        }

        if let Some(to) = date_to {
            let end = to
                .succ_opt()
                .unwrap_or(to)
                .and_time(NaiveTime::MIN)
                .and_utc()
                .fixed_offset();
            values.push(end.into());
            date_filter.push_str(&format!(" AND refs.service_date < ${}", values.len()));
        }

        let sql = format!(
            r#"
            SELECT p.id, p.name, p.brand, COUNT(*) AS usage_count
            FROM (
                SELECT main_string_id AS product_id, service_date
                    FROM maintenance_records WHERE is_active = TRUE
                UNION ALL
                SELECT cross_string_id, service_date
                    FROM maintenance_records WHERE is_active = TRUE
                UNION ALL
                SELECT base_grip_id, service_date
                    FROM maintenance_records WHERE is_active = TRUE
                UNION ALL
                SELECT overgrip_id, service_date
                    FROM maintenance_records WHERE is_active = TRUE
                UNION ALL
                SELECT dampener_id, service_date
                    FROM maintenance_records WHERE is_active = TRUE
            ) refs
            JOIN products p ON p.id = refs.product_id
            WHERE refs.product_id IS NOT NULL
            {}
            GROUP BY p.id, p.name, p.brand
            ORDER BY usage_count DESC, p.name ASC
            "#,
            date_filter
        );

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, &sql, values);

        let results = self
            .read_conn()
            .query_all(stmt)
            .await?
            .into_iter()
            .filter_map(|row| {
                Some(ProductUsage {
                    product_id: row.try_get_by_index::<Uuid>(0).ok()?,
                    name: row.try_get_by_index::<String>(1).ok()?,
                    brand: row.try_get_by_index::<String>(2).ok()?,
                    usage_count: row.try_get_by_index::<i64>(3).ok()?,
                })
            })
            .collect();

        Ok(results)
    }
}
