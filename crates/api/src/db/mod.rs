//! The entity store for CRM records.
//!
//! All mutation and query logic talks to storage through the [`CrmStore`]
//! trait, so the services can be exercised against the in-memory
//! implementation in tests while production runs on `PostgreSQL`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p coral-cli -- migrate
//! ```

pub mod filter;
pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use filter::{CustomerFilter, OrderFilter, ProductFilter};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use coral_core::{CustomerId, Email, OrderId, ProductId};

use crate::models::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage interface for CRM entities.
///
/// Bulk and multi-row operations are atomic: either every row written by a
/// single call becomes visible, or none do. The store's uniqueness
/// constraint on customer email is the final arbiter for concurrent
/// requests racing to register the same address.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Fetch a customer by id.
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Fetch a customer by email.
    async fn customer_by_email(&self, email: &Email) -> Result<Option<Customer>, StoreError>;

    /// List customers, optionally filtered.
    async fn customers(
        &self,
        filter: Option<&CustomerFilter>,
    ) -> Result<Vec<Customer>, StoreError>;

    /// Insert a single customer.
    ///
    /// Returns [`StoreError::Conflict`] if the email is already registered.
    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError>;

    /// Insert a batch of customers atomically.
    ///
    /// Returns [`StoreError::Conflict`] without persisting anything if any
    /// candidate's email is already registered.
    async fn insert_customers(&self, new: Vec<NewCustomer>) -> Result<Vec<Customer>, StoreError>;

    /// Fetch a product by id.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Fetch the products matching the given ids. Missing ids are omitted
    /// from the result; callers decide whether a partial match is an error.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// List products, optionally filtered.
    async fn products(&self, filter: Option<&ProductFilter>) -> Result<Vec<Product>, StoreError>;

    /// Insert a product.
    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError>;

    /// Fetch an order by id, including its product associations.
    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// List orders, optionally filtered.
    async fn orders(&self, filter: Option<&OrderFilter>) -> Result<Vec<Order>, StoreError>;

    /// Insert an order and its product associations atomically.
    ///
    /// The order row and its links become visible together or not at all.
    /// The store sets `order_date` at insertion time.
    async fn insert_order(&self, new: NewOrder) -> Result<Order, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
