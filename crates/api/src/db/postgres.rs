//! `PostgreSQL` implementation of [`CrmStore`].
//!
//! # Tables
//!
//! - `customers` - unique index on `email`
//! - `products`
//! - `orders` - `customer_id` foreign key, `order_date` defaulted by the
//!   database at insert time
//! - `order_products` - order/product association rows
//!
//! Bulk customer inserts and order creation run inside transactions so a
//! constraint violation rolls back the whole call.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use coral_core::{CustomerId, Email, OrderId, ProductId};

use super::{CrmStore, CustomerFilter, OrderFilter, ProductFilter, StoreError};
use crate::models::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};

/// `PostgreSQL`-backed entity store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Row shape for the `orders` table; product ids are joined in separately.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, product_ids: Vec<ProductId>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            product_ids,
            total_amount: self.total_amount,
            order_date: self.order_date,
        }
    }
}

impl PgStore {
    /// Create a store backed by the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the product ids associated with each of the given orders.
    async fn product_ids_for(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<OrderId, Vec<ProductId>>, StoreError> {
        let links: Vec<(OrderId, ProductId)> = sqlx::query_as(
            "SELECT order_id, product_id FROM order_products \
             WHERE order_id = ANY($1) ORDER BY order_id, product_id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<ProductId>> = HashMap::new();
        for (order_id, product_id) in links {
            by_order.entry(order_id).or_default().push(product_id);
        }
        Ok(by_order)
    }
}

#[async_trait]
impl CrmStore for PgStore {
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn customer_by_email(&self, email: &Email) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn customers(
        &self,
        filter: Option<&CustomerFilter>,
    ) -> Result<Vec<Customer>, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, email, phone, created_at FROM customers WHERE 1=1");
        if let Some(f) = filter {
            if let Some(ref needle) = f.name_contains {
                qb.push(" AND name ILIKE ");
                qb.push_bind(like_pattern(needle));
            }
            if let Some(ref prefix) = f.phone_starts_with {
                qb.push(" AND phone LIKE ");
                qb.push_bind(format!("{}%", escape_like(prefix)));
            }
            if let Some(gte) = f.created_at_gte {
                qb.push(" AND created_at >= ");
                qb.push_bind(gte);
            }
            if let Some(lte) = f.created_at_lte {
                qb.push(" AND created_at <= ");
                qb.push_bind(lte);
            }
        }
        qb.push(" ORDER BY id");

        let rows = qb.build_query_as::<Customer>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let email = new.email.clone();
        let row = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, email, phone) VALUES ($1, $2, $3) \
             RETURNING id, name, email, phone, created_at",
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, &email))?;
        Ok(row)
    }

    async fn insert_customers(&self, new: Vec<NewCustomer>) -> Result<Vec<Customer>, StoreError> {
        if new.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(new.len());
        for candidate in new {
            let email = candidate.email.clone();
            let row = sqlx::query_as::<_, Customer>(
                "INSERT INTO customers (name, email, phone) VALUES ($1, $2, $3) \
                 RETURNING id, name, email, phone, created_at",
            )
            .bind(candidate.name)
            .bind(candidate.email)
            .bind(candidate.phone)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, &email))?;
            created.push(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = ANY($1) ORDER BY id",
        )
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn products(&self, filter: Option<&ProductFilter>) -> Result<Vec<Product>, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, price, stock FROM products WHERE 1=1");
        if let Some(f) = filter {
            if let Some(ref needle) = f.name_contains {
                qb.push(" AND name ILIKE ");
                qb.push_bind(like_pattern(needle));
            }
            if let Some(gte) = f.price_gte {
                qb.push(" AND price >= ");
                qb.push_bind(gte);
            }
            if let Some(lte) = f.price_lte {
                qb.push(" AND price <= ");
                qb.push_bind(lte);
            }
            if let Some(gte) = f.stock_gte {
                qb.push(" AND stock >= ");
                qb.push_bind(gte);
            }
            if let Some(lte) = f.stock_lte {
                qb.push(" AND stock <= ");
                qb.push_bind(lte);
            }
            if let Some(below) = f.low_stock_below {
                qb.push(" AND stock < ");
                qb.push_bind(below);
            }
        }
        qb.push(" ORDER BY id");

        let rows = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, stock) VALUES ($1, $2, $3) \
             RETURNING id, name, price, stock",
        )
        .bind(new.name)
        .bind(new.price)
        .bind(new.stock)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, total_amount, order_date FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut by_order = self.product_ids_for(&[row.id.as_i32()]).await?;
                let product_ids = by_order.remove(&row.id).unwrap_or_default();
                Ok(Some(row.into_order(product_ids)))
            }
            None => Ok(None),
        }
    }

    async fn orders(&self, filter: Option<&OrderFilter>) -> Result<Vec<Order>, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, customer_id, total_amount, order_date FROM orders WHERE 1=1");
        if let Some(f) = filter {
            if let Some(gte) = f.total_amount_gte {
                qb.push(" AND total_amount >= ");
                qb.push_bind(gte);
            }
            if let Some(lte) = f.total_amount_lte {
                qb.push(" AND total_amount <= ");
                qb.push_bind(lte);
            }
            if let Some(gte) = f.order_date_gte {
                qb.push(" AND order_date >= ");
                qb.push_bind(gte);
            }
            if let Some(lte) = f.order_date_lte {
                qb.push(" AND order_date <= ");
                qb.push_bind(lte);
            }
            if let Some(customer_id) = f.customer_id {
                qb.push(" AND customer_id = ");
                qb.push_bind(customer_id);
            }
            if let Some(product_id) = f.product_id {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM order_products op \
                     WHERE op.order_id = orders.id AND op.product_id = ",
                );
                qb.push_bind(product_id);
                qb.push(")");
            }
        }
        qb.push(" ORDER BY id");

        let rows = qb.build_query_as::<OrderRow>().fetch_all(&self.pool).await?;
        let order_ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let mut by_order = self.product_ids_for(&order_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_ids = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(product_ids)
            })
            .collect())
    }

    async fn insert_order(&self, new: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (customer_id, total_amount) VALUES ($1, $2) \
             RETURNING id, customer_id, total_amount, order_date",
        )
        .bind(new.customer_id)
        .bind(new.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let raw_ids: Vec<i32> = new.product_ids.iter().map(|id| id.as_i32()).collect();
        sqlx::query(
            "INSERT INTO order_products (order_id, product_id) \
             SELECT $1, unnest($2::int4[])",
        )
        .bind(row.id)
        .bind(raw_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into_order(new.product_ids))
    }
}

/// Map a unique violation onto [`StoreError::Conflict`].
fn conflict_on_unique(e: sqlx::Error, email: &Email) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("email {email} already exists"));
    }
    StoreError::Database(e)
}

/// Escape LIKE metacharacters in user-supplied fragments.
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn like_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like(fragment))
}
