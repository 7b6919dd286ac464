//! In-memory implementation of [`CrmStore`].
//!
//! Backs the test suite and local development without `PostgreSQL`. It
//! mirrors the database semantics the services rely on: unique customer
//! emails, all-or-nothing bulk inserts, and atomic order+association writes.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use coral_core::{CustomerId, Email, OrderId, ProductId};

use super::{CrmStore, CustomerFilter, OrderFilter, ProductFilter, StoreError};
use crate::models::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    next_customer_id: i32,
    next_product_id: i32,
    next_order_id: i32,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            customers: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
            next_customer_id: 1,
            next_product_id: 1,
            next_order_id: 1,
        }
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::DataCorruption("store mutex poisoned".to_owned()))
    }
}

impl Inner {
    fn has_email(&self, email: &Email) -> bool {
        self.customers.iter().any(|c| &c.email == email)
    }

    fn push_customer(&mut self, new: NewCustomer) -> Customer {
        let customer = Customer {
            id: CustomerId::new(self.next_customer_id),
            name: new.name,
            email: new.email,
            phone: new.phone,
            created_at: Utc::now(),
        };
        self.next_customer_id += 1;
        self.customers.push(customer.clone());
        customer
    }
}

#[async_trait]
impl CrmStore for MemoryStore {
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let inner = self.locked()?;
        Ok(inner.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn customer_by_email(&self, email: &Email) -> Result<Option<Customer>, StoreError> {
        let inner = self.locked()?;
        Ok(inner.customers.iter().find(|c| &c.email == email).cloned())
    }

    async fn customers(
        &self,
        filter: Option<&CustomerFilter>,
    ) -> Result<Vec<Customer>, StoreError> {
        let inner = self.locked()?;
        Ok(inner
            .customers
            .iter()
            .filter(|c| filter.is_none_or(|f| f.matches(c)))
            .cloned()
            .collect())
    }

    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let mut inner = self.locked()?;
        if inner.has_email(&new.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already exists",
                new.email
            )));
        }
        Ok(inner.push_customer(new))
    }

    async fn insert_customers(&self, new: Vec<NewCustomer>) -> Result<Vec<Customer>, StoreError> {
        let mut inner = self.locked()?;

        // All-or-nothing: check the whole batch before touching the data,
        // including duplicates within the batch itself.
        for (pos, candidate) in new.iter().enumerate() {
            let dup_in_batch = new
                .iter()
                .take(pos)
                .any(|earlier| earlier.email == candidate.email);
            if dup_in_batch || inner.has_email(&candidate.email) {
                return Err(StoreError::Conflict(format!(
                    "email {} already exists",
                    candidate.email
                )));
            }
        }

        Ok(new.into_iter().map(|c| inner.push_customer(c)).collect())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let inner = self.locked()?;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let inner = self.locked()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.iter().find(|p| p.id == *id).cloned())
            .collect())
    }

    async fn products(&self, filter: Option<&ProductFilter>) -> Result<Vec<Product>, StoreError> {
        let inner = self.locked()?;
        Ok(inner
            .products
            .iter()
            .filter(|p| filter.is_none_or(|f| f.matches(p)))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.locked()?;
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            name: new.name,
            price: new.price,
            stock: new.stock,
        };
        inner.next_product_id += 1;
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let inner = self.locked()?;
        Ok(inner.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn orders(&self, filter: Option<&OrderFilter>) -> Result<Vec<Order>, StoreError> {
        let inner = self.locked()?;
        Ok(inner
            .orders
            .iter()
            .filter(|o| filter.is_none_or(|f| f.matches(o)))
            .cloned()
            .collect())
    }

    async fn insert_order(&self, new: NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.locked()?;
        let order = Order {
            id: OrderId::new(inner.next_order_id),
            customer_id: new.customer_id,
            product_ids: new.product_ids,
            total_amount: new.total_amount,
            order_date: Utc::now(),
        };
        inner.next_order_id += 1;
        inner.orders.push(order.clone());
        Ok(order)
    }
}
