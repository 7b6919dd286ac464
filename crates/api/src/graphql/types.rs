//! GraphQL input and payload types.
//!
//! Customer inputs carry plain strings for email and phone so that a
//! malformed value in one bulk candidate is reported as that candidate's
//! rejection instead of failing the whole request during input coercion.

use async_graphql::{ComplexObject, Context, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use coral_core::{CustomerId, ProductId};

use super::{internal_error, store};
use crate::db::{CustomerFilter, OrderFilter, ProductFilter};
use crate::models::{Customer, Order, Product};
use crate::services::{BulkCreateOutcome, CustomerDraft, OrderDraft, ProductDraft};

// =============================================================================
// Mutation inputs
// =============================================================================

/// A customer candidate for `createCustomer` and `bulkCreateCustomers`.
#[derive(Debug, Clone, InputObject)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerInput> for CustomerDraft {
    fn from(input: CustomerInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
        }
    }
}

/// Input for `createProduct`.
#[derive(Debug, Clone, InputObject)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock: Option<i32>,
}

impl From<ProductInput> for ProductDraft {
    fn from(input: ProductInput) -> Self {
        Self {
            name: input.name,
            price: input.price,
            stock: input.stock,
        }
    }
}

/// Input for `createOrder`.
#[derive(Debug, Clone, InputObject)]
pub struct OrderInput {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
}

impl From<OrderInput> for OrderDraft {
    fn from(input: OrderInput) -> Self {
        Self {
            customer_id: input.customer_id,
            product_ids: input.product_ids,
        }
    }
}

// =============================================================================
// Query filters
// =============================================================================

/// Filter for `allCustomers`.
#[derive(Debug, Clone, Default, InputObject)]
pub struct CustomerFilterInput {
    pub name_contains: Option<String>,
    pub phone_starts_with: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
}

impl From<CustomerFilterInput> for CustomerFilter {
    fn from(input: CustomerFilterInput) -> Self {
        Self {
            name_contains: input.name_contains,
            phone_starts_with: input.phone_starts_with,
            created_at_gte: input.created_at_gte,
            created_at_lte: input.created_at_lte,
        }
    }
}

/// Filter for `allProducts`.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilterInput {
    pub name_contains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    pub low_stock_below: Option<i32>,
}

impl From<ProductFilterInput> for ProductFilter {
    fn from(input: ProductFilterInput) -> Self {
        Self {
            name_contains: input.name_contains,
            price_gte: input.price_gte,
            price_lte: input.price_lte,
            stock_gte: input.stock_gte,
            stock_lte: input.stock_lte,
            low_stock_below: input.low_stock_below,
        }
    }
}

/// Filter for `allOrders`.
#[derive(Debug, Clone, Default, InputObject)]
pub struct OrderFilterInput {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    pub customer_id: Option<CustomerId>,
    pub product_id: Option<ProductId>,
}

impl From<OrderFilterInput> for OrderFilter {
    fn from(input: OrderFilterInput) -> Self {
        Self {
            total_amount_gte: input.total_amount_gte,
            total_amount_lte: input.total_amount_lte,
            order_date_gte: input.order_date_gte,
            order_date_lte: input.order_date_lte,
            customer_id: input.customer_id,
            product_id: input.product_id,
        }
    }
}

// =============================================================================
// Mutation payloads
// =============================================================================

/// Result of `createCustomer`. Exactly one of `customer` and `error` is set.
#[derive(Debug, SimpleObject)]
pub struct CreateCustomerPayload {
    pub customer: Option<Customer>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl CreateCustomerPayload {
    pub(crate) fn ok(customer: Customer) -> Self {
        Self {
            customer: Some(customer),
            message: Some("Customer created successfully.".to_owned()),
            error: None,
        }
    }

    pub(crate) const fn err(error: String) -> Self {
        Self {
            customer: None,
            message: None,
            error: Some(error),
        }
    }
}

/// Result of `bulkCreateCustomers`: persisted customers plus one message per
/// rejected candidate.
#[derive(Debug, SimpleObject)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

impl From<BulkCreateOutcome> for BulkCreateCustomersPayload {
    fn from(outcome: BulkCreateOutcome) -> Self {
        Self {
            customers: outcome.created,
            errors: outcome.rejections,
        }
    }
}

/// Result of `createProduct`. Exactly one of `product` and `error` is set.
#[derive(Debug, SimpleObject)]
pub struct CreateProductPayload {
    pub product: Option<Product>,
    pub error: Option<String>,
}

impl CreateProductPayload {
    pub(crate) fn ok(product: Product) -> Self {
        Self {
            product: Some(product),
            error: None,
        }
    }

    pub(crate) const fn err(error: String) -> Self {
        Self {
            product: None,
            error: Some(error),
        }
    }
}

/// Result of `createOrder`. Exactly one of `order` and `error` is set.
#[derive(Debug, SimpleObject)]
pub struct CreateOrderPayload {
    pub order: Option<Order>,
    pub error: Option<String>,
}

impl CreateOrderPayload {
    pub(crate) fn ok(order: Order) -> Self {
        Self {
            order: Some(order),
            error: None,
        }
    }

    pub(crate) const fn err(error: String) -> Self {
        Self {
            order: None,
            error: Some(error),
        }
    }
}

// =============================================================================
// Order associations
// =============================================================================

#[ComplexObject]
impl Order {
    /// The customer who placed the order.
    async fn customer(&self, ctx: &Context<'_>) -> async_graphql::Result<Customer> {
        let store = store(ctx)?;
        store
            .customer(self.customer_id)
            .await
            .map_err(internal_error)?
            .ok_or_else(|| async_graphql::Error::new("Invalid customer ID."))
    }

    /// The products in the order, in the order they were selected.
    async fn products(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Product>> {
        let store = store(ctx)?;
        store
            .products_by_ids(&self.product_ids)
            .await
            .map_err(internal_error)
    }
}
