//! Order records.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coral_core::{CustomerId, OrderId, ProductId};

/// A stored order.
///
/// `total_amount` is fixed at creation time as the sum of the associated
/// product prices. It is never supplied by callers and never recomputed.
///
/// The `customer` and `products` GraphQL fields are resolved through the
/// store; see the complex-object impl in [`crate::graphql::types`].
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[graphql(complex)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[graphql(skip)]
    pub product_ids: Vec<ProductId>,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

/// A validated order, ready to persist together with its product links.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    pub total_amount: Decimal,
}
