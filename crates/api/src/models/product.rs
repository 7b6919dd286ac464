//! Product records.

use async_graphql::SimpleObject;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coral_core::ProductId;

/// A stored product.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price. Always positive.
    pub price: Decimal,
    /// Units on hand. Never negative.
    pub stock: i32,
}

/// A validated product, ready to persist.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}
