//! Customer records.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coral_core::{CustomerId, Email, Phone};

/// A stored customer.
///
/// Customers are immutable once created; the email is unique across the
/// store and serves as the dedup key during bulk import.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub created_at: DateTime<Utc>,
}

/// A validated customer candidate, ready to persist.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
}
