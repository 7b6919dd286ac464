//! Order composition.

use std::collections::HashSet;

use rust_decimal::Decimal;

use coral_core::{CustomerId, ProductId};

use super::ServiceError;
use crate::db::CrmStore;
use crate::models::{NewOrder, Order};

/// An unvalidated order as submitted by a caller.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
}

/// Order mutation service.
pub struct OrderService<'a> {
    store: &'a dyn CrmStore,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a dyn CrmStore) -> Self {
        Self { store }
    }

    /// Compose and persist an order, fail-fast.
    ///
    /// Checks run in a fixed order: customer existence, then the
    /// non-empty-list rule, then product resolution. Every requested product
    /// id must resolve; a partial match fails the whole order. The total is
    /// the exact decimal sum of the resolved prices, and the order plus its
    /// product links are persisted atomically.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown customer or product ids,
    /// `InvalidInput` for an empty product list, and `Store` when the store
    /// fails.
    pub async fn create(&self, draft: OrderDraft) -> Result<Order, ServiceError> {
        let customer = self
            .store
            .customer(draft.customer_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Invalid customer ID.".to_owned()))?;

        if draft.product_ids.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one product is required.".to_owned(),
            ));
        }

        let product_ids = dedup_preserving_order(&draft.product_ids);
        let products = self.store.products_by_ids(&product_ids).await?;

        if products.len() != product_ids.len() {
            let found: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
            let missing: Vec<String> = product_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(ToString::to_string)
                .collect();
            return Err(ServiceError::NotFound(format!(
                "Invalid product ID(s): {}.",
                missing.join(", ")
            )));
        }

        let total_amount: Decimal = products.iter().map(|p| p.price).sum();

        let order = self
            .store
            .insert_order(NewOrder {
                customer_id: customer.id,
                product_ids,
                total_amount,
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            total_amount = %order.total_amount,
            "order created"
        );

        Ok(order)
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
fn dedup_preserving_order(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .copied()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::db::MemoryStore;
    use crate::models::NewProduct;

    use super::*;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn seed_customer(store: &MemoryStore) -> CustomerId {
        let customer = store
            .insert_customer(crate::models::NewCustomer {
                name: "Alice".to_owned(),
                email: coral_core::Email::parse("alice@example.com").unwrap(),
                phone: None,
            })
            .await
            .unwrap();
        customer.id
    }

    async fn seed_product(store: &MemoryStore, name: &str, price: &str) -> ProductId {
        let product = store
            .insert_product(NewProduct {
                name: name.to_owned(),
                price: decimal(price),
                stock: 10,
            })
            .await
            .unwrap();
        product.id
    }

    #[tokio::test]
    async fn test_total_is_exact_decimal_sum() {
        let store = MemoryStore::new();
        let customer_id = seed_customer(&store).await;
        let a = seed_product(&store, "A", "19.99").await;
        let b = seed_product(&store, "B", "5.00").await;
        let c = seed_product(&store, "C", "0.02").await;

        let service = OrderService::new(&store);
        let order = service
            .create(OrderDraft {
                customer_id,
                product_ids: vec![a, b, c],
            })
            .await
            .unwrap();

        assert_eq!(order.total_amount, decimal("25.01"));
        assert_eq!(order.product_ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_unknown_customer_fails_without_mutation() {
        let store = MemoryStore::new();
        let product_id = seed_product(&store, "A", "19.99").await;

        let service = OrderService::new(&store);
        let err = service
            .create(OrderDraft {
                customer_id: CustomerId::new(999),
                product_ids: vec![product_id],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.client_message(), "Invalid customer ID.");
        assert!(store.orders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_product_list_fails_before_product_lookup() {
        let store = MemoryStore::new();
        let customer_id = seed_customer(&store).await;

        let service = OrderService::new(&store);
        let err = service
            .create(OrderDraft {
                customer_id,
                product_ids: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(err.client_message(), "At least one product is required.");
        assert!(store.orders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_customer_check_precedes_empty_list_check() {
        let store = MemoryStore::new();

        let service = OrderService::new(&store);
        let err = service
            .create(OrderDraft {
                customer_id: CustomerId::new(1),
                product_ids: Vec::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.client_message(), "Invalid customer ID.");
    }

    #[tokio::test]
    async fn test_partial_resolution_fails_naming_missing_ids() {
        let store = MemoryStore::new();
        let customer_id = seed_customer(&store).await;
        let known = seed_product(&store, "A", "19.99").await;

        let service = OrderService::new(&store);
        let err = service
            .create(OrderDraft {
                customer_id,
                product_ids: vec![known, ProductId::new(41), ProductId::new(42)],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.client_message(), "Invalid product ID(s): 41, 42.");
        assert!(store.orders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_product_ids_count_once() {
        let store = MemoryStore::new();
        let customer_id = seed_customer(&store).await;
        let a = seed_product(&store, "A", "10.00").await;

        let service = OrderService::new(&store);
        let order = service
            .create(OrderDraft {
                customer_id,
                product_ids: vec![a, a, a],
            })
            .await
            .unwrap();

        assert_eq!(order.total_amount, decimal("10.00"));
        assert_eq!(order.product_ids, vec![a]);
    }

    #[tokio::test]
    async fn test_single_product_order() {
        let store = MemoryStore::new();
        let customer_id = seed_customer(&store).await;
        let a = seed_product(&store, "A", "0.99").await;

        let service = OrderService::new(&store);
        let order = service
            .create(OrderDraft {
                customer_id,
                product_ids: vec![a],
            })
            .await
            .unwrap();

        assert_eq!(order.total_amount, decimal("0.99"));
        assert_eq!(order.customer_id, customer_id);
    }
}
