//! Product creation.

use rust_decimal::Decimal;

use super::{ServiceError, validate};
use crate::db::CrmStore;
use crate::models::{NewProduct, Product};

/// An unvalidated product as submitted by a caller.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    /// Defaults to 0 when omitted.
    pub stock: Option<i32>,
}

/// Product mutation service.
pub struct ProductService<'a> {
    store: &'a dyn CrmStore,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(store: &'a dyn CrmStore) -> Self {
        Self { store }
    }

    /// Create a product, fail-fast.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, non-positive price, or
    /// negative stock; `Store` when the store fails.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        validate::validate_name(&draft.name)?;
        validate::validate_price(draft.price)?;
        let stock = draft.stock.unwrap_or(0);
        validate::validate_stock(stock)?;

        let product = self
            .store
            .insert_product(NewProduct {
                name: draft.name,
                price: draft.price,
                stock,
            })
            .await?;
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::db::MemoryStore;

    use super::*;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_product_defaults_stock_to_zero() {
        let store = MemoryStore::new();
        let service = ProductService::new(&store);

        let product = service
            .create(ProductDraft {
                name: "Widget".to_owned(),
                price: decimal("19.99"),
                stock: None,
            })
            .await
            .unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.price, decimal("19.99"));
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_price() {
        let store = MemoryStore::new();
        let service = ProductService::new(&store);

        let err = service
            .create(ProductDraft {
                name: "Widget".to_owned(),
                price: decimal("-1"),
                stock: Some(5),
            })
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Price must be positive.");
        assert!(store.products(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_rejects_zero_price() {
        let store = MemoryStore::new();
        let service = ProductService::new(&store);

        let err = service
            .create(ProductDraft {
                name: "Widget".to_owned(),
                price: Decimal::ZERO,
                stock: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Price must be positive.");
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_stock() {
        let store = MemoryStore::new();
        let service = ProductService::new(&store);

        let err = service
            .create(ProductDraft {
                name: "Widget".to_owned(),
                price: decimal("19.99"),
                stock: Some(-3),
            })
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Stock cannot be negative.");
        assert!(store.products(None).await.unwrap().is_empty());
    }
}
