//! Query filters for entity listings.
//!
//! Each filter is a bag of optional predicates combined with AND. The
//! in-memory store evaluates them with the `matches` methods here; the
//! `PostgreSQL` store translates them to `WHERE` clauses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use coral_core::{CustomerId, ProductId};

use crate::models::{Customer, Order, Product};

/// Predicates over customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
    /// Prefix match on the phone number.
    pub phone_starts_with: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
}

impl CustomerFilter {
    /// Whether a customer satisfies every set predicate.
    #[must_use]
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(ref needle) = self.name_contains
            && !contains_ci(&customer.name, needle)
        {
            return false;
        }
        if let Some(ref prefix) = self.phone_starts_with
            && !customer
                .phone
                .as_ref()
                .is_some_and(|p| p.as_str().starts_with(prefix.as_str()))
        {
            return false;
        }
        if let Some(gte) = self.created_at_gte
            && customer.created_at < gte
        {
            return false;
        }
        if let Some(lte) = self.created_at_lte
            && customer.created_at > lte
        {
            return false;
        }
        true
    }
}

/// Predicates over product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// Products with stock strictly below this threshold.
    pub low_stock_below: Option<i32>,
}

impl ProductFilter {
    /// Whether a product satisfies every set predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref needle) = self.name_contains
            && !contains_ci(&product.name, needle)
        {
            return false;
        }
        if let Some(gte) = self.price_gte
            && product.price < gte
        {
            return false;
        }
        if let Some(lte) = self.price_lte
            && product.price > lte
        {
            return false;
        }
        if let Some(gte) = self.stock_gte
            && product.stock < gte
        {
            return false;
        }
        if let Some(lte) = self.stock_lte
            && product.stock > lte
        {
            return false;
        }
        if let Some(below) = self.low_stock_below
            && product.stock >= below
        {
            return false;
        }
        true
    }
}

/// Predicates over order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Orders placed by this customer.
    pub customer_id: Option<CustomerId>,
    /// Orders containing this product.
    pub product_id: Option<ProductId>,
}

impl OrderFilter {
    /// Whether an order satisfies every set predicate.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(gte) = self.total_amount_gte
            && order.total_amount < gte
        {
            return false;
        }
        if let Some(lte) = self.total_amount_lte
            && order.total_amount > lte
        {
            return false;
        }
        if let Some(gte) = self.order_date_gte
            && order.order_date < gte
        {
            return false;
        }
        if let Some(lte) = self.order_date_lte
            && order.order_date > lte
        {
            return false;
        }
        if let Some(customer_id) = self.customer_id
            && order.customer_id != customer_id
        {
            return false;
        }
        if let Some(product_id) = self.product_id
            && !order.product_ids.contains(&product_id)
        {
            return false;
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use coral_core::{CustomerId, Email, OrderId, ProductId};

    use super::*;

    fn product(name: &str, price: &str, stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_owned(),
            price: price.parse::<Decimal>().unwrap(),
            stock,
        }
    }

    #[test]
    fn test_customer_name_contains_is_case_insensitive() {
        let customer = Customer {
            id: CustomerId::new(1),
            name: "Alice Johnson".to_owned(),
            email: Email::parse("alice@example.com").unwrap(),
            phone: None,
            created_at: Utc::now(),
        };

        let filter = CustomerFilter {
            name_contains: Some("johnson".to_owned()),
            ..CustomerFilter::default()
        };
        assert!(filter.matches(&customer));

        let filter = CustomerFilter {
            name_contains: Some("smith".to_owned()),
            ..CustomerFilter::default()
        };
        assert!(!filter.matches(&customer));
    }

    #[test]
    fn test_customer_phone_prefix_requires_a_phone() {
        let customer = Customer {
            id: CustomerId::new(1),
            name: "Alice".to_owned(),
            email: Email::parse("alice@example.com").unwrap(),
            phone: None,
            created_at: Utc::now(),
        };

        let filter = CustomerFilter {
            phone_starts_with: Some("+1".to_owned()),
            ..CustomerFilter::default()
        };
        assert!(!filter.matches(&customer));
    }

    #[test]
    fn test_product_price_range() {
        let widget = product("Widget", "19.99", 5);

        let filter = ProductFilter {
            price_gte: Some(Decimal::new(10, 0)),
            price_lte: Some(Decimal::new(20, 0)),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&widget));

        let filter = ProductFilter {
            price_gte: Some(Decimal::new(20, 0)),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&widget));
    }

    #[test]
    fn test_product_low_stock_is_strict() {
        let widget = product("Widget", "19.99", 5);

        let filter = ProductFilter {
            low_stock_below: Some(6),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&widget));

        let filter = ProductFilter {
            low_stock_below: Some(5),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&widget));
    }

    #[test]
    fn test_order_product_membership() {
        let order = Order {
            id: OrderId::new(1),
            customer_id: CustomerId::new(1),
            product_ids: vec![ProductId::new(2), ProductId::new(3)],
            total_amount: Decimal::new(2500, 2),
            order_date: Utc::now(),
        };

        let filter = OrderFilter {
            product_id: Some(ProductId::new(3)),
            ..OrderFilter::default()
        };
        assert!(filter.matches(&order));

        let filter = OrderFilter {
            product_id: Some(ProductId::new(9)),
            ..OrderFilter::default()
        };
        assert!(!filter.matches(&order));
    }
}
