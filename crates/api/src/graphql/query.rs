//! Query root.

use async_graphql::{Context, Object};

use coral_core::{CustomerId, OrderId, ProductId};

use super::types::{CustomerFilterInput, OrderFilterInput, ProductFilterInput};
use super::{internal_error, store};
use crate::models::{Customer, Order, Product};

/// GraphQL query root.
pub struct Query;

#[Object]
impl Query {
    /// List customers, optionally filtered.
    async fn all_customers(
        &self,
        ctx: &Context<'_>,
        filter: Option<CustomerFilterInput>,
    ) -> async_graphql::Result<Vec<Customer>> {
        let store = store(ctx)?;
        store
            .customers(filter.map(Into::into).as_ref())
            .await
            .map_err(internal_error)
    }

    /// List products, optionally filtered.
    async fn all_products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilterInput>,
    ) -> async_graphql::Result<Vec<Product>> {
        let store = store(ctx)?;
        store
            .products(filter.map(Into::into).as_ref())
            .await
            .map_err(internal_error)
    }

    /// List orders, optionally filtered.
    async fn all_orders(
        &self,
        ctx: &Context<'_>,
        filter: Option<OrderFilterInput>,
    ) -> async_graphql::Result<Vec<Order>> {
        let store = store(ctx)?;
        store
            .orders(filter.map(Into::into).as_ref())
            .await
            .map_err(internal_error)
    }

    /// Fetch a single customer by id.
    async fn customer(
        &self,
        ctx: &Context<'_>,
        id: CustomerId,
    ) -> async_graphql::Result<Option<Customer>> {
        let store = store(ctx)?;
        store.customer(id).await.map_err(internal_error)
    }

    /// Fetch a single product by id.
    async fn product(
        &self,
        ctx: &Context<'_>,
        id: ProductId,
    ) -> async_graphql::Result<Option<Product>> {
        let store = store(ctx)?;
        store.product(id).await.map_err(internal_error)
    }

    /// Fetch a single order by id.
    async fn order(
        &self,
        ctx: &Context<'_>,
        id: OrderId,
    ) -> async_graphql::Result<Option<Order>> {
        let store = store(ctx)?;
        store.order(id).await.map_err(internal_error)
    }
}
