//! Mutation root.
//!
//! Mutations never surface domain failures as GraphQL errors; they return
//! payloads with the error message in-band, matching the query shape CRM
//! clients consume. Store-level failures are logged, captured to Sentry,
//! and reported with a generic message.

use async_graphql::{Context, Object};

use super::types::{
    BulkCreateCustomersPayload, CreateCustomerPayload, CreateOrderPayload, CreateProductPayload,
    CustomerInput, OrderInput, ProductInput,
};
use super::store;
use crate::services::{CustomerService, OrderService, ProductService, ServiceError};

/// GraphQL mutation root.
pub struct Mutation;

#[Object]
impl Mutation {
    /// Create a single customer. Fails fast on the first invalid field.
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        input: CustomerInput,
    ) -> async_graphql::Result<CreateCustomerPayload> {
        let store = store(ctx)?;
        let service = CustomerService::new(store.as_ref());
        match service.create(input.into()).await {
            Ok(customer) => Ok(CreateCustomerPayload::ok(customer)),
            Err(e) => Ok(CreateCustomerPayload::err(client_message(&e))),
        }
    }

    /// Import a batch of customers with per-candidate partial failure.
    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        input: Vec<CustomerInput>,
    ) -> async_graphql::Result<BulkCreateCustomersPayload> {
        let store = store(ctx)?;
        let service = CustomerService::new(store.as_ref());
        let drafts = input.into_iter().map(Into::into).collect();
        match service.bulk_create(drafts).await {
            Ok(outcome) => Ok(outcome.into()),
            Err(e) => Ok(BulkCreateCustomersPayload {
                customers: Vec::new(),
                errors: vec![client_message(&e)],
            }),
        }
    }

    /// Create a product. Fails fast on the first invalid field.
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInput,
    ) -> async_graphql::Result<CreateProductPayload> {
        let store = store(ctx)?;
        let service = ProductService::new(store.as_ref());
        match service.create(input.into()).await {
            Ok(product) => Ok(CreateProductPayload::ok(product)),
            Err(e) => Ok(CreateProductPayload::err(client_message(&e))),
        }
    }

    /// Compose an order from a customer and a set of products.
    async fn create_order(
        &self,
        ctx: &Context<'_>,
        input: OrderInput,
    ) -> async_graphql::Result<CreateOrderPayload> {
        let store = store(ctx)?;
        let service = OrderService::new(store.as_ref());
        match service.create(input.into()).await {
            Ok(order) => Ok(CreateOrderPayload::ok(order)),
            Err(e) => Ok(CreateOrderPayload::err(client_message(&e))),
        }
    }
}

/// Resolve the message to put in the payload's error field.
///
/// Store failures are captured before being collapsed to a generic message.
fn client_message(e: &ServiceError) -> String {
    if e.is_internal() {
        tracing::error!(error = %e, "mutation failed");
        sentry::capture_error(e);
    }
    e.client_message()
}
