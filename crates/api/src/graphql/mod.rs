//! GraphQL schema for the CRM.
//!
//! Queries list entities (optionally filtered); mutations return
//! graphene-style payloads where the success value and the error description
//! are mutually exclusive. The entity store is injected as schema data so
//! the same schema runs against `PostgreSQL` in production and the in-memory
//! store in tests.

pub mod mutation;
pub mod query;
pub mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};

pub use mutation::Mutation;
pub use query::Query;

use crate::db::{CrmStore, StoreError};

/// The executable CRM schema.
pub type CrmSchema = Schema<Query, Mutation, EmptySubscription>;

/// Build the schema over the given entity store.
#[must_use]
pub fn build_schema(store: Arc<dyn CrmStore>) -> CrmSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(store)
        .finish()
}

/// Fetch the entity store from the request context.
pub(crate) fn store<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Arc<dyn CrmStore>> {
    ctx.data::<Arc<dyn CrmStore>>()
}

/// Convert a store failure into a client-safe GraphQL error.
///
/// The underlying cause goes to tracing and Sentry; clients only see a
/// generic message.
pub(crate) fn internal_error(e: StoreError) -> async_graphql::Error {
    tracing::error!(error = %e, "store error");
    sentry::capture_error(&e);
    async_graphql::Error::new("Internal server error.")
}
