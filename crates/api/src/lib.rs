//! Coral API - GraphQL CRM service.
//!
//! This crate exposes customers, products, and orders over a GraphQL
//! interface. Mutations validate their input, report partial failures for
//! bulk operations, and compute order totals from the selected products.
//!
//! # Architecture
//!
//! - [`db`] - The entity store: a [`db::CrmStore`] trait with `PostgreSQL`
//!   and in-memory implementations
//! - [`models`] - Domain records (`Customer`, `Product`, `Order`)
//! - [`services`] - Mutation logic: validation, bulk import, order composition
//! - [`graphql`] - The `async-graphql` schema wiring services to the wire
//! - [`config`] / [`state`] - Environment configuration and shared state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod graphql;
pub mod models;
pub mod services;
pub mod state;
