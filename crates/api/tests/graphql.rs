//! GraphQL integration tests.
//!
//! These execute full operations against the schema backed by the in-memory
//! store, exercising input coercion, payload shapes, and the nested order
//! resolvers end to end.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::{Value, json};

use coral_api::db::MemoryStore;
use coral_api::graphql::{CrmSchema, build_schema};

fn schema() -> CrmSchema {
    build_schema(Arc::new(MemoryStore::new()))
}

/// Execute a query that must succeed at the GraphQL level and return its data.
async fn execute(schema: &CrmSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected GraphQL errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

async fn seed_customer(schema: &CrmSchema, name: &str, email: &str) -> Value {
    let data = execute(
        schema,
        &format!(
            r#"mutation {{
                createCustomer(input: {{ name: "{name}", email: "{email}" }}) {{
                    customer {{ id name email }}
                    message
                    error
                }}
            }}"#
        ),
    )
    .await;
    assert_eq!(data["createCustomer"]["error"], Value::Null);
    data["createCustomer"]["customer"].clone()
}

async fn seed_product(schema: &CrmSchema, name: &str, price: &str) -> Value {
    let data = execute(
        schema,
        &format!(
            r#"mutation {{
                createProduct(input: {{ name: "{name}", price: "{price}" }}) {{
                    product {{ id name price stock }}
                    error
                }}
            }}"#
        ),
    )
    .await;
    assert_eq!(data["createProduct"]["error"], Value::Null);
    data["createProduct"]["product"].clone()
}

#[tokio::test]
async fn create_customer_returns_payload_with_message() {
    let schema = schema();
    let data = execute(
        &schema,
        r#"mutation {
            createCustomer(input: {
                name: "Alice",
                email: "alice@example.com",
                phone: "+12025550147"
            }) {
                customer { name email phone }
                message
                error
            }
        }"#,
    )
    .await;

    assert_eq!(
        data["createCustomer"],
        json!({
            "customer": {
                "name": "Alice",
                "email": "alice@example.com",
                "phone": "+12025550147"
            },
            "message": "Customer created successfully.",
            "error": null
        })
    );
}

#[tokio::test]
async fn create_customer_duplicate_email_sets_only_error() {
    let schema = schema();
    seed_customer(&schema, "Alice", "alice@example.com").await;

    let data = execute(
        &schema,
        r#"mutation {
            createCustomer(input: { name: "Other", email: "alice@example.com" }) {
                customer { id }
                message
                error
            }
        }"#,
    )
    .await;

    assert_eq!(
        data["createCustomer"],
        json!({
            "customer": null,
            "message": null,
            "error": "Email alice@example.com already exists."
        })
    );
}

#[tokio::test]
async fn bulk_create_reports_partial_failures_in_order() {
    let schema = schema();
    seed_customer(&schema, "Bob", "bob@example.com").await;

    let data = execute(
        &schema,
        r#"mutation {
            bulkCreateCustomers(input: [
                { name: "A", email: "a@example.com" },
                { name: "B", email: "bob@example.com" },
                { name: "C", email: "c@example.com", phone: "12" },
                { name: "D", email: "d@example.com", phone: "202-555-0147" }
            ]) {
                customers { name email }
                errors
            }
        }"#,
    )
    .await;

    assert_eq!(
        data["bulkCreateCustomers"],
        json!({
            "customers": [
                { "name": "A", "email": "a@example.com" },
                { "name": "D", "email": "d@example.com" }
            ],
            "errors": [
                "Email bob@example.com already exists.",
                "Invalid phone number '12' for c@example.com."
            ]
        })
    );
}

#[tokio::test]
async fn bulk_create_rerun_rejects_all_previously_accepted() {
    let schema = schema();
    let batch = r#"mutation {
        bulkCreateCustomers(input: [
            { name: "A", email: "a@x.com" },
            { name: "B", email: "b@x.com" }
        ]) {
            customers { email }
            errors
        }
    }"#;

    let first = execute(&schema, batch).await;
    assert_eq!(
        first["bulkCreateCustomers"]["customers"],
        json!([{ "email": "a@x.com" }, { "email": "b@x.com" }])
    );
    assert_eq!(first["bulkCreateCustomers"]["errors"], json!([]));

    let second = execute(&schema, batch).await;
    assert_eq!(second["bulkCreateCustomers"]["customers"], json!([]));
    assert_eq!(
        second["bulkCreateCustomers"]["errors"],
        json!([
            "Email a@x.com already exists.",
            "Email b@x.com already exists."
        ])
    );

    let all = execute(&schema, "{ allCustomers { email } }").await;
    assert_eq!(all["allCustomers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_product_rejects_negative_price_without_mutation() {
    let schema = schema();
    let data = execute(
        &schema,
        r#"mutation {
            createProduct(input: { name: "Widget", price: "-1", stock: 5 }) {
                product { id }
                error
            }
        }"#,
    )
    .await;

    assert_eq!(
        data["createProduct"],
        json!({ "product": null, "error": "Price must be positive." })
    );

    let all = execute(&schema, "{ allProducts { id } }").await;
    assert_eq!(all["allProducts"], json!([]));
}

#[tokio::test]
async fn create_product_defaults_stock() {
    let schema = schema();
    let product = seed_product(&schema, "Widget", "19.99").await;
    assert_eq!(product["stock"], json!(0));
    assert_eq!(product["price"], json!("19.99"));
}

#[tokio::test]
async fn create_order_sums_prices_exactly() {
    let schema = schema();
    let customer = seed_customer(&schema, "Alice", "alice@example.com").await;
    let a = seed_product(&schema, "A", "19.99").await;
    let b = seed_product(&schema, "B", "5.00").await;
    let c = seed_product(&schema, "C", "0.02").await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{
                createOrder(input: {{
                    customerId: {},
                    productIds: [{}, {}, {}]
                }}) {{
                    order {{
                        totalAmount
                        customer {{ name }}
                        products {{ name price }}
                    }}
                    error
                }}
            }}"#,
            customer["id"], a["id"], b["id"], c["id"]
        ),
    )
    .await;

    assert_eq!(data["createOrder"]["error"], Value::Null);
    let order = &data["createOrder"]["order"];
    assert_eq!(order["totalAmount"], json!("25.01"));
    assert_eq!(order["customer"]["name"], json!("Alice"));
    assert_eq!(
        order["products"],
        json!([
            { "name": "A", "price": "19.99" },
            { "name": "B", "price": "5.00" },
            { "name": "C", "price": "0.02" }
        ])
    );
}

#[tokio::test]
async fn create_order_unknown_customer_leaves_store_unchanged() {
    let schema = schema();
    let product = seed_product(&schema, "A", "19.99").await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{
                createOrder(input: {{ customerId: 999, productIds: [{}] }}) {{
                    order {{ id }}
                    error
                }}
            }}"#,
            product["id"]
        ),
    )
    .await;

    assert_eq!(
        data["createOrder"],
        json!({ "order": null, "error": "Invalid customer ID." })
    );

    let all = execute(&schema, "{ allOrders { id } }").await;
    assert_eq!(all["allOrders"], json!([]));
}

#[tokio::test]
async fn create_order_requires_products() {
    let schema = schema();
    let customer = seed_customer(&schema, "Alice", "alice@example.com").await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{
                createOrder(input: {{ customerId: {}, productIds: [] }}) {{
                    order {{ id }}
                    error
                }}
            }}"#,
            customer["id"]
        ),
    )
    .await;

    assert_eq!(
        data["createOrder"]["error"],
        json!("At least one product is required.")
    );
}

#[tokio::test]
async fn create_order_names_missing_product_ids() {
    let schema = schema();
    let customer = seed_customer(&schema, "Alice", "alice@example.com").await;
    let known = seed_product(&schema, "A", "19.99").await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{
                createOrder(input: {{ customerId: {}, productIds: [{}, 41, 42] }}) {{
                    order {{ id }}
                    error
                }}
            }}"#,
            customer["id"], known["id"]
        ),
    )
    .await;

    assert_eq!(
        data["createOrder"]["error"],
        json!("Invalid product ID(s): 41, 42.")
    );
}

#[tokio::test]
async fn filters_narrow_listings() {
    let schema = schema();
    seed_customer(&schema, "Alice Johnson", "alice@example.com").await;
    seed_customer(&schema, "Bob Smith", "bob@example.com").await;
    seed_product(&schema, "Widget", "19.99").await;
    seed_product(&schema, "Premium Widget", "99.99").await;

    let data = execute(
        &schema,
        r#"{
            allCustomers(filter: { nameContains: "johnson" }) { name }
            allProducts(filter: { priceLte: "50" }) { name }
        }"#,
    )
    .await;

    assert_eq!(data["allCustomers"], json!([{ "name": "Alice Johnson" }]));
    assert_eq!(data["allProducts"], json!([{ "name": "Widget" }]));
}

#[tokio::test]
async fn orders_filter_by_product_membership() {
    let schema = schema();
    let customer = seed_customer(&schema, "Alice", "alice@example.com").await;
    let a = seed_product(&schema, "A", "10.00").await;
    let b = seed_product(&schema, "B", "20.00").await;

    for ids in [format!("[{}]", a["id"]), format!("[{}]", b["id"])] {
        execute(
            &schema,
            &format!(
                r#"mutation {{
                    createOrder(input: {{ customerId: {}, productIds: {ids} }}) {{
                        order {{ id }}
                        error
                    }}
                }}"#,
                customer["id"]
            ),
        )
        .await;
    }

    let data = execute(
        &schema,
        &format!(
            r#"{{
                allOrders(filter: {{ productId: {} }}) {{ totalAmount }}
            }}"#,
            b["id"]
        ),
    )
    .await;

    assert_eq!(data["allOrders"], json!([{ "totalAmount": "20.00" }]));
}
