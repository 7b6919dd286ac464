//! Seed the database with demo CRM data.
//!
//! Goes through the same services the API uses, so seeded rows pass the
//! same validation as API-created ones. Re-running is safe: customers
//! dedup on email, and products are skipped when any already exist.

use rust_decimal::Decimal;
use sqlx::PgPool;

use coral_api::db::{CrmStore, PgStore};
use coral_api::services::{CustomerDraft, CustomerService, ProductDraft, ProductService};

use super::{CommandError, database_url};

fn demo_customers() -> Vec<CustomerDraft> {
    [
        ("Alice Johnson", "alice@example.com", Some("+12025550147")),
        ("Bob Smith", "bob@example.com", Some("202-555-0184")),
        ("Carol Diaz", "carol@example.com", None),
    ]
    .into_iter()
    .map(|(name, email, phone)| CustomerDraft {
        name: name.to_owned(),
        email: email.to_owned(),
        phone: phone.map(str::to_owned),
    })
    .collect()
}

fn demo_products() -> Vec<ProductDraft> {
    [
        ("Starter Plan", "19.99", Some(100)),
        ("Team Plan", "49.99", Some(40)),
        ("Onboarding Workshop", "250.00", None),
    ]
    .into_iter()
    .map(|(name, price, stock)| ProductDraft {
        name: name.to_owned(),
        price: price.parse::<Decimal>().expect("valid demo price"),
        stock,
    })
    .collect()
}

/// Insert the demo dataset.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to CRM database...");
    let pool = PgPool::connect(&database_url).await?;
    let store = PgStore::new(pool);

    let customers = CustomerService::new(&store);
    let outcome = customers.bulk_create(demo_customers()).await?;
    tracing::info!(
        created = outcome.created.len(),
        skipped = outcome.rejections.len(),
        "seeded customers"
    );

    if store.products(None).await.map_err(store_error)?.is_empty() {
        let products = ProductService::new(&store);
        for draft in demo_products() {
            let product = products.create(draft).await?;
            tracing::info!(id = %product.id, name = %product.name, "seeded product");
        }
    } else {
        tracing::info!("products already present, skipping product seed");
    }

    Ok(())
}

fn store_error(e: coral_api::db::StoreError) -> CommandError {
    CommandError::Service(e.into())
}
