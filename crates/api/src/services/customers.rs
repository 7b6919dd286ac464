//! Customer creation and bulk import.

use coral_core::{Email, Phone};

use super::{ServiceError, validate};
use crate::db::CrmStore;
use crate::models::{Customer, NewCustomer};

/// An unvalidated customer candidate as submitted by a caller.
#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Result of a bulk import: the customers that were persisted plus one
/// message per rejected candidate, in the order the rejections occurred.
#[derive(Debug, Default)]
pub struct BulkCreateOutcome {
    pub created: Vec<Customer>,
    pub rejections: Vec<String>,
}

/// Customer mutation service.
pub struct CustomerService<'a> {
    store: &'a dyn CrmStore,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(store: &'a dyn CrmStore) -> Self {
        Self { store }
    }

    /// Create a single customer, fail-fast.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, malformed email, or
    /// malformed phone; `Conflict` when the email is already registered;
    /// `Store` when the store itself fails.
    pub async fn create(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
        validate::validate_name(&draft.name)?;
        let email = Email::parse(&draft.email).map_err(|_| {
            ServiceError::InvalidInput(format!("Invalid email address '{}'.", draft.email))
        })?;
        let phone = parse_phone(draft.phone.as_deref())?;

        match self
            .store
            .insert_customer(NewCustomer {
                name: draft.name,
                email: email.clone(),
                phone,
            })
            .await
        {
            Ok(customer) => Ok(customer),
            Err(crate::db::StoreError::Conflict(_)) => Err(ServiceError::Conflict(format!(
                "Email {email} already exists."
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Import a batch of customer candidates with partial-failure semantics.
    ///
    /// Candidates are screened independently in input order: a rejection is
    /// recorded for duplicates (against the store *and* against candidates
    /// accepted earlier in the same batch) and for invalid fields, and
    /// screening continues with the next candidate. Survivors are persisted
    /// in one atomic bulk insert.
    ///
    /// # Errors
    ///
    /// Returns `Store` when a store lookup or the final bulk insert fails;
    /// per-candidate problems are reported in the outcome, not as errors.
    pub async fn bulk_create(
        &self,
        drafts: Vec<CustomerDraft>,
    ) -> Result<BulkCreateOutcome, ServiceError> {
        let mut staged: Vec<NewCustomer> = Vec::new();
        let mut rejections = Vec::new();

        for draft in &drafts {
            let Ok(email) = Email::parse(&draft.email) else {
                rejections.push(format!("Invalid email address '{}'.", draft.email));
                continue;
            };

            let already_staged = staged.iter().any(|c| c.email == email);
            if already_staged || self.store.customer_by_email(&email).await?.is_some() {
                rejections.push(format!("Email {email} already exists."));
                continue;
            }

            if draft.name.trim().is_empty() {
                rejections.push(format!("Name is required for {email}."));
                continue;
            }

            let phone = match draft.phone.as_deref() {
                Some(raw) => match Phone::parse(raw) {
                    Ok(phone) => Some(phone),
                    Err(_) => {
                        rejections.push(format!("Invalid phone number '{raw}' for {email}."));
                        continue;
                    }
                },
                None => None,
            };

            staged.push(NewCustomer {
                name: draft.name.clone(),
                email,
                phone,
            });
        }

        let created = if staged.is_empty() {
            Vec::new()
        } else {
            self.store.insert_customers(staged).await?
        };

        tracing::info!(
            created = created.len(),
            rejected = rejections.len(),
            "bulk customer import finished"
        );

        Ok(BulkCreateOutcome {
            created,
            rejections,
        })
    }
}

fn parse_phone(raw: Option<&str>) -> Result<Option<Phone>, ServiceError> {
    match raw {
        Some(raw) => Phone::parse(raw)
            .map(Some)
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid phone number '{raw}'."))),
        None => Ok(None),
    }
}
