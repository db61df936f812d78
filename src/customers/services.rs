use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::error::{Action, MutationError};
use super::repo_types::Customer;
use super::validation::{validate, CustomerForm, ValidCustomer, ValidationErrors};
use super::LISTING_PATH;
use crate::images::services::{discard_image, plan_upload, store_image, PendingImage, UploadItem};
use crate::state::AppState;

pub async fn list_customers(st: &AppState) -> anyhow::Result<Arc<Vec<Customer>>> {
    let store = Arc::clone(&st.customers);
    st.views
        .get_or_load(LISTING_PATH, || async move { store.list().await })
        .await
}

pub async fn get_customer(st: &AppState, id: Uuid) -> anyhow::Result<Option<Customer>> {
    st.customers.find(id).await
}

/// Inserts a new customer; `form.image_url` is ignored.
#[instrument(skip_all)]
pub async fn create_customer(
    st: &AppState,
    form: CustomerForm,
    upload: Option<UploadItem>,
) -> Result<Uuid, MutationError> {
    let action = Action::Create;
    let form = CustomerForm {
        image_url: None,
        ..form
    };
    let (customer, pending) = check(st, action, form, upload)?;
    let (customer, written) = write_image(st, action, customer, pending).await?;

    let id = match st.customers.insert(&customer).await {
        Ok(id) => id,
        Err(e) => return Err(persistence_failed(st, action, e, written).await),
    };

    info!(customer_id = %id, with_image = customer.image_url.is_some(), "customer created");
    st.views.invalidate(LISTING_PATH);
    Ok(id)
}

/// Replaces every mutable field of `id`. `form.image_url` carries the image
/// already on record and is kept unless a non-empty upload replaces it.
#[instrument(skip(st, form, upload))]
pub async fn update_customer(
    st: &AppState,
    id: Uuid,
    form: CustomerForm,
    upload: Option<UploadItem>,
) -> Result<(), MutationError> {
    let action = Action::Update;
    let (customer, pending) = check(st, action, form, upload)?;
    let (customer, written) = write_image(st, action, customer, pending).await?;

    let affected = match st.customers.update(id, &customer).await {
        Ok(n) => n,
        Err(e) => return Err(persistence_failed(st, action, e, written).await),
    };

    // No row took the new file; an unknown id still counts as success.
    if affected == 0 {
        if let Some(reference) = written.as_deref() {
            discard_unreferenced(st, reference).await;
        }
    }

    info!(customer_id = %id, affected, image_replaced = written.is_some(), "customer updated");
    st.views.invalidate(LISTING_PATH);
    Ok(())
}

/// Unconditional delete; an unknown id is not an error.
#[instrument(skip(st))]
pub async fn delete_customer(st: &AppState, id: Uuid) -> Result<(), MutationError> {
    let affected = st.customers.delete(id).await.map_err(|e| {
        error!(error = %e, customer_id = %id, "delete customer failed");
        MutationError::Persistence {
            action: Action::Delete,
            detail: e,
        }
    })?;

    info!(customer_id = %id, affected, "customer deleted");
    st.views.invalidate(LISTING_PATH);
    Ok(())
}

// Validation covers the upload as well, so nothing is written for a rejected form.
fn check(
    st: &AppState,
    action: Action,
    form: CustomerForm,
    upload: Option<UploadItem>,
) -> Result<(ValidCustomer, Option<PendingImage>), MutationError> {
    let mut errors = ValidationErrors::default();

    let pending = match plan_upload(
        &st.config.storage.images_prefix,
        form.name.as_deref(),
        upload,
    ) {
        Ok(p) => p,
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let merged = CustomerForm {
        image_url: pending
            .as_ref()
            .map(|p| p.reference.clone())
            .or(form.image_url),
        ..form
    };

    match validate(&merged) {
        Ok(customer) if errors.is_empty() => Ok((customer, pending)),
        Ok(_) => Err(rejected(action, errors)),
        Err(field_errors) => {
            let mut all = field_errors;
            all.extend(errors);
            Err(rejected(action, all))
        }
    }
}

fn rejected(action: Action, errors: ValidationErrors) -> MutationError {
    warn!(%action, %errors, "customer form rejected");
    MutationError::Validation { action, errors }
}

async fn write_image(
    st: &AppState,
    action: Action,
    customer: ValidCustomer,
    pending: Option<PendingImage>,
) -> Result<(ValidCustomer, Option<String>), MutationError> {
    let Some(pending) = pending else {
        return Ok((customer, None));
    };
    match store_image(st.storage.as_ref(), pending).await {
        Ok(reference) => Ok((
            ValidCustomer {
                image_url: Some(reference.clone()),
                ..customer
            },
            Some(reference),
        )),
        Err(e) => {
            error!(error = %e, %action, "customer image write failed");
            Err(MutationError::Storage { action, detail: e })
        }
    }
}

// The row never referenced the new file, so it is removed rather than left orphaned.
async fn persistence_failed(
    st: &AppState,
    action: Action,
    e: anyhow::Error,
    written: Option<String>,
) -> MutationError {
    error!(error = %e, %action, "customer write failed");
    if let Some(reference) = written {
        discard_unreferenced(st, &reference).await;
    }
    MutationError::Persistence { action, detail: e }
}

async fn discard_unreferenced(st: &AppState, reference: &str) {
    if let Err(cleanup) = discard_image(st.storage.as_ref(), reference).await {
        warn!(error = %cleanup, %reference, "orphaned customer image left behind");
    }
}
