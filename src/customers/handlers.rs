use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::MessageResponse;
use super::validation::CustomerForm;
use super::{services, LISTING_PATH};
use crate::images::services::UploadItem;
use crate::state::AppState;

pub fn customer_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(LISTING_PATH, get(list_customers).post(create_customer))
        .route("/dashboard/customers/:id", get(get_customer))
        .route("/dashboard/customers/:id/edit", post(update_customer))
        .route("/dashboard/customers/:id/delete", post(delete_customer))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Multipart fields of the create and edit forms.
#[derive(Debug, Default)]
struct Submission {
    form: CustomerForm,
    existing_image: Option<String>,
    upload: Option<UploadItem>,
}

async fn read_submission(mut mp: Multipart) -> Result<Submission, MultipartError> {
    let mut sub = Submission::default();
    while let Some(field) = mp.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => sub.form.name = Some(field.text().await?),
            "email" => sub.form.email = Some(field.text().await?),
            // Hidden input; blank when the customer has no image yet.
            "existingImage" => {
                let v = field.text().await?;
                sub.existing_image = Some(v).filter(|s| !s.trim().is_empty());
            }
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let body = field.bytes().await?;
                sub.upload = Some(UploadItem {
                    file_name,
                    content_type,
                    body,
                });
            }
            _ => {}
        }
    }
    Ok(sub)
}

fn malformed(e: MultipartError) -> Response {
    error!(error = %e, "malformed form submission");
    (
        e.status(),
        Json(MessageResponse {
            message: e.body_text(),
        }),
    )
        .into_response()
}

#[instrument(skip(state))]
pub async fn list_customers(State(state): State<AppState>) -> Response {
    match services::list_customers(&state).await {
        Ok(customers) => Json(customers.as_slice()).into_response(),
        Err(e) => {
            error!(error = %e, "list customers failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Database Error: Failed to Fetch Customers.".into(),
                }),
            )
                .into_response()
        }
    }
}

#[instrument(skip(state))]
pub async fn get_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match services::get_customer(&state, id).await {
        Ok(Some(customer)) => Json(customer).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: "Customer not found.".into(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, %id, "get customer failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Database Error: Failed to Fetch Customer.".into(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /dashboard/customers (multipart: name, email, image)
#[instrument(skip(state, mp))]
pub async fn create_customer(State(state): State<AppState>, mp: Multipart) -> Response {
    let sub = match read_submission(mp).await {
        Ok(s) => s,
        Err(e) => return malformed(e),
    };
    match services::create_customer(&state, sub.form, sub.upload).await {
        Ok(_) => Redirect::to(LISTING_PATH).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /dashboard/customers/:id/edit (multipart: name, email, image, existingImage)
#[instrument(skip(state, mp))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> Response {
    let sub = match read_submission(mp).await {
        Ok(s) => s,
        Err(e) => return malformed(e),
    };
    let form = CustomerForm {
        image_url: sub.existing_image,
        ..sub.form
    };
    match services::update_customer(&state, id, form, sub.upload).await {
        Ok(()) => Redirect::to(LISTING_PATH).into_response(),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip(state))]
pub async fn delete_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match services::delete_customer(&state, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
