pub mod dto;
pub mod error;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

use crate::state::AppState;
use axum::Router;

/// The cached customers listing; every successful mutation invalidates it.
pub const LISTING_PATH: &str = "/dashboard/customers";

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    handlers::customer_routes(max_upload_bytes)
}
