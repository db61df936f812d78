use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::FormState;
use super::validation::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
        })
    }
}

pub const STORAGE_FAILED: &str = "Storage Error: Failed to Save Customer Image.";

/// How a customer mutation failed; each variant maps to one user-facing message.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{action} rejected: {errors}")]
    Validation {
        action: Action,
        errors: ValidationErrors,
    },
    #[error("{action} image write failed: {detail:#}")]
    Storage {
        action: Action,
        detail: anyhow::Error,
    },
    #[error("{action} database write failed: {detail:#}")]
    Persistence {
        action: Action,
        detail: anyhow::Error,
    },
}

impl MutationError {
    pub fn status(&self) -> StatusCode {
        match self {
            MutationError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            MutationError::Storage { .. } | MutationError::Persistence { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The result shape the form renders; internal detail never leaves here.
    pub fn form_state(&self) -> FormState {
        match self {
            MutationError::Validation { action, errors } => FormState {
                errors: Some(errors.by_field()),
                message: Some(format!("Missing Fields. Failed to {} Customer.", action)),
            },
            MutationError::Storage { .. } => FormState {
                errors: None,
                message: Some(STORAGE_FAILED.to_string()),
            },
            MutationError::Persistence { action, .. } => FormState {
                errors: None,
                message: Some(format!("Database Error: Failed to {} Customer.", action)),
            },
        }
    }
}

impl IntoResponse for MutationError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.form_state())).into_response()
    }
}
