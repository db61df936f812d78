use std::collections::BTreeMap;

use serde::Serialize;

use super::validation::Field;

/// Outcome of a failed form submission, rendered inline by the dashboard.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<Field, Vec<String>>>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
