use std::{collections::BTreeMap, fmt};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    MissingField,
    InvalidFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub fn missing(field: Field, message: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::MissingField,
            message,
        }
    }

    pub fn invalid(field: Field, message: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::InvalidFormat,
            message,
        }
    }
}

pub const NAME_ABSENT: &str = "Please select a full name.";
pub const NAME_EMPTY: &str = "Please enter a full name.";
pub const EMAIL_ABSENT: &str = "Please select an email address.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const IMAGE_INVALID: &str = "Please select an image URL.";
pub const IMAGE_UNSUPPORTED: &str = "Please upload a PNG, JPEG, WebP or GIF image.";

/// Every field error found in a single validation pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn kinds(&self, field: Field) -> Vec<FieldErrorKind> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.kind)
            .collect()
    }

    /// Flattened `field -> [messages]` view handed back to the form.
    pub fn by_field(&self) -> BTreeMap<Field, Vec<String>> {
        let mut out: BTreeMap<Field, Vec<String>> = BTreeMap::new();
        for e in &self.0 {
            out.entry(e.field).or_default().push(e.message.to_string());
        }
        out
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.0.iter().map(|e| format!("{:?}", e.field)).collect();
        write!(f, "invalid fields [{}]", fields.join(", "))
    }
}

/// Raw, untrusted customer fields as submitted.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCustomer {
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(
            r"^[^@\s.]+(?:\.[^@\s.]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$"
        )
        .unwrap();
    }
    EMAIL_RE.is_match(email)
}

// Any non-blank text; path safety is checked in `LocalStorage::resolve`.
fn is_image_reference(reference: &str) -> bool {
    !reference.is_empty()
}

pub fn validate(form: &CustomerForm) -> Result<ValidCustomer, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match form.name.as_deref().map(str::trim) {
        None => {
            errors.push(FieldError::missing(Field::Name, NAME_ABSENT));
            None
        }
        Some("") => {
            errors.push(FieldError::missing(Field::Name, NAME_EMPTY));
            None
        }
        Some(n) => Some(n.to_string()),
    };

    let email = match form.email.as_deref().map(str::trim) {
        None => {
            errors.push(FieldError::missing(Field::Email, EMAIL_ABSENT));
            None
        }
        Some(e) if !is_valid_email(e) => {
            errors.push(FieldError::invalid(Field::Email, EMAIL_INVALID));
            None
        }
        Some(e) => Some(e.to_string()),
    };

    let image_url = form.image_url.as_deref().map(str::trim);
    if let Some(r) = image_url {
        if !is_image_reference(r) {
            errors.push(FieldError::invalid(Field::Image, IMAGE_INVALID));
        }
    }

    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(ValidCustomer {
            name,
            email,
            image_url: image_url.map(str::to_string),
        }),
        _ => Err(errors),
    }
}
