use std::borrow::Cow;

use serde::Serialize;

pub use validator::{Validate, ValidationError, ValidationErrors};

/// One failed check, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten a validation report into one entry per failed check, ordered by
/// field name. Checks without a message fall back to their code.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// A report with a single failed field, for input rejected before the
/// derived checks run (malformed JSON, bad path or query parameters).
pub fn single(field: &'static str, message: impl Into<String>) -> ValidationErrors {
    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Owned(message.into()));

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}
