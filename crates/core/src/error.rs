//! Domain error taxonomy.
//!
//! HTTP status mapping lives in the API crate; this enum only says *what*
//! went wrong.

use validator::ValidationErrors;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced survey, preference record, or user does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or out-of-range input. The message lists offending fields.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for CoreError {
    /// Flatten `validator` output into `field: message; field: message`.
    ///
    /// Fields are sorted so the message is stable across runs.
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {msg}")
                })
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::ValidationError;

    use super::*;

    #[test]
    fn validation_errors_are_flattened_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "ph",
            ValidationError::new("range").with_message("pH must be between 0 and 14".into()),
        );
        errors.add("notes", ValidationError::new("length"));

        let err = CoreError::from(errors);
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "notes: length; ph: pH must be between 0 and 14");
        });
    }
}
