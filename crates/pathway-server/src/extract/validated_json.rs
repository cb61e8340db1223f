//! Validated JSON extractor with automatic validation.
//!
//! [`ValidateJson`] combines JSON deserialization with validation using the
//! `validator` crate, producing a 400 response with per-field messages for
//! any violation.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor with automatic validation using the `validator` crate.
///
/// Works with any type that implements both `serde::Deserialize` and
/// `validator::Validate`. Also see [`Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

/// Formats length validation errors with the configured bounds.
fn format_length_error(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
) -> String {
    let as_u64 = |value: &serde_json::Value| value.as_u64().unwrap_or(0);

    match (params.get("min"), params.get("max")) {
        (Some(min), Some(max)) => format!(
            "Field '{field}' must be between {} and {} characters long",
            as_u64(min),
            as_u64(max)
        ),
        (Some(min), None) => format!(
            "Field '{field}' must be at least {} characters long",
            as_u64(min)
        ),
        (None, Some(max)) => format!(
            "Field '{field}' must be at most {} characters long",
            as_u64(max)
        ),
        _ => format!("Field '{field}' has invalid length"),
    }
}

/// Formats range validation errors with the configured bounds.
fn format_range_error(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
) -> String {
    let as_f64 = |value: &serde_json::Value| value.as_f64().unwrap_or(0.0);

    match (params.get("min"), params.get("max")) {
        (Some(min), Some(max)) => format!(
            "Field '{field}' must be between {} and {}",
            as_f64(min),
            as_f64(max)
        ),
        (Some(min), None) => format!("Field '{field}' must be at least {}", as_f64(min)),
        (None, Some(max)) => format!("Field '{field}' must be at most {}", as_f64(max)),
        _ => format!("Field '{field}' is out of valid range"),
    }
}

/// Formats a single validation error with a field-aware message.
fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{field}': {custom_message}");
    }

    match error.code.as_ref() {
        "required" => format!("Field '{field}' is required and cannot be empty"),
        "length" => format_length_error(field, &error.params),
        "range" => format_range_error(field, &error.params),
        "regex" => format!("Field '{field}' has an invalid format"),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field.as_ref(), error))
            })
            .collect();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        tracing::warn!(
            errors = ?errors.field_errors(),
            "request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct SampleRequest {
        #[validate(length(min = 1, max = 8))]
        identifier: String,
        #[validate(range(min = 0, max = 100))]
        order: i32,
    }

    #[test]
    fn length_violation_names_the_field() {
        let sample = SampleRequest {
            identifier: String::new(),
            order: 10,
        };

        let errors = sample.validate().unwrap_err();
        let error = Error::from(errors);
        assert!(error.message().unwrap().contains("identifier"));
        assert!(error.message().unwrap().contains("between 1 and 8"));
    }

    #[test]
    fn multiple_violations_are_joined() {
        let sample = SampleRequest {
            identifier: String::new(),
            order: 1000,
        };

        let errors = sample.validate().unwrap_err();
        let error = Error::from(errors);
        let message = error.message().unwrap();
        assert!(message.contains("identifier"));
        assert!(message.contains("order"));
    }
}
