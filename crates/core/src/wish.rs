//! Wish records and submission validation.
//!
//! A wish is immutable once stored. The only lifecycle event after creation
//! is expiry, which the key-value store applies on its own.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::id::WishId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum recipient name length in characters.
pub const MAX_NAME_LENGTH: u64 = 50;

/// Maximum message length in characters.
pub const MAX_DESCRIPTION_LENGTH: u64 = 1200;

/// Maximum sender name length in characters.
pub const MAX_SENDER_LENGTH: u64 = 50;

/// Default retention window for a stored wish (3 days).
pub const DEFAULT_WISH_TTL_SECS: u64 = 259_200;

/// Namespace prefix for wish keys in the store.
pub const WISH_KEY_PREFIX: &str = "wish:";

/// Store key holding the record for `id`.
pub fn wish_key(id: &WishId) -> String {
    format!("{WISH_KEY_PREFIX}{id}")
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A stored greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishRecord {
    /// Recipient name.
    pub name: String,
    /// Free-form message, may contain line breaks.
    pub description: String,
    /// Who the wish is from. Records written before senders existed lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A wish as submitted to the create endpoint.
///
/// Missing fields deserialize as empty so they surface as validation errors
/// rather than body parse failures.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewWish {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "name is required"),
        length(max = MAX_NAME_LENGTH)
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "description is required"),
        length(max = MAX_DESCRIPTION_LENGTH)
    )]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = MAX_SENDER_LENGTH))]
    pub sender: Option<String>,
}

impl NewWish {
    /// Drop a blank sender so it is treated as absent.
    pub fn normalized(mut self) -> Self {
        if self.sender.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.sender = None;
        }
        self
    }

    /// Normalize and validate, producing the record to store.
    pub fn into_record(self) -> Result<WishRecord, CoreError> {
        let input = self.normalized();
        validate_new_wish(&input)?;
        Ok(WishRecord {
            name: input.name,
            description: input.description,
            sender: input.sender,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Validate a submission against the presence and length rules.
///
/// All failing fields are reported in one message, ordered by field name.
pub fn validate_new_wish(input: &NewWish) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe_errors(&errors)))
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            // Only the first failing rule per field is reported.
            errs.first()
                .map(|err| (field.to_string(), describe_error(&field, err)))
        })
        .collect();
    fields.sort();
    fields
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_error(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match (err.code.as_ref(), err.params.get("max")) {
        ("length", Some(max)) => format!("{field} must be at most {max} characters"),
        _ => format!("{field} is invalid"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
