//! # Validation Module
//!
//! Input validation for the mutations the ledger services perform.
//!
//! Validators run before any store call. A failing validator means nothing
//! was written.
//!
//! ## Usage
//! ```rust,no_run
//! use nexus_core::validation::{validate_client_fields, validate_uuid};
//!
//! validate_client_fields("Acme Ltd", "billing@acme.test").unwrap();
//! validate_uuid("550e8400-e29b-41d4-a716-446655440000").unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::NewClient;
use crate::MAX_DESCRIPTION_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest client name accepted.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the two required client fields.
///
/// ## Rules
/// - Name and email must be non-blank
/// - Name at most 200 characters
/// - Email needs a local part and a domain around a single `@`
///
/// ## Example
/// ```rust
/// use nexus_core::validation::validate_client_fields;
///
/// assert!(validate_client_fields("Acme", "a@acme.test").is_ok());
/// assert!(validate_client_fields("", "a@acme.test").is_err());
/// assert!(validate_client_fields("Acme", "acme.test").is_err());
/// ```
pub fn validate_client_fields(name: &str, email: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(required("name"));
    }
    if name.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_CLIENT_NAME_LEN,
        });
    }
    validate_email(email)
}

/// Validates a whole [`NewClient`].
pub fn validate_new_client(client: &NewClient) -> ValidationResult<()> {
    validate_client_fields(&client.name, &client.email)
}

/// Minimal structural check on an email address.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(required("email"));
    }

    let mut parts = email.split('@');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }
    Ok(())
}

/// Validates the company name for company settings.
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(required("company name"));
    }
    Ok(())
}

/// Cuts a line-item description to the stored maximum, counting characters.
pub fn truncate_description(description: &str) -> String {
    description.chars().take(MAX_DESCRIPTION_LEN).collect()
}

// =============================================================================
// ID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use nexus_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
