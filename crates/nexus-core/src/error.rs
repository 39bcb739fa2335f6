//! # Error Types
//!
//! Domain-specific error types for nexus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nexus-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nexus-db errors (separate crate)                                      │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  nexus-ledger errors (separate crate)                                  │
//! │  └── LedgerError      - What the dashboard surfaces as a notice        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → Notice              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Partial payment larger than what is still owed.
    ///
    /// ## User Workflow
    /// ```text
    /// Invoice total $100.00, paid $40.00
    ///      │
    ///      ▼
    /// User enters $75.00
    ///      │
    ///      ▼
    /// PaymentExceedsBalance { remaining: $60.00, .. }
    ///      │
    ///      ▼
    /// Notice: "Payment cannot exceed remaining balance of $60.00"
    /// ```
    #[error("Payment cannot exceed remaining balance of {remaining}")]
    PaymentExceedsBalance { requested: Money, remaining: Money },

    /// The invoice has nothing left to pay.
    #[error("Invoice {invoice_id} is already fully paid")]
    AlreadyPaid { invoice_id: String },

    /// Invoice line items could not be committed.
    #[error("Add at least one valid line item")]
    NoLineItems,

    /// Stored draft could not be decoded.
    #[error("Invoice draft is malformed: {0}")]
    MalformedDraft(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements and are raised
/// before any mutation is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
