//! # Ledger Error Types
//!
//! Error types for session services.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledger Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │    Mutation     │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  Db(..)         │  │  InvalidConfig          │ │
//! │  │  raised before  │  │  NoCheckoutUrl  │  │  ConfigLoadFailed       │ │
//! │  │  any write      │  │  ChargeFailed   │  │  ConfigSaveFailed       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Fetch failures never show up here. The aggregator and dashboard        │
//! │  turn them into a zero result plus a notice.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use nexus_core::CoreError;
use nexus_db::DbError;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by session services.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Validation or business rule failure from nexus-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Store operation failed.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    // =========================================================================
    // Payment Errors
    // =========================================================================
    /// The charge collaborator answered without a redirect URL.
    #[error("No checkout URL returned")]
    NoCheckoutUrl,

    /// The charge collaborator failed outright.
    #[error("Charge failed: {0}")]
    ChargeFailed(String),

    // =========================================================================
    // Scratch Store Errors
    // =========================================================================
    /// Local scratch storage could not be read or written.
    #[error("Scratch store error: {0}")]
    Scratch(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for LedgerError {
    fn from(err: toml::ser::Error) -> Self {
        LedgerError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl LedgerError {
    /// Returns true if the input was rejected before anything was written.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Core(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidConfig(_)
                | LedgerError::ConfigLoadFailed(_)
                | LedgerError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::{Money, ValidationError};

    #[test]
    fn test_core_message_passes_through() {
        let err: LedgerError = CoreError::PaymentExceedsBalance {
            requested: Money::from_cents(7_500),
            remaining: Money::from_cents(6_000),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Payment cannot exceed remaining balance of $60.00"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_categories() {
        assert_eq!(LedgerError::NoCheckoutUrl.to_string(), "No checkout URL returned");
        assert!(!LedgerError::NoCheckoutUrl.is_validation());
        assert!(LedgerError::InvalidConfig("x".into()).is_config_error());

        let err: LedgerError = CoreError::from(ValidationError::Required {
            field: "name".to_string(),
        })
        .into();
        assert!(!err.is_config_error());
    }
}
