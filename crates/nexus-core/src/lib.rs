//! # nexus-core: Pure Computation Layer for Nexus Invoicing
//!
//! Every number the invoicing dashboard shows is derived here from stored
//! rows. The crate performs no I/O and never reads the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Nexus Invoicing Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web front end                                │   │
//! │  │   Dashboard ──► Invoices ──► Create Invoice ──► Analytics       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 nexus-ledger (session services)                 │   │
//! │  │   caches, aggregator, dashboard, drafts, payment flow           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nexus-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │ status  │ │ totals  │ │ rollup  │ │  draft  │  │   │
//! │  │   │  dates  │ │classify │ │ line    │ │analytics│ │ charge  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nexus-db (store layer)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Client, Invoice, LineItem, Payment, Profile)
//! - [`money`] - Money type with integer cents
//! - [`dates`] - Month buckets, due-date checks, invoice number preview
//! - [`status`] - Precise and approximate status classifiers
//! - [`totals`] - Line-item subtotal/tax/total
//! - [`rollup`] - Dashboard stats and payment sums
//! - [`analytics`] - Analytics page summary
//! - [`draft`] - Create-invoice form model
//! - [`charge`] - Partial payment validation and charge requests
//! - [`validation`] - Field validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use nexus_core::money::Money;
//! use nexus_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(12_500); // $125.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(1_000)); // 10%
//! assert_eq!((subtotal + tax).cents(), 13_750);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod charge;
pub mod dates;
pub mod draft;
pub mod error;
pub mod money;
pub mod rollup;
pub mod status;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{analytics_rollup, AnalyticsSummary};
pub use draft::InvoiceDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rollup::{dashboard_rollup, DashboardStats, PaymentTotal};
pub use status::{approximate_status, classify, DisplayStatus};
pub use totals::{compute_totals, InvoiceTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest stored line-item description, in characters.
///
/// ## Business Reason
/// Longer text is cut at submission rather than rejected so a pasted
/// paragraph never blocks saving the invoice.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Storage slot holding the create-invoice form.
pub const DRAFT_SLOT: &str = "invoice_draft";
