//! # nexus-ledger: Session Services for Nexus Invoicing
//!
//! Everything a signed-in session does between the store and the screen:
//! cached payment totals, the dashboard and analytics rollups, the saved
//! create-invoice form, payment initiation and delete with undo.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Session Read Path                             │
//! │                                                                         │
//! │  DashboardService::stats(now)                                          │
//! │    │                                                                    │
//! │    ├── SessionCaches.dashboard (60s per owner) ── hit ──► DashboardView │
//! │    │                                                                    │
//! │    ▼ miss                                                               │
//! │  tokio::join!( payments(), active_invoices() )  ◄── LedgerSource       │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  nexus_core::dashboard_rollup ──► cache (only if nothing failed)        │
//! │                                                                         │
//! │  PaymentAggregator::total_paid(id)                                     │
//! │    └── SessionCaches.invoice_payments (30s per invoice)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Path
//! Every write that changes what the caches summarise drops the affected
//! entries, so the next read goes back to the store.
//!
//! ## Modules
//!
//! - [`source`] - Read seam over the store ([`LedgerSource`])
//! - [`cache`] - TTL caches shared by a session
//! - [`aggregator`] - Paid totals per invoice, month and owner
//! - [`dashboard`] - Cached dashboard stats
//! - [`analytics`] - Analytics page summary
//! - [`payments`] - Partial payment quotes and checkout redirects
//! - [`invoices`] - Quick-create, draft submission, delete and restore
//! - [`clients`] - Add client, cascade delete and undo
//! - [`settings`] - Profile and company settings
//! - [`drafts`] / [`scratch`] - Saved create-invoice form
//! - [`config`] - File and environment configuration
//! - [`error`] - Service errors

use tracing_subscriber::EnvFilter;

pub mod aggregator;
pub mod analytics;
pub mod cache;
pub mod clients;
pub mod config;
pub mod dashboard;
pub mod drafts;
pub mod error;
pub mod invoices;
pub mod payments;
pub mod scratch;
pub mod settings;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use aggregator::{PaymentAggregator, PaymentSummary};
pub use analytics::{AnalyticsService, AnalyticsView};
pub use cache::{SessionCaches, TtlCache};
pub use clients::{ClientDeletion, ClientService};
pub use config::LedgerConfig;
pub use dashboard::{DashboardService, DashboardView};
pub use drafts::DraftStore;
pub use error::{LedgerError, LedgerResult};
pub use invoices::{InvoiceDeletion, InvoiceService};
pub use payments::{ChargeInitiator, CheckoutSession, MockChargeInitiator, PaymentFlow, PaymentQuote};
pub use scratch::{FileScratchStore, MemoryScratchStore, ScratchStore};
pub use settings::SettingsService;
pub use source::{LedgerSource, StoreSource};

/// Installs the global fmt subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - everything at debug
/// - `RUST_LOG=nexus_ledger=trace` - trace for this crate only
/// - Default: info, debug for nexus crates, warn for sqlx
///
/// Calling it twice panics inside `tracing_subscriber`; binaries call it once
/// at startup.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nexus=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
