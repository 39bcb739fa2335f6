//! # nexus-db: Store Layer for Nexus Invoicing
//!
//! This crate provides persistence for the invoicing dashboard.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nexus Data Flow                                  │
//! │                                                                         │
//! │  nexus-ledger service (dashboard, aggregator, client flows)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nexus-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ClientRepo    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ InvoiceRepo   │    │  _schema.sql │  │   │
//! │  │   │               │    │ PaymentRepo   │    │              │  │   │
//! │  │   │               │    │ SettingsRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/nexus.db                                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nexus_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/nexus.db")).await?;
//! let invoices = db.invoices().list_active(owner_id).await?;
//! ```
//!
//! Every query is filtered by owner. Row ownership is the only access rule.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConstraintKind, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::client::{CascadeOutcome, ClientRepository};
pub use repository::invoice::InvoiceRepository;
pub use repository::payment::PaymentRepository;
pub use repository::settings::SettingsRepository;
