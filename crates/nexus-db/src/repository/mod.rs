//! # Repository Module
//!
//! Store repository implementations for Nexus Invoicing.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Ledger service                                                        │
//! │       │                                                                 │
//! │       │  db.invoices().list_active(owner_id)                           │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── list_active(&self, owner)                                         │
//! │  ├── get_by_id(&self, owner, id)                                       │
//! │  ├── insert_with_items(&self, owner, invoice, items)                   │
//! │  └── soft_delete / restore                                             │
//! │       │                                                                 │
//! │       │  SQL Query (owner filter on every statement)                   │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Clients and the soft-delete cascade
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoices and line items
//! - [`PaymentRepository`](payment::PaymentRepository) - Invoice payments
//! - [`SettingsRepository`](settings::SettingsRepository) - Profile and company settings

pub mod client;
pub mod invoice;
pub mod payment;
pub mod settings;
