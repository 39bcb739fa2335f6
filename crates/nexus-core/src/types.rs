//! # Domain Types
//!
//! Core domain types read and derived by the computation layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │    Invoice      │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  client_id (FK) │◄──│  invoice_id(FK) │       │
//! │  │  name, email    │   │  status         │   │  amount_cents   │       │
//! │  │  is_deleted     │   │  total_cents    │   │  payment_status │       │
//! │  └─────────────────┘   │  due_date       │   │  paid_at        │       │
//! │                        └────────┬────────┘   └─────────────────┘       │
//! │                                 │ owns                                  │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │    LineItem     │   │ Profile/Company │       │
//! │                        │  quantity, rate │   │  one per user   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Delete
//! Clients and invoices are never physically removed. `is_deleted` plus
//! `deleted_at` hide them; clearing both restores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage as typed into the invoice form.
    ///
    /// Negative and non-finite rates clamp to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate(0);
        }
        TaxRate((pct * 100.0).round().min(u32::MAX as f64) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Stored Statuses
// =============================================================================

/// Invoice status as persisted in the store.
///
/// This is NOT what the dashboard shows; see [`crate::status::DisplayStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Created but not sent.
    #[default]
    Draft,
    /// Sent to the client, awaiting payment.
    Sent,
    /// Marked paid.
    Paid,
    /// Marked overdue.
    Overdue,
}

/// Settlement status of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Failed,
    Refunded,
}

/// UI theme preference stored on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

// =============================================================================
// Client
// =============================================================================

/// A customer that invoices are addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user.
    pub user_id: String,

    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,

    /// Soft delete flag. Visible clients have `false`.
    pub is_deleted: bool,

    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice header with its stored monetary fields.
///
/// ## Invariants (at creation, not re-validated on read)
/// - `total_cents = subtotal_cents + tax_cents`
/// - `tax_cents = subtotal_cents × tax_rate / 100`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    pub client_id: String,

    /// Human-readable number, e.g. `INV.2026.1014.09`.
    pub invoice_number: Option<String>,

    pub status: InvoiceStatus,

    #[ts(as = "String")]
    pub issue_date: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,

    pub subtotal_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,

    pub notes: Option<String>,

    pub is_deleted: bool,

    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn tax_amount(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Number shown to users, falling back to the first 8 characters of the id.
    pub fn display_number(&self) -> String {
        match &self.invoice_number {
            Some(number) if !number.is_empty() => number.clone(),
            _ => self.id.chars().take(8).collect(),
        }
    }
}

/// A line item belonging to exactly one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    /// Whole units, never negative.
    pub quantity: i64,
    pub rate_cents: i64,
    /// `quantity × rate_cents`.
    pub amount_cents: i64,
    /// Display order within the invoice.
    pub position: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Invoice header fields for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInvoice {
    pub client_id: String,
    pub invoice_number: Option<String>,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub issue_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total: Money,
    pub notes: Option<String>,
}

/// Line item fields for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: i64,
    pub rate: Money,
    pub amount: Money,
    pub position: i64,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment towards an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub user_id: String,
    /// Amount in cents.
    pub amount_cents: i64,
    pub payment_status: PaymentStatus,
    pub method: Option<String>,
    /// Processor reference.
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    /// Null until the processor settles the payment.
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// A settled payment has `paid_at` set and status `paid`.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.has_paid_at() && self.payment_status == PaymentStatus::Paid
    }

    /// `paid_at` is set, whatever the status. Analytics revenue counts these.
    #[inline]
    pub fn has_paid_at(&self) -> bool {
        self.paid_at.is_some()
    }
}

/// Payment fields for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPayment {
    pub invoice_id: String,
    pub amount: Money,
    pub payment_status: PaymentStatus,
    pub method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Profile & Company Settings
// =============================================================================

/// Per-user profile and preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Profile {
    /// Same as the authenticated user id.
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: ThemeMode,
    pub email_opt_in: bool,
    pub default_currency: String,
    pub default_tax_rate_bps: u32,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: ThemeMode,
    pub email_opt_in: bool,
}

impl Default for ProfileUpdate {
    fn default() -> Self {
        ProfileUpdate {
            full_name: None,
            avatar_url: None,
            theme: ThemeMode::System,
            email_opt_in: true,
        }
    }
}

/// Company details printed on invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanySettings {
    pub id: String,
    /// Unique per user.
    pub user_id: String,
    pub company_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable company fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyUpdate {
    pub company_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

/// Maps an empty or whitespace-only form value to `None`.
///
/// Optional text columns store NULL rather than empty strings.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
