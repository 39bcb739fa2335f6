//! # Invoice Status Classifier
//!
//! Derives the status shown to users from stored fields.
//!
//! ## Two Classifiers, On Purpose
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  classify()             precise, per invoice row                        │
//! │    inputs: stored status, due date, total owed, total PAID              │
//! │    a draft that has been paid in full shows as Paid                     │
//! │                                                                         │
//! │  approximate_status()   cheap, used by the analytics counts             │
//! │    inputs: stored status, due date only (no payment lookup)             │
//! │    a draft that has been paid in full still counts as Draft             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The two can disagree for the same invoice. Analytics counts depend on the
//! approximate one, so they are kept as separate functions. The dashboard
//! breakdown uses neither (see [`crate::rollup::status_breakdown`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dates::is_past_due;
use crate::money::Money;
use crate::types::InvoiceStatus;

/// The status label displayed for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DisplayStatus {
    Paid,
    Draft,
    Overdue,
    Pending,
}

impl DisplayStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Paid => "Paid",
            DisplayStatus::Draft => "Draft",
            DisplayStatus::Overdue => "Overdue",
            DisplayStatus::Pending => "Pending",
        }
    }

    /// Style tone the front end maps to a badge color.
    pub fn tone(&self) -> &'static str {
        match self {
            DisplayStatus::Paid => "success",
            DisplayStatus::Draft => "muted",
            DisplayStatus::Overdue => "destructive",
            DisplayStatus::Pending => "warning",
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of the precise classifier for one invoice row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Classification {
    pub status: DisplayStatus,
    /// `total_owed - total_paid`. Zero or negative when fully paid.
    pub pending_amount: Money,
}

impl Classification {
    /// True when nothing remains to be paid.
    #[inline]
    pub fn is_fully_paid(&self) -> bool {
        !self.pending_amount.is_positive()
    }
}

/// Precise per-invoice classification. First matching rule wins:
///
/// 1. Paid in full (`total_paid >= total_owed`) or stored `paid` → **Paid**
/// 2. Stored `draft` → **Draft**
/// 3. Due date set and strictly before `now` → **Overdue**
/// 4. Otherwise → **Pending**
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use nexus_core::money::Money;
/// use nexus_core::status::{classify, DisplayStatus};
/// use nexus_core::types::InvoiceStatus;
///
/// let now = Utc::now();
/// let c = classify(
///     InvoiceStatus::Sent,
///     Some(now + Duration::days(1)),
///     Money::from_cents(10_000),
///     Money::from_cents(4_000),
///     now,
/// );
/// assert_eq!(c.status, DisplayStatus::Pending);
/// assert_eq!(c.pending_amount.cents(), 6_000);
/// ```
pub fn classify(
    stored: InvoiceStatus,
    due_date: Option<DateTime<Utc>>,
    total_owed: Money,
    total_paid: Money,
    now: DateTime<Utc>,
) -> Classification {
    let pending_amount = total_owed - total_paid;

    let status = if !pending_amount.is_positive() || stored == InvoiceStatus::Paid {
        DisplayStatus::Paid
    } else if stored == InvoiceStatus::Draft {
        DisplayStatus::Draft
    } else if is_past_due(due_date, now) {
        DisplayStatus::Overdue
    } else {
        DisplayStatus::Pending
    };

    Classification {
        status,
        pending_amount,
    }
}

/// Approximate classification from stored status and due date only.
///
/// Used for dashboard and analytics counts where a payment lookup per
/// invoice is not performed.
pub fn approximate_status(
    stored: InvoiceStatus,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DisplayStatus {
    match stored {
        InvoiceStatus::Paid => DisplayStatus::Paid,
        InvoiceStatus::Draft => DisplayStatus::Draft,
        _ if is_past_due(due_date, now) => DisplayStatus::Overdue,
        _ => DisplayStatus::Pending,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
