//! # Analytics Rollup
//!
//! Long-range figures for the analytics page: all-time revenue, invoice
//! counts by category, client count and a six-month table.
//!
//! Revenue here sums every payment with `paid_at` set
//! ([`Payment::has_paid_at`]), matching the dashboard only when all such rows
//! carry status `paid`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dates::{trailing_months, MonthKey};
use crate::money::Money;
use crate::rollup::REVENUE_WINDOW_MONTHS;
use crate::status::{approximate_status, DisplayStatus};
use crate::types::{Invoice, InvoiceStatus, Payment};

/// Invoice counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceCounts {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
    pub draft: usize,
}

/// One row of the monthly table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthStats {
    /// `YYYY-MM`.
    pub key: String,
    pub label: String,
    pub revenue: Money,
    /// Invoices with status `paid` created in this month.
    pub paid_invoices: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyticsSummary {
    pub total_revenue: Money,
    pub counts: InvoiceCounts,
    pub client_count: usize,
    pub months: Vec<MonthStats>,
}

impl AnalyticsSummary {
    /// All-time revenue divided by invoice count, rounded to the cent.
    pub fn average_invoice_value(&self) -> Money {
        if self.counts.total == 0 {
            return Money::zero();
        }
        let n = self.counts.total as i64;
        let cents = self.total_revenue.cents();
        Money::from_cents((cents + n / 2).div_euclid(n))
    }

    /// Share of invoices with status `paid`, in percent.
    pub fn paid_rate_percent(&self) -> f64 {
        if self.counts.total == 0 {
            return 0.0;
        }
        self.counts.paid as f64 / self.counts.total as f64 * 100.0
    }
}

/// Whole-number percentage of `part` in `total`; zero when `total` is zero.
pub fn percent_of(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Builds the analytics summary. `invoices` must exclude soft-deleted rows.
pub fn analytics_rollup(
    payments: &[Payment],
    invoices: &[Invoice],
    client_count: usize,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let paid_at_amounts = paid_at_amounts(payments);

    let total_revenue = paid_at_amounts.iter().map(|(_, amount)| *amount).sum();

    let mut counts = InvoiceCounts {
        total: invoices.len(),
        ..InvoiceCounts::default()
    };
    for inv in invoices {
        match approximate_status(inv.status, inv.due_date, now) {
            DisplayStatus::Paid => counts.paid += 1,
            DisplayStatus::Draft => counts.draft += 1,
            DisplayStatus::Overdue => counts.overdue += 1,
            DisplayStatus::Pending => counts.pending += 1,
        }
    }

    let months = trailing_months(now, REVENUE_WINDOW_MONTHS)
        .into_iter()
        .map(|month| month_stats(month, &paid_at_amounts, invoices))
        .collect();

    AnalyticsSummary {
        total_revenue,
        counts,
        client_count,
        months,
    }
}

/// `(paid_at, amount)` for every payment with a payment date, whatever its
/// status. Not [`Payment::is_settled`]: a refunded row still counts.
fn paid_at_amounts(payments: &[Payment]) -> Vec<(DateTime<Utc>, Money)> {
    payments
        .iter()
        .filter_map(|p| p.paid_at.map(|at| (at, p.amount())))
        .collect()
}

fn month_stats(
    month: MonthKey,
    paid_at_amounts: &[(DateTime<Utc>, Money)],
    invoices: &[Invoice],
) -> MonthStats {
    MonthStats {
        key: month.key(),
        label: month.short_name().to_string(),
        revenue: paid_at_amounts
            .iter()
            .filter(|(at, _)| month.contains(*at))
            .map(|(_, amount)| *amount)
            .sum(),
        paid_invoices: invoices
            .iter()
            .filter(|inv| inv.status == InvoiceStatus::Paid && month.contains(inv.created_at))
            .count(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
