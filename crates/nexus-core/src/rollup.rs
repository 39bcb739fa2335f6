//! # Dashboard Rollup
//!
//! Folds an owner's payments and active invoices into the dashboard cards.
//!
//! ## Inputs → Outputs
//! ```text
//! ┌──────────────┐      ┌──────────────────────────────────────────────┐
//! │ payments     │─────►│ total_revenue     Σ settled                  │
//! │              │─────►│ monthly_revenue   Σ settled, this month      │
//! │              │─────►│ revenue_series    6 dense monthly buckets    │
//! ├──────────────┤      ├──────────────────────────────────────────────┤
//! │ invoices     │─────►│ pending_count     status ≠ paid              │
//! │ (not deleted)│─────►│ overdue_amount    pending with due < now     │
//! │              │─────►│ status_breakdown  four overlapping filters   │
//! └──────────────┘      └──────────────────────────────────────────────┘
//! ```
//!
//! ## Breakdown Filters
//! Unlike the analytics counts, the dashboard buckets are not a partition.
//! A dated draft lands in Draft and also in Pending or Overdue. A non-paid,
//! non-draft invoice without a due date lands nowhere.
//! ```text
//! Paid     status = paid
//! Pending  status ≠ paid, due ≥ now
//! Overdue  status ≠ paid, due < now
//! Draft    status = draft
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dates::{is_past_due, start_of_month, trailing_months, MonthKey};
use crate::money::Money;
use crate::status::DisplayStatus;
use crate::types::{Invoice, InvoiceStatus, Payment, PaymentStatus};

/// Number of months in the revenue chart.
pub const REVENUE_WINDOW_MONTHS: u32 = 6;

/// Display order of the status breakdown.
pub const BREAKDOWN_ORDER: [DisplayStatus; 4] = [
    DisplayStatus::Paid,
    DisplayStatus::Pending,
    DisplayStatus::Overdue,
    DisplayStatus::Draft,
];

// =============================================================================
// Payment Sums
// =============================================================================

/// Sum and count of a set of payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTotal {
    pub total: Money,
    pub count: usize,
}

impl PaymentTotal {
    fn fold<'a>(payments: impl Iterator<Item = &'a Payment>) -> Self {
        payments.fold(PaymentTotal::default(), |mut acc, p| {
            acc.total += p.amount();
            acc.count += 1;
            acc
        })
    }
}

/// Σ of `paid` payments recorded against one invoice.
pub fn paid_for_invoice(payments: &[Payment], invoice_id: &str) -> PaymentTotal {
    PaymentTotal::fold(
        payments
            .iter()
            .filter(|p| p.invoice_id == invoice_id && p.payment_status == PaymentStatus::Paid),
    )
}

/// Σ of every `paid` payment in the slice.
pub fn paid_overall(payments: &[Payment]) -> PaymentTotal {
    PaymentTotal::fold(
        payments
            .iter()
            .filter(|p| p.payment_status == PaymentStatus::Paid),
    )
}

/// Σ of `paid` payments whose `paid_at` falls in `month`.
pub fn paid_in_month(payments: &[Payment], month: MonthKey) -> PaymentTotal {
    PaymentTotal::fold(payments.iter().filter(|p| {
        p.payment_status == PaymentStatus::Paid && p.paid_at.is_some_and(|at| month.contains(at))
    }))
}

/// Σ of settled payment amounts matching `pred` on `paid_at`.
fn settled_sum(payments: &[Payment], pred: impl Fn(DateTime<Utc>) -> bool) -> Money {
    payments
        .iter()
        .filter(|p| p.is_settled())
        .filter_map(|p| p.paid_at.filter(|at| pred(*at)).map(|_| p.amount()))
        .sum()
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// One bar of the revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenuePoint {
    pub month: MonthKey,
    /// Short month name.
    pub label: String,
    pub revenue: Money,
}

/// One slice of the status pie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusSlice {
    pub status: DisplayStatus,
    pub label: String,
    pub count: usize,
    pub tone: String,
}

/// Everything the dashboard cards and charts show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_revenue: Money,
    pub monthly_revenue: Money,
    pub pending_count: usize,
    pub overdue_amount: Money,
    pub revenue_series: Vec<RevenuePoint>,
    pub status_breakdown: Vec<StatusSlice>,
}

/// Computes dashboard stats. `invoices` must already exclude soft-deleted rows.
///
/// Only settled payments count as revenue.
pub fn dashboard_rollup(
    payments: &[Payment],
    invoices: &[Invoice],
    now: DateTime<Utc>,
) -> DashboardStats {
    let month_start = start_of_month(now);

    let total_revenue = settled_sum(payments, |_| true);
    let monthly_revenue = settled_sum(payments, |at| at >= month_start && at < now);

    let pending: Vec<&Invoice> = invoices
        .iter()
        .filter(|inv| inv.status != InvoiceStatus::Paid)
        .collect();
    let overdue_amount = pending
        .iter()
        .filter(|inv| is_past_due(inv.due_date, now))
        .map(|inv| inv.total())
        .sum();

    DashboardStats {
        total_revenue,
        monthly_revenue,
        pending_count: pending.len(),
        overdue_amount,
        revenue_series: revenue_series(payments, now),
        status_breakdown: status_breakdown(invoices, now),
    }
}

/// Dense trailing revenue series, oldest month first.
pub fn revenue_series(payments: &[Payment], now: DateTime<Utc>) -> Vec<RevenuePoint> {
    trailing_months(now, REVENUE_WINDOW_MONTHS)
        .into_iter()
        .map(|month| RevenuePoint {
            month,
            label: month.short_name().to_string(),
            revenue: settled_sum(payments, |at| month.contains(at)),
        })
        .collect()
}

/// Whether `inv` belongs in the dashboard bucket `bucket`.
fn in_dashboard_bucket(bucket: DisplayStatus, inv: &Invoice, now: DateTime<Utc>) -> bool {
    let unpaid = inv.status != InvoiceStatus::Paid;
    match bucket {
        DisplayStatus::Paid => !unpaid,
        DisplayStatus::Pending => unpaid && matches!(inv.due_date, Some(due) if due >= now),
        DisplayStatus::Overdue => unpaid && is_past_due(inv.due_date, now),
        DisplayStatus::Draft => inv.status == InvoiceStatus::Draft,
    }
}

/// Dashboard counts per display category, from status and due date only.
///
/// Each bucket is an independent filter (see the module docs), so one invoice
/// can count twice and some count nowhere. Categories with a zero count are
/// omitted.
pub fn status_breakdown(invoices: &[Invoice], now: DateTime<Utc>) -> Vec<StatusSlice> {
    BREAKDOWN_ORDER
        .iter()
        .map(|bucket| {
            let count = invoices
                .iter()
                .filter(|inv| in_dashboard_bucket(*bucket, inv, now))
                .count();
            (bucket, count)
        })
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| StatusSlice {
            status: *status,
            label: status.label().to_string(),
            count,
            tone: status.tone().to_string(),
        })
        .collect()
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Row builders shared by the unit tests of this crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn invoice(
        status: InvoiceStatus,
        due: Option<DateTime<Utc>>,
        total_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Invoice {
        Invoice {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "owner-1".to_string(),
            client_id: "client-1".to_string(),
            invoice_number: None,
            status,
            issue_date: created_at,
            due_date: due,
            subtotal_cents: total_cents,
            tax_rate_bps: 0,
            tax_cents: 0,
            total_cents,
            notes: None,
            is_deleted: false,
            deleted_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn payment(
        invoice_id: &str,
        cents: i64,
        status: PaymentStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Payment {
        Payment {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            user_id: "owner-1".to_string(),
            amount_cents: cents,
            payment_status: status,
            method: None,
            transaction_id: None,
            notes: None,
            paid_at,
            created_at: paid_at.unwrap_or_else(Utc::now),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::fixtures::{invoice, payment};
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_paid_sums() {
        let payments = vec![
            payment("a", 4_000, PaymentStatus::Paid, Some(at(2026, 9, 2))),
            payment("a", 1_000, PaymentStatus::Pending, None),
            payment("b", 2_500, PaymentStatus::Paid, Some(at(2026, 10, 3))),
        ];

        let a = paid_for_invoice(&payments, "a");
        assert_eq!(a.total.cents(), 4_000);
        assert_eq!(a.count, 1);

        assert_eq!(paid_overall(&payments).total.cents(), 6_500);

        let oct = paid_in_month(&payments, MonthKey { year: 2026, month: 10 });
        assert_eq!(oct.total.cents(), 2_500);
    }

    #[test]
    fn test_revenue_counts_only_settled() {
        let now = at(2026, 10, 14);
        let payments = vec![
            payment("a", 10_000, PaymentStatus::Paid, Some(at(2026, 10, 2))),
            payment("a", 7_000, PaymentStatus::Paid, None),
            payment("b", 3_000, PaymentStatus::Refunded, Some(at(2026, 10, 3))),
            payment("c", 5_000, PaymentStatus::Paid, Some(at(2026, 8, 20))),
        ];

        let stats = dashboard_rollup(&payments, &[], now);
        assert_eq!(stats.total_revenue.cents(), 15_000);
        assert_eq!(stats.monthly_revenue.cents(), 10_000);
    }

    #[test]
    fn test_december_payment_in_december_bucket() {
        let now = at(2027, 1, 10);
        let payments = vec![payment(
            "a",
            9_900,
            PaymentStatus::Paid,
            Some(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap()),
        )];

        let series = revenue_series(&payments, now);
        assert_eq!(series.len(), 6);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Aug", "Sep", "Oct", "Nov", "Dec", "Jan"]);
        assert_eq!(series[4].revenue.cents(), 9_900);
        assert_eq!(series[3].revenue, Money::zero());
        assert_eq!(series[5].revenue, Money::zero());
    }

    #[test]
    fn test_series_is_dense_with_no_payments() {
        let series = revenue_series(&[], at(2026, 10, 14));
        assert_eq!(series.len(), 6);
        assert!(series.iter().all(|p| p.revenue.is_zero()));
    }

    #[test]
    fn test_pending_and_overdue() {
        let now = at(2026, 10, 14);
        let past = Some(now - Duration::days(3));
        let future = Some(now + Duration::days(3));
        let invoices = vec![
            invoice(InvoiceStatus::Paid, past, 1_000, now),
            invoice(InvoiceStatus::Sent, past, 2_000, now),
            invoice(InvoiceStatus::Sent, future, 4_000, now),
            invoice(InvoiceStatus::Draft, past, 8_000, now),
        ];

        let stats = dashboard_rollup(&[], &invoices, now);
        assert_eq!(stats.pending_count, 3);
        // Drafts past their due date still count toward the overdue amount.
        assert_eq!(stats.overdue_amount.cents(), 10_000);
    }

    #[test]
    fn test_breakdown_order_and_zero_buckets() {
        let now = at(2026, 10, 14);
        let past = Some(now - Duration::days(3));
        let invoices = vec![
            invoice(InvoiceStatus::Draft, None, 100, now),
            invoice(InvoiceStatus::Sent, past, 100, now),
            invoice(InvoiceStatus::Paid, None, 100, now),
            invoice(InvoiceStatus::Paid, past, 100, now),
        ];

        let slices = status_breakdown(&invoices, now);
        let got: Vec<(DisplayStatus, usize)> =
            slices.iter().map(|s| (s.status, s.count)).collect();
        assert_eq!(
            got,
            vec![
                (DisplayStatus::Paid, 2),
                (DisplayStatus::Overdue, 1),
                (DisplayStatus::Draft, 1),
            ]
        );
        assert_eq!(slices[1].tone, "destructive");
    }

    #[test]
    fn test_breakdown_counts_dated_drafts_twice_and_skips_undated_sent() {
        let now = at(2026, 10, 14);
        let invoices = vec![
            invoice(InvoiceStatus::Draft, Some(now + Duration::days(3)), 100, now),
            invoice(InvoiceStatus::Draft, Some(now - Duration::days(3)), 100, now),
            invoice(InvoiceStatus::Sent, None, 100, now),
        ];

        let got: Vec<(DisplayStatus, usize)> = status_breakdown(&invoices, now)
            .iter()
            .map(|s| (s.status, s.count))
            .collect();
        assert_eq!(
            got,
            vec![
                (DisplayStatus::Pending, 1),
                (DisplayStatus::Overdue, 1),
                (DisplayStatus::Draft, 2),
            ]
        );
    }

    #[test]
    fn test_breakdown_due_now_is_pending() {
        let now = at(2026, 10, 14);
        let invoices = vec![invoice(InvoiceStatus::Overdue, Some(now), 100, now)];

        let slices = status_breakdown(&invoices, now);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].status, DisplayStatus::Pending);
        assert_eq!(slices[0].label, "Pending");
    }
}
