//! # Payment Aggregator
//!
//! How much has been paid against an invoice, the owner overall, or one
//! calendar month.
//!
//! ## Per-Invoice Flow
//! ```text
//! total_paid(invoice_id)
//!      │
//!      ├── cache hit (age < 30s) ──────────────────────────► summary
//!      │
//!      ▼
//! fetch paid payments ──► Ok  ──► Σ amount, count ──► cache ──► summary
//!      │
//!      └──────────────► Err ──► warn!, zero + notice (not cached)
//! ```
//!
//! `refresh` skips the lookup and always overwrites the cached entry.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use nexus_core::dates::MonthKey;
use nexus_core::rollup::{paid_for_invoice, paid_in_month, paid_overall};
use nexus_core::{Money, PaymentTotal};

use crate::cache::SessionCaches;
use crate::source::LedgerSource;

// =============================================================================
// Payment Summary
// =============================================================================

/// Paid total as a view shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_paid: Money,
    pub payment_count: usize,
    /// True only before the first fetch has completed.
    pub loading: bool,
    /// Set when the fetch failed and the zeros are a placeholder.
    pub notice: Option<String>,
}

impl PaymentSummary {
    /// Initial state before anything has been fetched.
    pub fn loading() -> Self {
        PaymentSummary {
            total_paid: Money::zero(),
            payment_count: 0,
            loading: true,
            notice: None,
        }
    }

    fn from_total(total: PaymentTotal) -> Self {
        PaymentSummary {
            total_paid: total.total,
            payment_count: total.count,
            loading: false,
            notice: None,
        }
    }

    fn unavailable(notice: String) -> Self {
        PaymentSummary {
            total_paid: Money::zero(),
            payment_count: 0,
            loading: false,
            notice: Some(notice),
        }
    }

    /// True when nothing remains to be paid on `invoice_total`.
    pub fn covers(&self, invoice_total: Money) -> bool {
        self.total_paid >= invoice_total
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Payment totals over a [`LedgerSource`], cached per invoice.
pub struct PaymentAggregator<S> {
    source: Arc<S>,
    caches: Arc<SessionCaches>,
}

impl<S> Clone for PaymentAggregator<S> {
    fn clone(&self) -> Self {
        PaymentAggregator {
            source: Arc::clone(&self.source),
            caches: Arc::clone(&self.caches),
        }
    }
}

impl<S: LedgerSource> PaymentAggregator<S> {
    pub fn new(source: Arc<S>, caches: Arc<SessionCaches>) -> Self {
        PaymentAggregator { source, caches }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Paid total for one invoice, served from cache while fresh.
    pub async fn total_paid(&self, invoice_id: &str) -> PaymentSummary {
        if let Some(total) = self.caches.invoice_payments.get(invoice_id).await {
            debug!(invoice_id = %invoice_id, "Payment total cache hit");
            return PaymentSummary::from_total(total);
        }
        self.fetch_invoice(invoice_id).await
    }

    /// Re-fetches one invoice's paid total and overwrites the cache.
    pub async fn refresh(&self, invoice_id: &str) -> PaymentSummary {
        self.fetch_invoice(invoice_id).await
    }

    /// Drops the invoice's cached total and the owner's dashboard.
    pub async fn invalidate(&self, invoice_id: &str) {
        self.caches
            .invalidate_invoice(self.source.owner_id(), invoice_id)
            .await;
    }

    async fn fetch_invoice(&self, invoice_id: &str) -> PaymentSummary {
        match self.source.paid_payments_for_invoice(invoice_id).await {
            Ok(payments) => {
                let total = paid_for_invoice(&payments, invoice_id);
                self.caches
                    .invoice_payments
                    .insert(invoice_id.to_string(), total)
                    .await;
                PaymentSummary::from_total(total)
            }
            Err(e) => {
                warn!(invoice_id = %invoice_id, error = %e, "Failed to load invoice payments");
                PaymentSummary::unavailable(format!("Failed to load payments: {}", e))
            }
        }
    }

    /// Σ of every paid payment of the owner.
    pub async fn global_total(&self) -> PaymentSummary {
        match self.source.payments().await {
            Ok(payments) => PaymentSummary::from_total(paid_overall(&payments)),
            Err(e) => {
                warn!(error = %e, "Failed to load payments");
                PaymentSummary::unavailable(format!("Failed to load payments: {}", e))
            }
        }
    }

    /// Σ of paid payments settled in `month`.
    pub async fn monthly_total(&self, month: MonthKey) -> PaymentSummary {
        match self.source.payments().await {
            Ok(payments) => PaymentSummary::from_total(paid_in_month(&payments, month)),
            Err(e) => {
                warn!(month = %month.key(), error = %e, "Failed to load payments");
                PaymentSummary::unavailable(format!("Failed to load payments: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use nexus_core::PaymentStatus;

    use crate::source::fake::{payment, FakeSource};

    fn aggregator(source: FakeSource) -> (PaymentAggregator<FakeSource>, Arc<FakeSource>) {
        let source = Arc::new(source);
        let agg = PaymentAggregator::new(Arc::clone(&source), Arc::new(SessionCaches::default()));
        (agg, source)
    }

    #[tokio::test]
    async fn test_total_paid_counts_only_paid() {
        let (agg, _) = aggregator(FakeSource::new(
            vec![
                payment("inv-1", 4_000, PaymentStatus::Paid, Some(Utc::now())),
                payment("inv-1", 2_500, PaymentStatus::Paid, Some(Utc::now())),
                payment("inv-1", 9_000, PaymentStatus::Failed, None),
                payment("inv-2", 1_000, PaymentStatus::Paid, Some(Utc::now())),
            ],
            vec![],
        ));

        let summary = agg.total_paid("inv-1").await;
        assert_eq!(summary.total_paid, Money::from_cents(6_500));
        assert_eq!(summary.payment_count, 2);
        assert!(!summary.loading);
        assert!(summary.notice.is_none());
        assert!(summary.covers(Money::from_cents(6_500)));
        assert!(!summary.covers(Money::from_cents(6_501)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_within_ttl_then_refetched() {
        let (agg, source) = aggregator(FakeSource::new(
            vec![payment("inv-1", 1_000, PaymentStatus::Paid, Some(Utc::now()))],
            vec![],
        ));

        agg.total_paid("inv-1").await;
        source.push_payment(payment("inv-1", 500, PaymentStatus::Paid, Some(Utc::now())));

        tokio::time::advance(Duration::from_secs(29)).await;
        let cached = agg.total_paid("inv-1").await;
        assert_eq!(cached.total_paid, Money::from_cents(1_000));
        assert_eq!(source.payment_fetches(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        let fresh = agg.total_paid("inv-1").await;
        assert_eq!(fresh.total_paid, Money::from_cents(1_500));
        assert_eq!(source.payment_fetches(), 2);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let (agg, source) = aggregator(FakeSource::new(
            vec![payment("inv-1", 1_000, PaymentStatus::Paid, Some(Utc::now()))],
            vec![],
        ));
        agg.total_paid("inv-1").await;
        source.push_payment(payment("inv-1", 500, PaymentStatus::Paid, Some(Utc::now())));

        assert_eq!(agg.refresh("inv-1").await.total_paid, Money::from_cents(1_500));
        // The refreshed value is now what the cache serves.
        assert_eq!(agg.total_paid("inv-1").await.total_paid, Money::from_cents(1_500));
        assert_eq!(source.payment_fetches(), 2);
    }

    #[tokio::test]
    async fn test_failure_yields_notice_and_is_not_cached() {
        let (agg, source) = aggregator(FakeSource::new(
            vec![payment("inv-1", 1_000, PaymentStatus::Paid, Some(Utc::now()))],
            vec![],
        ));
        source.set_fail_payments(true);

        let failed = agg.total_paid("inv-1").await;
        assert_eq!(failed.total_paid, Money::zero());
        assert!(!failed.loading);
        assert!(failed.notice.as_deref().unwrap().starts_with("Failed to load payments"));

        source.set_fail_payments(false);
        let recovered = agg.total_paid("inv-1").await;
        assert_eq!(recovered.total_paid, Money::from_cents(1_000));
        assert!(recovered.notice.is_none());
        assert_eq!(source.payment_fetches(), 2);
    }

    #[tokio::test]
    async fn test_global_and_monthly_totals() {
        let march = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let (agg, _) = aggregator(FakeSource::new(
            vec![
                payment("inv-1", 1_000, PaymentStatus::Paid, Some(march)),
                payment("inv-2", 2_000, PaymentStatus::Paid, Some(april)),
                payment("inv-3", 4_000, PaymentStatus::Refunded, Some(april)),
                payment("inv-4", 8_000, PaymentStatus::Paid, None),
            ],
            vec![],
        ));

        let global = agg.global_total().await;
        assert_eq!(global.total_paid, Money::from_cents(11_000));
        assert_eq!(global.payment_count, 3);

        let april_total = agg.monthly_total(MonthKey::of(april)).await;
        assert_eq!(april_total.total_paid, Money::from_cents(2_000));
        assert_eq!(april_total.payment_count, 1);
    }

    #[test]
    fn test_loading_state() {
        let initial = PaymentSummary::loading();
        assert!(initial.loading);
        assert_eq!(initial.total_paid, Money::zero());
    }
}
