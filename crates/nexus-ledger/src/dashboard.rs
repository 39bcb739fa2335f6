//! # Dashboard Service
//!
//! Fetches payments and invoices concurrently, rolls them up, and caches the
//! result per owner for 60 seconds.
//!
//! ```text
//!            ┌──────────────┐
//!            │ stats(now)   │── cache hit ──────────────────────┐
//!            └──────┬───────┘                                   │
//!                   ▼                                           │
//!    ┌──────────── join! ───────────┐                           │
//!    ▼                              ▼                           │
//! payments()                 active_invoices()                  │
//!    │  Err → warn!, []             │  Err → warn!, []          │
//!    └──────────────┬───────────────┘                           │
//!                   ▼                                           ▼
//!          dashboard_rollup(now) ── cached only if both Ok ─► DashboardView
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use nexus_core::{dashboard_rollup, DashboardStats};

use crate::cache::SessionCaches;
use crate::source::LedgerSource;

/// Dashboard stats plus the transient state a view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub loading: bool,
    /// One line per failed fetch; the matching input was treated as empty.
    pub notices: Vec<String>,
}

impl DashboardView {
    pub fn loading() -> Self {
        DashboardView {
            stats: DashboardStats::default(),
            loading: true,
            notices: Vec::new(),
        }
    }

    fn ready(stats: DashboardStats, notices: Vec<String>) -> Self {
        DashboardView {
            stats,
            loading: false,
            notices,
        }
    }
}

pub struct DashboardService<S> {
    source: Arc<S>,
    caches: Arc<SessionCaches>,
}

impl<S: LedgerSource> DashboardService<S> {
    pub fn new(source: Arc<S>, caches: Arc<SessionCaches>) -> Self {
        DashboardService { source, caches }
    }

    /// Dashboard stats, served from cache while fresh.
    pub async fn stats(&self, now: DateTime<Utc>) -> DashboardView {
        let owner_id = self.source.owner_id();
        if let Some(stats) = self.caches.dashboard.get(owner_id).await {
            debug!(owner_id = %owner_id, "Dashboard cache hit");
            return DashboardView::ready(stats, Vec::new());
        }
        self.load(now).await
    }

    /// Recomputes from fresh data and overwrites the cache.
    pub async fn refresh(&self, now: DateTime<Utc>) -> DashboardView {
        self.load(now).await
    }

    async fn load(&self, now: DateTime<Utc>) -> DashboardView {
        let owner_id = self.source.owner_id();
        let (payments, invoices) =
            tokio::join!(self.source.payments(), self.source.active_invoices());

        let mut notices = Vec::new();
        let payments = payments.unwrap_or_else(|e| {
            warn!(owner_id = %owner_id, error = %e, "Dashboard payments fetch failed");
            notices.push(format!("Failed to load payments: {}", e));
            Vec::new()
        });
        let invoices = invoices.unwrap_or_else(|e| {
            warn!(owner_id = %owner_id, error = %e, "Dashboard invoices fetch failed");
            notices.push(format!("Failed to load invoices: {}", e));
            Vec::new()
        });

        let stats = dashboard_rollup(&payments, &invoices, now);
        debug!(
            owner_id = %owner_id,
            payments = payments.len(),
            invoices = invoices.len(),
            "Dashboard rolled up"
        );

        if notices.is_empty() {
            self.caches
                .dashboard
                .insert(owner_id.to_string(), stats.clone())
                .await;
        }
        DashboardView::ready(stats, notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::TimeZone;
    use nexus_core::{DisplayStatus, InvoiceStatus, Money, PaymentStatus};

    use crate::source::fake::{invoice, payment, FakeSource, OWNER};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()
    }

    fn seeded() -> FakeSource {
        let now = now();
        FakeSource::new(
            vec![
                payment("a", 10_000, PaymentStatus::Paid, Some(now - chrono::Duration::days(2))),
                payment("b", 3_000, PaymentStatus::Paid, Some(now - chrono::Duration::days(40))),
                payment("c", 7_000, PaymentStatus::Pending, None),
            ],
            vec![
                invoice("a", InvoiceStatus::Paid, None, 10_000, now),
                invoice("b", InvoiceStatus::Sent, Some(now - chrono::Duration::days(1)), 6_000, now),
                invoice("c", InvoiceStatus::Sent, Some(now + chrono::Duration::days(5)), 7_000, now),
                invoice("d", InvoiceStatus::Draft, None, 1_000, now),
            ],
        )
    }

    fn service(source: FakeSource) -> (DashboardService<FakeSource>, Arc<FakeSource>, Arc<SessionCaches>) {
        let source = Arc::new(source);
        let caches = Arc::new(SessionCaches::default());
        (
            DashboardService::new(Arc::clone(&source), Arc::clone(&caches)),
            source,
            caches,
        )
    }

    #[tokio::test]
    async fn test_stats_roll_up_both_sources() {
        let (svc, _, _) = service(seeded());
        let view = svc.stats(now()).await;

        assert!(!view.loading);
        assert!(view.notices.is_empty());
        assert_eq!(view.stats.total_revenue, Money::from_cents(13_000));
        assert_eq!(view.stats.monthly_revenue, Money::from_cents(10_000));
        assert_eq!(view.stats.pending_count, 3);
        assert_eq!(view.stats.overdue_amount, Money::from_cents(6_000));
        assert_eq!(view.stats.revenue_series.len(), 6);

        let slices: Vec<DisplayStatus> =
            view.stats.status_breakdown.iter().map(|s| s.status).collect();
        assert_eq!(
            slices,
            vec![
                DisplayStatus::Paid,
                DisplayStatus::Pending,
                DisplayStatus::Overdue,
                DisplayStatus::Draft
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_for_a_minute() {
        let (svc, source, _) = service(seeded());
        svc.stats(now()).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        svc.stats(now()).await;
        assert_eq!(source.payment_fetches(), 1);
        assert_eq!(source.invoice_fetches(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        svc.stats(now()).await;
        assert_eq!(source.payment_fetches(), 2);
        assert_eq!(source.invoice_fetches(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_treated_as_empty_and_not_cached() {
        let (svc, source, caches) = service(seeded());
        source.set_fail_invoices(true);

        let view = svc.stats(now()).await;
        assert_eq!(view.notices.len(), 1);
        assert!(view.notices[0].starts_with("Failed to load invoices"));
        assert_eq!(view.stats.total_revenue, Money::from_cents(13_000));
        assert_eq!(view.stats.pending_count, 0);
        assert!(caches.dashboard.get(OWNER).await.is_none());

        source.set_fail_invoices(false);
        let view = svc.stats(now()).await;
        assert!(view.notices.is_empty());
        assert_eq!(view.stats.pending_count, 3);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let (svc, source, caches) = service(seeded());
        svc.stats(now()).await;
        caches.invalidate_dashboard(OWNER).await;
        svc.stats(now()).await;
        assert_eq!(source.payment_fetches(), 2);
    }

    #[tokio::test]
    async fn test_refresh_always_fetches() {
        let (svc, source, _) = service(seeded());
        svc.stats(now()).await;
        svc.refresh(now()).await;
        assert_eq!(source.invoice_fetches(), 2);
    }
}
