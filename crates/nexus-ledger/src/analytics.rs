//! # Analytics Service
//!
//! Loads payments, invoices and the client count side by side and builds the
//! analytics summary. Not cached; the page is opened rarely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use nexus_core::{analytics_rollup, AnalyticsSummary};

use crate::source::LedgerSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub summary: AnalyticsSummary,
    pub notices: Vec<String>,
}

pub struct AnalyticsService<S> {
    source: Arc<S>,
}

impl<S: LedgerSource> AnalyticsService<S> {
    pub fn new(source: Arc<S>) -> Self {
        AnalyticsService { source }
    }

    pub async fn summary(&self, now: DateTime<Utc>) -> AnalyticsView {
        let (payments, invoices, clients) = tokio::join!(
            self.source.payments(),
            self.source.active_invoices(),
            self.source.active_client_count()
        );

        let mut notices = Vec::new();
        let payments = payments.unwrap_or_else(|e| {
            warn!(error = %e, "Analytics payments fetch failed");
            notices.push(format!("Failed to load payments: {}", e));
            Vec::new()
        });
        let invoices = invoices.unwrap_or_else(|e| {
            warn!(error = %e, "Analytics invoices fetch failed");
            notices.push(format!("Failed to load invoices: {}", e));
            Vec::new()
        });
        let client_count = clients.unwrap_or_else(|e| {
            warn!(error = %e, "Analytics client count failed");
            notices.push(format!("Failed to load clients: {}", e));
            0
        });

        AnalyticsView {
            summary: analytics_rollup(&payments, &invoices, client_count, now),
            notices,
        }
    }
}
