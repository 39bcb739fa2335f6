//! # Session Caches
//!
//! Time-bounded caches shared by the aggregator and dashboard services.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TtlCache Entry Lifecycle                         │
//! │                                                                         │
//! │   insert(k, v)        get(k) while age < ttl        get(k) after ttl   │
//! │  ─────────────►  Fresh ─────────────────────► Hit   ────────────► Miss │
//! │                    │                                                    │
//! │                    │ invalidate(k) / clear()                            │
//! │                    ▼                                                    │
//! │                  Gone ──────────────────────────────────────────► Miss │
//! │                                                                         │
//! │  Readers never block each other (RwLock). A refresh simply inserts     │
//! │  over the old entry; the last writer wins.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clock is `tokio::time::Instant`, so tests can pause and advance it.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use nexus_core::{DashboardStats, PaymentTotal};

use crate::config::CacheSettings;

// =============================================================================
// TtlCache
// =============================================================================

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    cached_at: Instant,
}

/// A map whose entries expire `ttl` after they were written.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the value if it was written less than `ttl` ago.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Stores `value`, replacing any previous entry and resetting its age.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drops one entry. Returns true if something was removed.
    pub async fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// SessionCaches
// =============================================================================

/// Per-invoice payment totals cache TTL.
pub const INVOICE_PAYMENTS_TTL: Duration = Duration::from_secs(30);

/// Dashboard rollup cache TTL.
pub const DASHBOARD_TTL: Duration = Duration::from_secs(60);

/// The caches one signed-in session shares across services.
///
/// Wrap in an `Arc` and hand the same instance to every service so that
/// a mutation in one invalidates what the others read.
#[derive(Debug)]
pub struct SessionCaches {
    /// Paid totals keyed by invoice id.
    pub invoice_payments: TtlCache<String, PaymentTotal>,
    /// Dashboard stats keyed by owner id.
    pub dashboard: TtlCache<String, DashboardStats>,
}

impl Default for SessionCaches {
    fn default() -> Self {
        SessionCaches::new(INVOICE_PAYMENTS_TTL, DASHBOARD_TTL)
    }
}

impl SessionCaches {
    pub fn new(invoice_ttl: Duration, dashboard_ttl: Duration) -> Self {
        SessionCaches {
            invoice_payments: TtlCache::new(invoice_ttl),
            dashboard: TtlCache::new(dashboard_ttl),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        SessionCaches::new(settings.invoice_ttl(), settings.dashboard_ttl())
    }

    /// Forgets everything derived from one invoice's payments.
    pub async fn invalidate_invoice(&self, owner_id: &str, invoice_id: &str) {
        debug!(invoice_id = %invoice_id, "Invalidating invoice caches");
        self.invoice_payments.invalidate(invoice_id).await;
        self.dashboard.invalidate(owner_id).await;
    }

    /// Forgets the owner's dashboard rollup.
    pub async fn invalidate_dashboard(&self, owner_id: &str) {
        debug!(owner_id = %owner_id, "Invalidating dashboard cache");
        self.dashboard.invalidate(owner_id).await;
    }

    pub async fn clear(&self) {
        self.invoice_payments.clear().await;
        self.dashboard.clear().await;
    }
}
