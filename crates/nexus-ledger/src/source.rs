//! # Ledger Sources
//!
//! The read side of the store as the services see it.
//!
//! ```text
//! ┌──────────────────┐      ┌───────────────────────┐      ┌──────────────┐
//! │ PaymentAggregator│      │      LedgerSource     │      │  nexus-db    │
//! │ DashboardService │ ───► │  (trait, owner-bound) │ ───► │  Database    │
//! │ AnalyticsService │      │                       │      │  (SQLite)    │
//! └──────────────────┘      └───────────────────────┘      └──────────────┘
//!                                      ▲
//!                                      └── in-crate fakes in tests
//! ```
//!
//! A source is bound to one owner. Every fetch is already scoped to that
//! owner's rows, so services never pass an owner id around.

use std::future::Future;

use nexus_core::{Invoice, Payment};
use nexus_db::Database;

use crate::error::LedgerResult;

/// Owner-scoped reads needed by the derived views.
pub trait LedgerSource: Send + Sync {
    /// The owner every fetch is filtered by.
    fn owner_id(&self) -> &str;

    /// Payments with status `paid` against one invoice.
    fn paid_payments_for_invoice(
        &self,
        invoice_id: &str,
    ) -> impl Future<Output = LedgerResult<Vec<Payment>>> + Send;

    /// Every payment of the owner, any status.
    fn payments(&self) -> impl Future<Output = LedgerResult<Vec<Payment>>> + Send;

    /// Invoices that are not soft-deleted.
    fn active_invoices(&self) -> impl Future<Output = LedgerResult<Vec<Invoice>>> + Send;

    /// Number of clients that are not soft-deleted.
    fn active_client_count(&self) -> impl Future<Output = LedgerResult<usize>> + Send;
}

/// [`LedgerSource`] over the SQLite store.
#[derive(Debug, Clone)]
pub struct StoreSource {
    db: Database,
    owner_id: String,
}

impl StoreSource {
    pub fn new(db: Database, owner_id: impl Into<String>) -> Self {
        StoreSource {
            db,
            owner_id: owner_id.into(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl LedgerSource for StoreSource {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    async fn paid_payments_for_invoice(&self, invoice_id: &str) -> LedgerResult<Vec<Payment>> {
        Ok(self
            .db
            .payments()
            .paid_for_invoice(&self.owner_id, invoice_id)
            .await?)
    }

    async fn payments(&self) -> LedgerResult<Vec<Payment>> {
        Ok(self.db.payments().list_for_owner(&self.owner_id).await?)
    }

    async fn active_invoices(&self) -> LedgerResult<Vec<Invoice>> {
        Ok(self.db.invoices().list_active(&self.owner_id).await?)
    }

    async fn active_client_count(&self) -> LedgerResult<usize> {
        let count = self.db.clients().count_active(&self.owner_id).await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

// =============================================================================
// Test Fakes
// =============================================================================

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use nexus_core::{InvoiceStatus, PaymentStatus};
    use nexus_db::DbError;

    use crate::error::LedgerError;

    pub const OWNER: &str = "owner-1";

    pub fn invoice(
        id: &str,
        status: InvoiceStatus,
        due: Option<DateTime<Utc>>,
        total_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Invoice {
        Invoice {
            id: id.to_string(),
            user_id: OWNER.to_string(),
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
            user_id: OWNER.to_string(),
            amount_cents: cents,
            payment_status: status,
            method: Some("card".to_string()),
            transaction_id: None,
            notes: None,
            paid_at,
            created_at: paid_at.unwrap_or_else(Utc::now),
        }
    }

    /// In-memory source that counts fetches and can be told to fail.
    #[derive(Debug, Default)]
    pub struct FakeSource {
        pub payments: Mutex<Vec<Payment>>,
        pub invoices: Mutex<Vec<Invoice>>,
        pub client_count: AtomicUsize,
        pub fail_payments: AtomicBool,
        pub fail_invoices: AtomicBool,
        pub payment_fetches: AtomicUsize,
        pub invoice_fetches: AtomicUsize,
    }

    impl FakeSource {
        pub fn new(payments: Vec<Payment>, invoices: Vec<Invoice>) -> Self {
            FakeSource {
                payments: Mutex::new(payments),
                invoices: Mutex::new(invoices),
                ..FakeSource::default()
            }
        }

        pub fn push_payment(&self, payment: Payment) {
            self.payments.lock().unwrap().push(payment);
        }

        pub fn payment_fetches(&self) -> usize {
            self.payment_fetches.load(Ordering::SeqCst)
        }

        pub fn invoice_fetches(&self) -> usize {
            self.invoice_fetches.load(Ordering::SeqCst)
        }

        pub fn set_fail_payments(&self, fail: bool) {
            self.fail_payments.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_invoices(&self, fail: bool) {
            self.fail_invoices.store(fail, Ordering::SeqCst);
        }

        fn payments_or_fail(&self) -> LedgerResult<Vec<Payment>> {
            self.payment_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_payments.load(Ordering::SeqCst) {
                return Err(LedgerError::Db(DbError::Query(
                    "payments unavailable".to_string(),
                )));
            }
            Ok(self.payments.lock().unwrap().clone())
        }
    }

    impl LedgerSource for FakeSource {
        fn owner_id(&self) -> &str {
            OWNER
        }

        async fn paid_payments_for_invoice(&self, invoice_id: &str) -> LedgerResult<Vec<Payment>> {
            Ok(self
                .payments_or_fail()?
                .into_iter()
                .filter(|p| p.invoice_id == invoice_id && p.payment_status == PaymentStatus::Paid)
                .collect())
        }

        async fn payments(&self) -> LedgerResult<Vec<Payment>> {
            self.payments_or_fail()
        }

        async fn active_invoices(&self) -> LedgerResult<Vec<Invoice>> {
            self.invoice_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_invoices.load(Ordering::SeqCst) {
                return Err(LedgerError::Db(DbError::Query(
                    "invoices unavailable".to_string(),
                )));
            }
            Ok(self
                .invoices
                .lock()
                .unwrap()
                .iter()
                .filter(|inv| !inv.is_deleted)
                .cloned()
                .collect())
        }

        async fn active_client_count(&self) -> LedgerResult<usize> {
            Ok(self.client_count.load(Ordering::SeqCst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::NewClient;
    use nexus_db::DbConfig;

    #[tokio::test]
    async fn test_store_source_is_owner_scoped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.clients()
            .insert(
                "owner-1",
                &NewClient {
                    name: "Acme".to_string(),
                    email: "billing@acme.test".to_string(),
                    ..NewClient::default()
                },
            )
            .await
            .unwrap();

        let mine = StoreSource::new(db.clone(), "owner-1");
        let theirs = StoreSource::new(db, "owner-2");

        assert_eq!(mine.owner_id(), "owner-1");
        assert_eq!(mine.active_client_count().await.unwrap(), 1);
        assert_eq!(theirs.active_client_count().await.unwrap(), 0);
        assert!(theirs.active_invoices().await.unwrap().is_empty());
        assert!(theirs.payments().await.unwrap().is_empty());
    }
}
