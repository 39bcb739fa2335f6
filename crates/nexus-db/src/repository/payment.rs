//! # Payment Repository
//!
//! Store operations for invoice payments.
//!
//! Payments are append-only here. Deleting an invoice never touches its
//! payments, so revenue history survives invoice cleanup.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use nexus_core::{NewPayment, Payment, PaymentStatus};

const PAYMENT_COLUMNS: &str = r#"
    id, invoice_id, user_id, amount_cents, payment_status, method,
    transaction_id, notes, paid_at, created_at
"#;

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a payment.
    pub async fn insert(&self, owner_id: &str, new: &NewPayment) -> DbResult<Payment> {
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: new.invoice_id.clone(),
            user_id: owner_id.to_string(),
            amount_cents: new.amount.cents(),
            payment_status: new.payment_status,
            method: new.method.clone(),
            transaction_id: new.transaction_id.clone(),
            notes: new.notes.clone(),
            paid_at: new.paid_at,
            created_at: Utc::now(),
        };

        debug!(
            id = %payment.id,
            invoice_id = %payment.invoice_id,
            amount_cents = payment.amount_cents,
            "Inserting payment"
        );

        sqlx::query(
            r#"
            INSERT INTO invoice_payments (
                id, invoice_id, user_id, amount_cents, payment_status, method,
                transaction_id, notes, paid_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.invoice_id)
        .bind(&payment.user_id)
        .bind(payment.amount_cents)
        .bind(payment.payment_status)
        .bind(&payment.method)
        .bind(&payment.transaction_id)
        .bind(&payment.notes)
        .bind(payment.paid_at)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Payments with status `paid` against one invoice.
    pub async fn paid_for_invoice(&self, owner_id: &str, invoice_id: &str) -> DbResult<Vec<Payment>> {
        debug!(invoice_id = %invoice_id, "Loading paid payments for invoice");

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM invoice_payments \
             WHERE invoice_id = ?1 AND user_id = ?2 AND payment_status = ?3 \
             ORDER BY created_at"
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(invoice_id)
            .bind(owner_id)
            .bind(PaymentStatus::Paid)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Every payment of the owner, oldest first.
    pub async fn list_for_owner(&self, owner_id: &str) -> DbResult<Vec<Payment>> {
        debug!(owner_id = %owner_id, "Loading payments");

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM invoice_payments \
             WHERE user_id = ?1 \
             ORDER BY created_at"
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = payments.len(), "Payments loaded");
        Ok(payments)
    }

    /// Payments with status `paid` for the owner.
    pub async fn list_paid_for_owner(&self, owner_id: &str) -> DbResult<Vec<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM invoice_payments \
             WHERE user_id = ?1 AND payment_status = ?2 \
             ORDER BY created_at"
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(owner_id)
            .bind(PaymentStatus::Paid)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
