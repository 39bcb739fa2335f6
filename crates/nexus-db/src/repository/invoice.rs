//! # Invoice Repository
//!
//! Store operations for invoices and their line items.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                             │
//! │     └── insert_with_items() → header + rows in one transaction         │
//! │         (quick create passes an empty item list)                       │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list_active() / get_by_id() / line_items()                     │
//! │                                                                         │
//! │  3. SOFT DELETE                                                        │
//! │     └── soft_delete(at) → hidden from list_active()                    │
//! │                                                                         │
//! │  4. UNDO                                                               │
//! │     └── restore(at) → visible again, created_at untouched              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nexus_core::{Invoice, LineItem, NewInvoice, NewLineItem};

const INVOICE_COLUMNS: &str = r#"
    id, user_id, client_id, invoice_number, status, issue_date, due_date,
    subtotal_cents, tax_rate_bps, tax_cents, total_cents, notes,
    is_deleted, deleted_at, created_at, updated_at
"#;

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Lists the owner's visible invoices, newest first.
    pub async fn list_active(&self, owner_id: &str) -> DbResult<Vec<Invoice>> {
        debug!(owner_id = %owner_id, "Listing invoices");

        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE user_id = ?1 AND is_deleted = 0 \
             ORDER BY created_at DESC"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = invoices.len(), "Invoices loaded");
        Ok(invoices)
    }

    /// Gets an invoice by ID, including soft-deleted ones.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 AND user_id = ?2");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Line items of an invoice in position order.
    pub async fn line_items(&self, invoice_id: &str) -> DbResult<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT id, invoice_id, description, quantity, rate_cents, amount_cents,
                   position, created_at
            FROM invoice_line_items
            WHERE invoice_id = ?1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts an invoice header and its line items atomically.
    ///
    /// ## Returns
    /// The stored invoice. If any row fails, nothing is written.
    pub async fn insert_with_items(
        &self,
        owner_id: &str,
        new: &NewInvoice,
        items: &[NewLineItem],
    ) -> DbResult<Invoice> {
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            client_id: new.client_id.clone(),
            invoice_number: new.invoice_number.clone(),
            status: new.status,
            issue_date: new.issue_date,
            due_date: new.due_date,
            subtotal_cents: new.subtotal.cents(),
            tax_rate_bps: new.tax_rate.bps(),
            tax_cents: new.tax_amount.cents(),
            total_cents: new.total.cents(),
            notes: new.notes.clone(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %invoice.id,
            client_id = %invoice.client_id,
            total_cents = invoice.total_cents,
            items = items.len(),
            "Inserting invoice"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, user_id, client_id, invoice_number, status, issue_date, due_date,
                subtotal_cents, tax_rate_bps, tax_cents, total_cents, notes,
                is_deleted, deleted_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.user_id)
        .bind(&invoice.client_id)
        .bind(&invoice.invoice_number)
        .bind(invoice.status)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(&invoice.notes)
        .bind(invoice.is_deleted)
        .bind(invoice.deleted_at)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO invoice_line_items (
                    id, invoice_id, description, quantity, rate_cents, amount_cents,
                    position, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&invoice.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.rate.cents())
            .bind(item.amount.cents())
            .bind(item.position)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        Ok(invoice)
    }

    /// Soft-deletes one invoice. Payments are left untouched.
    pub async fn soft_delete(&self, owner_id: &str, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting invoice");

        let rows = sqlx::query(
            r#"
            UPDATE invoices SET is_deleted = 1, deleted_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND is_deleted = 0
            "#,
        )
        .bind(at)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(DbError::not_found("Invoice", id));
        }
        Ok(())
    }

    /// Restores an invoice deleted at exactly `deleted_at`.
    pub async fn restore(
        &self,
        owner_id: &str,
        id: &str,
        deleted_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, "Restoring invoice");

        let rows = sqlx::query(
            r#"
            UPDATE invoices SET is_deleted = 0, deleted_at = NULL
            WHERE id = ?1 AND user_id = ?2 AND is_deleted = 1 AND deleted_at = ?3
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(deleted_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(DbError::not_found("Deleted invoice", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
