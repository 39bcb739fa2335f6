//! # Invoice Service
//!
//! Creating invoices (quick-create and full draft submission) and the
//! single-invoice delete with undo. Every write drops the owner's cached
//! dashboard.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use nexus_core::dates::default_due_date;
use nexus_core::{
    CoreError, Invoice, InvoiceDraft, InvoiceStatus, LineItem, Money, NewInvoice, TaxRate,
    ValidationError,
};
use nexus_db::{Database, DbError};

use crate::cache::SessionCaches;
use crate::drafts::DraftStore;
use crate::error::LedgerResult;
use crate::scratch::ScratchStore;

/// Undo token for a single invoice delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDeletion {
    pub invoice_id: String,
    pub deleted_at: DateTime<Utc>,
}

pub struct InvoiceService {
    db: Database,
    owner_id: String,
    caches: Arc<SessionCaches>,
}

impl InvoiceService {
    pub fn new(db: Database, owner_id: impl Into<String>, caches: Arc<SessionCaches>) -> Self {
        InvoiceService {
            db,
            owner_id: owner_id.into(),
            caches,
        }
    }

    /// Visible invoices, newest first.
    pub async fn list(&self) -> LedgerResult<Vec<Invoice>> {
        Ok(self.db.invoices().list_active(&self.owner_id).await?)
    }

    pub async fn line_items(&self, invoice_id: &str) -> LedgerResult<Vec<LineItem>> {
        self.require_invoice(invoice_id).await?;
        Ok(self.db.invoices().line_items(invoice_id).await?)
    }

    /// Creates an empty draft invoice for `client_id`.
    ///
    /// `due` defaults to 14 days after `now`. All totals are zero.
    pub async fn quick_create(
        &self,
        client_id: &str,
        due: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> LedgerResult<Invoice> {
        self.require_client(client_id).await?;

        let new = NewInvoice {
            client_id: client_id.to_string(),
            invoice_number: None,
            status: InvoiceStatus::Draft,
            issue_date: now,
            due_date: Some(due.unwrap_or_else(|| default_due_date(now))),
            subtotal: Money::zero(),
            tax_rate: TaxRate::zero(),
            tax_amount: Money::zero(),
            total: Money::zero(),
            notes: None,
        };
        let invoice = self
            .db
            .invoices()
            .insert_with_items(&self.owner_id, &new, &[])
            .await?;

        self.caches.invalidate_dashboard(&self.owner_id).await;
        info!(invoice_id = %invoice.id, "Invoice created");
        Ok(invoice)
    }

    /// Commits the form, stores invoice and items together, then clears the
    /// saved draft.
    ///
    /// ## Errors
    /// Validation errors leave the saved draft untouched.
    pub async fn submit_draft<T: ScratchStore>(
        &self,
        draft: &InvoiceDraft,
        drafts: &DraftStore<T>,
    ) -> LedgerResult<Invoice> {
        let submission = draft.commit()?;
        self.require_client(&submission.invoice.client_id).await?;

        let invoice = self
            .db
            .invoices()
            .insert_with_items(&self.owner_id, &submission.invoice, &submission.items)
            .await?;

        if let Err(e) = drafts.clear() {
            warn!(invoice_id = %invoice.id, error = %e, "Invoice saved but draft not cleared");
        }
        self.caches.invalidate_dashboard(&self.owner_id).await;

        info!(
            invoice_id = %invoice.id,
            items = submission.items.len(),
            total_cents = invoice.total_cents,
            "Invoice submitted"
        );
        Ok(invoice)
    }

    /// Soft-deletes one invoice. Its payments stay.
    pub async fn delete(&self, invoice_id: &str, now: DateTime<Utc>) -> LedgerResult<InvoiceDeletion> {
        self.db
            .invoices()
            .soft_delete(&self.owner_id, invoice_id, now)
            .await?;
        self.caches.invalidate_dashboard(&self.owner_id).await;
        info!(invoice_id = %invoice_id, "Invoice deleted");

        Ok(InvoiceDeletion {
            invoice_id: invoice_id.to_string(),
            deleted_at: now,
        })
    }

    /// Reverses [`delete`](Self::delete).
    pub async fn restore(&self, deletion: &InvoiceDeletion) -> LedgerResult<()> {
        self.db
            .invoices()
            .restore(&self.owner_id, &deletion.invoice_id, deletion.deleted_at)
            .await?;
        self.caches.invalidate_dashboard(&self.owner_id).await;
        info!(invoice_id = %deletion.invoice_id, "Invoice restored");
        Ok(())
    }

    async fn require_client(&self, client_id: &str) -> LedgerResult<()> {
        if client_id.trim().is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "client".to_string(),
            })
            .into());
        }
        match self.db.clients().get_by_id(&self.owner_id, client_id).await? {
            Some(client) if !client.is_deleted => Ok(()),
            _ => Err(DbError::not_found("Client", client_id).into()),
        }
    }

    async fn require_invoice(&self, invoice_id: &str) -> LedgerResult<()> {
        match self.db.invoices().get_by_id(&self.owner_id, invoice_id).await? {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Invoice", invoice_id).into()),
        }
    }
}
