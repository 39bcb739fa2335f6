//! # Client Service
//!
//! Adding clients and the delete-with-undo flow.
//!
//! ## Delete + Undo
//! ```text
//! active_invoice_count(client)  ──► "This will also delete 3 invoices"
//!           │ confirm
//!           ▼
//! delete(client, now)  ──► one tx, one timestamp ──► ClientDeletion (undo token)
//!           │ undo
//!           ▼
//! undo_delete(&deletion) ──► restores the client and exactly the invoices
//!                            that carried the same timestamp
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use nexus_core::validation::validate_new_client;
use nexus_core::{Client, CoreError, NewClient};
use nexus_db::{CascadeOutcome, Database};

use crate::cache::SessionCaches;
use crate::error::LedgerResult;

/// Undo token for a client delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDeletion {
    pub client_id: String,
    pub deleted_at: DateTime<Utc>,
    /// Invoices hidden together with the client.
    pub invoices_affected: u64,
}

pub struct ClientService {
    db: Database,
    owner_id: String,
    caches: Arc<SessionCaches>,
}

impl ClientService {
    pub fn new(db: Database, owner_id: impl Into<String>, caches: Arc<SessionCaches>) -> Self {
        ClientService {
            db,
            owner_id: owner_id.into(),
            caches,
        }
    }

    /// Visible clients, by name.
    pub async fn list(&self) -> LedgerResult<Vec<Client>> {
        Ok(self.db.clients().list_active(&self.owner_id).await?)
    }

    /// Validates and stores a new client. Empty optional fields become null.
    pub async fn add(&self, new: &NewClient) -> LedgerResult<Client> {
        validate_new_client(new).map_err(CoreError::from)?;
        let client = self.db.clients().insert(&self.owner_id, new).await?;
        info!(client_id = %client.id, "Client added");
        Ok(client)
    }

    /// How many visible invoices a delete would take with it.
    pub async fn active_invoice_count(&self, client_id: &str) -> LedgerResult<u64> {
        let count = self
            .db
            .clients()
            .count_active_invoices(&self.owner_id, client_id)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Soft-deletes the client and its visible invoices.
    pub async fn delete(&self, client_id: &str, now: DateTime<Utc>) -> LedgerResult<ClientDeletion> {
        let CascadeOutcome { invoices_affected } = self
            .db
            .clients()
            .soft_delete_cascade(&self.owner_id, client_id, now)
            .await?;

        self.caches.invalidate_dashboard(&self.owner_id).await;
        info!(client_id = %client_id, invoices_affected, "Client deleted");

        Ok(ClientDeletion {
            client_id: client_id.to_string(),
            deleted_at: now,
            invoices_affected,
        })
    }

    /// Reverses [`delete`](Self::delete).
    pub async fn undo_delete(&self, deletion: &ClientDeletion) -> LedgerResult<CascadeOutcome> {
        let outcome = self
            .db
            .clients()
            .restore_cascade(&self.owner_id, &deletion.client_id, deletion.deleted_at)
            .await?;

        self.caches.invalidate_dashboard(&self.owner_id).await;
        info!(
            client_id = %deletion.client_id,
            invoices_restored = outcome.invoices_affected,
            "Client restored"
        );
        Ok(outcome)
    }
}
