//! # Client Repository
//!
//! Store operations for clients, including the soft-delete cascade.
//!
//! ## Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  soft_delete_cascade(owner, client, at)        ONE TRANSACTION          │
//! │    clients   SET is_deleted = 1, deleted_at = at   WHERE id = client    │
//! │    invoices  SET is_deleted = 1, deleted_at = at   WHERE client_id = …  │
//! │                                                    AND is_deleted = 0   │
//! │                                                                         │
//! │  restore_cascade(owner, client, at)            ONE TRANSACTION          │
//! │    clients   SET is_deleted = 0, deleted_at = NULL WHERE deleted_at = at│
//! │    invoices  SET is_deleted = 0, deleted_at = NULL WHERE deleted_at = at│
//! │                                                                         │
//! │  Invoices deleted earlier (different timestamp) stay deleted.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nexus_core::{non_empty, Client, NewClient};

/// Rows touched by a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Invoices whose visibility changed together with the client.
    pub invoices_affected: u64,
}

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists the owner's visible clients, ordered by name.
    pub async fn list_active(&self, owner_id: &str) -> DbResult<Vec<Client>> {
        debug!(owner_id = %owner_id, "Listing clients");

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, company, phone, address, notes,
                   is_deleted, deleted_at, created_at, updated_at
            FROM clients
            WHERE user_id = ?1 AND is_deleted = 0
            ORDER BY name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = clients.len(), "Clients loaded");
        Ok(clients)
    }

    /// Counts the owner's visible clients.
    pub async fn count_active(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clients WHERE user_id = ?1 AND is_deleted = 0",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a client by ID, including soft-deleted ones.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, company, phone, address, notes,
                   is_deleted, deleted_at, created_at, updated_at
            FROM clients
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Inserts a client. Blank optional fields are stored as NULL.
    pub async fn insert(&self, owner_id: &str, new: &NewClient) -> DbResult<Client> {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            company: non_empty(new.company.clone()),
            phone: non_empty(new.phone.clone()),
            address: non_empty(new.address.clone()),
            notes: non_empty(new.notes.clone()),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, user_id, name, email, company, phone, address, notes,
                is_deleted, deleted_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&client.id)
        .bind(&client.user_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.company)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.notes)
        .bind(client.is_deleted)
        .bind(client.deleted_at)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Counts the visible invoices addressed to a client.
    pub async fn count_active_invoices(&self, owner_id: &str, client_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM invoices
            WHERE client_id = ?1 AND user_id = ?2 AND is_deleted = 0
            "#,
        )
        .bind(client_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Soft-deletes a client and its visible invoices with one timestamp.
    ///
    /// ## Errors
    /// `NotFound` if the client is missing, foreign, or already deleted.
    /// Nothing is written in that case.
    pub async fn soft_delete_cascade(
        &self,
        owner_id: &str,
        client_id: &str,
        at: DateTime<Utc>,
    ) -> DbResult<CascadeOutcome> {
        debug!(client_id = %client_id, "Soft-deleting client with invoices");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        let client_rows = sqlx::query(
            r#"
            UPDATE clients SET is_deleted = 1, deleted_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND is_deleted = 0
            "#,
        )
        .bind(at)
        .bind(client_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if client_rows == 0 {
            return Err(DbError::not_found("Client", client_id));
        }

        let invoices_affected = sqlx::query(
            r#"
            UPDATE invoices SET is_deleted = 1, deleted_at = ?1
            WHERE client_id = ?2 AND user_id = ?3 AND is_deleted = 0
            "#,
        )
        .bind(at)
        .bind(client_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        debug!(client_id = %client_id, invoices_affected, "Client soft-deleted");
        Ok(CascadeOutcome { invoices_affected })
    }

    /// Reverses [`soft_delete_cascade`](Self::soft_delete_cascade).
    ///
    /// Only rows carrying exactly `deleted_at` are restored.
    pub async fn restore_cascade(
        &self,
        owner_id: &str,
        client_id: &str,
        deleted_at: DateTime<Utc>,
    ) -> DbResult<CascadeOutcome> {
        debug!(client_id = %client_id, "Restoring client with invoices");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        let client_rows = sqlx::query(
            r#"
            UPDATE clients SET is_deleted = 0, deleted_at = NULL
            WHERE id = ?1 AND user_id = ?2 AND is_deleted = 1 AND deleted_at = ?3
            "#,
        )
        .bind(client_id)
        .bind(owner_id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if client_rows == 0 {
            return Err(DbError::not_found("Deleted client", client_id));
        }

        let invoices_affected = sqlx::query(
            r#"
            UPDATE invoices SET is_deleted = 0, deleted_at = NULL
            WHERE client_id = ?1 AND user_id = ?2 AND is_deleted = 1 AND deleted_at = ?3
            "#,
        )
        .bind(client_id)
        .bind(owner_id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        Ok(CascadeOutcome { invoices_affected })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{insert_invoice, new_client, OWNER};
    use crate::{Database, DbConfig};
    use chrono::Duration;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_normalizes_optional_fields() {
        let db = db().await;
        let mut new = new_client("Acme");
        new.company = Some("   ".to_string());
        new.phone = Some(" 555-0100 ".to_string());

        let client = db.clients().insert(OWNER, &new).await.unwrap();
        assert_eq!(client.company, None);
        assert_eq!(client.phone.as_deref(), Some("555-0100"));

        let loaded = db.clients().get_by_id(OWNER, &client.id).await.unwrap().unwrap();
        assert_eq!(loaded, client);
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_sorted() {
        let db = db().await;
        db.clients().insert(OWNER, &new_client("Zeta")).await.unwrap();
        db.clients().insert(OWNER, &new_client("Alpha")).await.unwrap();
        db.clients().insert("someone-else", &new_client("Beta")).await.unwrap();

        let names: Vec<String> = db
            .clients()
            .list_active(OWNER)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(db.clients().count_active(OWNER).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cascade_and_restore() {
        let db = db().await;
        let repo = db.clients();
        let client = repo.insert(OWNER, &new_client("Acme")).await.unwrap();
        let a = insert_invoice(&db, &client.id, 10_000).await;
        insert_invoice(&db, &client.id, 5_000).await;

        // An invoice deleted on its own before the cascade.
        let earlier = Utc::now() - Duration::hours(1);
        let lone = insert_invoice(&db, &client.id, 1_000).await;
        db.invoices().soft_delete(OWNER, &lone.id, earlier).await.unwrap();

        assert_eq!(repo.count_active_invoices(OWNER, &client.id).await.unwrap(), 2);

        let at = Utc::now();
        let outcome = repo.soft_delete_cascade(OWNER, &client.id, at).await.unwrap();
        assert_eq!(outcome.invoices_affected, 2);
        assert!(repo.list_active(OWNER).await.unwrap().is_empty());
        assert!(db.invoices().list_active(OWNER).await.unwrap().is_empty());

        let restored = repo.restore_cascade(OWNER, &client.id, at).await.unwrap();
        assert_eq!(restored.invoices_affected, 2);

        let visible = db.invoices().list_active(OWNER).await.unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|i| i.id != lone.id));

        let back = repo.get_by_id(OWNER, &client.id).await.unwrap().unwrap();
        assert!(!back.is_deleted);
        assert_eq!(back.deleted_at, None);
        assert_eq!(back.created_at, client.created_at);

        let invoice = db.invoices().get_by_id(OWNER, &a.id).await.unwrap().unwrap();
        assert_eq!(invoice.created_at, a.created_at);
    }

    #[tokio::test]
    async fn test_cascade_missing_client_writes_nothing() {
        let db = db().await;
        let err = db
            .clients()
            .soft_delete_cascade(OWNER, "missing", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restore_with_wrong_timestamp_fails() {
        let db = db().await;
        let client = db.clients().insert(OWNER, &new_client("Acme")).await.unwrap();
        let at = Utc::now();
        db.clients().soft_delete_cascade(OWNER, &client.id, at).await.unwrap();

        let err = db
            .clients()
            .restore_cascade(OWNER, &client.id, at + Duration::seconds(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
