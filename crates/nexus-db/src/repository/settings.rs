//! # Settings Repository
//!
//! Profile and company settings, one row each per user, written by upsert.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nexus_core::{non_empty, CompanySettings, CompanyUpdate, Profile, ProfileUpdate};

/// Repository for profile and company settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads a user's profile, if one exists.
    pub async fn get_profile(&self, user_id: &str) -> DbResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, email, full_name, avatar_url, theme, email_opt_in,
                   default_currency, default_tax_rate_bps, created_at, updated_at
            FROM profiles
            WHERE id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Creates or updates the profile. Blank text fields are stored as NULL.
    ///
    /// `email` is only written on first insert.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
        update: &ProfileUpdate,
    ) -> DbResult<Profile> {
        debug!(user_id = %user_id, "Upserting profile");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, full_name, avatar_url, theme, email_opt_in,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT (id) DO UPDATE SET
                full_name = excluded.full_name,
                avatar_url = excluded.avatar_url,
                theme = excluded.theme,
                email_opt_in = excluded.email_opt_in,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(non_empty(email.map(str::to_string)))
        .bind(non_empty(update.full_name.clone()))
        .bind(non_empty(update.avatar_url.clone()))
        .bind(update.theme)
        .bind(update.email_opt_in)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id))
    }

    /// Loads a user's company settings, if any.
    pub async fn get_company(&self, user_id: &str) -> DbResult<Option<CompanySettings>> {
        let company = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT id, user_id, company_name, phone, address, website, logo_url,
                   created_at, updated_at
            FROM company_settings
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Creates or updates company settings keyed by user.
    pub async fn upsert_company(
        &self,
        user_id: &str,
        update: &CompanyUpdate,
    ) -> DbResult<CompanySettings> {
        debug!(user_id = %user_id, "Upserting company settings");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO company_settings (
                id, user_id, company_name, phone, address, website, logo_url,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT (user_id) DO UPDATE SET
                company_name = excluded.company_name,
                phone = excluded.phone,
                address = excluded.address,
                website = excluded.website,
                logo_url = excluded.logo_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(update.company_name.trim())
        .bind(non_empty(update.phone.clone()))
        .bind(non_empty(update.address.clone()))
        .bind(non_empty(update.website.clone()))
        .bind(non_empty(update.logo_url.clone()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_company(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Company settings", user_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
