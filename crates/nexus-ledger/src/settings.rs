//! Profile and company settings for the signed-in user.

use tracing::info;

use nexus_core::validation::validate_company_name;
use nexus_core::{CompanySettings, CompanyUpdate, CoreError, Profile, ProfileUpdate};
use nexus_db::Database;

use crate::error::LedgerResult;

pub struct SettingsService {
    db: Database,
    user_id: String,
}

impl SettingsService {
    pub fn new(db: Database, user_id: impl Into<String>) -> Self {
        SettingsService {
            db,
            user_id: user_id.into(),
        }
    }

    /// `None` until the profile is first saved.
    pub async fn load_profile(&self) -> LedgerResult<Option<Profile>> {
        Ok(self.db.settings().get_profile(&self.user_id).await?)
    }

    /// Saves the editable profile fields. `email` only lands on first save.
    pub async fn save_profile(
        &self,
        email: Option<&str>,
        update: &ProfileUpdate,
    ) -> LedgerResult<Profile> {
        let profile = self
            .db
            .settings()
            .upsert_profile(&self.user_id, email, update)
            .await?;
        info!(user_id = %self.user_id, "Profile saved");
        Ok(profile)
    }

    pub async fn load_company(&self) -> LedgerResult<Option<CompanySettings>> {
        Ok(self.db.settings().get_company(&self.user_id).await?)
    }

    /// Saves company settings. The company name is required.
    pub async fn save_company(&self, update: &CompanyUpdate) -> LedgerResult<CompanySettings> {
        validate_company_name(&update.company_name).map_err(CoreError::from)?;
        let company = self
            .db
            .settings()
            .upsert_company(&self.user_id, update)
            .await?;
        info!(user_id = %self.user_id, "Company settings saved");
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::ThemeMode;
    use nexus_db::DbConfig;

    async fn service() -> SettingsService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SettingsService::new(db, "user-1")
    }

    #[tokio::test]
    async fn test_profile_saved_then_updated() {
        let settings = service().await;
        assert!(settings.load_profile().await.unwrap().is_none());

        let first = settings
            .save_profile(
                Some("ana@studio.test"),
                &ProfileUpdate {
                    full_name: Some("Ana".to_string()),
                    avatar_url: Some("  ".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(first.email.as_deref(), Some("ana@studio.test"));
        assert_eq!(first.avatar_url, None);
        assert_eq!(first.theme, ThemeMode::System);
        assert_eq!(first.default_currency, "usd");

        let second = settings
            .save_profile(
                Some("other@studio.test"),
                &ProfileUpdate {
                    full_name: Some("Ana B".to_string()),
                    theme: ThemeMode::Dark,
                    email_opt_in: false,
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second.email.as_deref(), Some("ana@studio.test"));
        assert_eq!(second.full_name.as_deref(), Some("Ana B"));
        assert_eq!(second.theme, ThemeMode::Dark);
        assert!(!second.email_opt_in);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_company_requires_name() {
        let settings = service().await;

        let err = settings
            .save_company(&CompanyUpdate {
                company_name: "   ".to_string(),
                ..CompanyUpdate::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(settings.load_company().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_company_upsert_keeps_one_row() {
        let settings = service().await;

        let first = settings
            .save_company(&CompanyUpdate {
                company_name: "Studio".to_string(),
                website: Some(String::new()),
                ..CompanyUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(first.website, None);

        let second = settings
            .save_company(&CompanyUpdate {
                company_name: " Studio Ltd ".to_string(),
                phone: Some("555-0100".to_string()),
                ..CompanyUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.company_name, "Studio Ltd");
        assert_eq!(second.phone.as_deref(), Some("555-0100"));
    }
}
