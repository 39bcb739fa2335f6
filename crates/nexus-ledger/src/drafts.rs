//! # Draft Persistence
//!
//! Keeps the create-invoice form in one scratch slot so an accidental close
//! loses nothing. Every change overwrites the slot; a successful submission
//! clears it.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use nexus_core::{InvoiceDraft, DRAFT_SLOT};

use crate::error::LedgerResult;
use crate::scratch::ScratchStore;

pub struct DraftStore<T> {
    store: T,
    slot: String,
}

impl<T: ScratchStore> DraftStore<T> {
    /// Draft store on the default `invoice_draft` slot.
    pub fn new(store: T) -> Self {
        DraftStore::with_slot(store, DRAFT_SLOT)
    }

    pub fn with_slot(store: T, slot: impl Into<String>) -> Self {
        DraftStore {
            store,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Writes the whole form, replacing what was there.
    pub fn save(&self, draft: &InvoiceDraft) -> LedgerResult<()> {
        let json = draft.to_json()?;
        self.store.set(&self.slot, &json)?;
        debug!(slot = %self.slot, items = draft.items.len(), "Draft saved");
        Ok(())
    }

    /// The stored draft, or a blank form.
    ///
    /// Unreadable or malformed content is logged and ignored.
    pub fn load(&self, now: DateTime<Utc>) -> InvoiceDraft {
        let stored = match self.store.get(&self.slot) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "Could not read saved draft");
                None
            }
        };

        match stored {
            Some(json) => InvoiceDraft::from_json(&json, now).unwrap_or_else(|e| {
                warn!(slot = %self.slot, error = %e, "Ignoring malformed draft");
                InvoiceDraft::new(now)
            }),
            None => InvoiceDraft::new(now),
        }
    }

    pub fn clear(&self) -> LedgerResult<()> {
        self.store.remove(&self.slot)?;
        debug!(slot = %self.slot, "Draft cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nexus_core::draft::{LineItemPatch, DEFAULT_ITEM_DESCRIPTION};
    use nexus_core::Money;

    use crate::scratch::MemoryScratchStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    // Row ids are random, so compare the blank form field by field.
    fn assert_blank(draft: &InvoiceDraft) {
        assert_eq!(draft.client_id, None);
        assert_eq!(draft.issue_date, Some(now()));
        assert_eq!(draft.due_date, Some(now()));
        assert_eq!(draft.tax_rate, 0.0);
        assert!(draft.notes.is_empty());
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].description, DEFAULT_ITEM_DESCRIPTION);
    }

    #[test]
    fn test_empty_slot_gives_blank_form() {
        let drafts = DraftStore::new(MemoryScratchStore::new());
        assert_blank(&drafts.load(now()));
    }

    #[test]
    fn test_save_then_load_restores_every_field() {
        let drafts = DraftStore::new(MemoryScratchStore::new());
        let mut draft = InvoiceDraft::new(now());
        draft.client_id = Some("client-9".to_string());
        draft.tax_rate = 8.25;
        draft.notes = "Thanks!".to_string();
        let id = draft.add_item();
        draft.update_item(
            &id,
            LineItemPatch {
                description: Some("Logo".to_string()),
                quantity: Some(3.0),
                rate: Some(Money::from_cents(12_000)),
            },
        );
        drafts.save(&draft).unwrap();

        let later = now() + chrono::Duration::hours(5);
        assert_eq!(drafts.load(later), draft);
    }

    #[test]
    fn test_malformed_slot_is_ignored() {
        let store = MemoryScratchStore::new();
        store.set(DRAFT_SLOT, "{not json").unwrap();
        let drafts = DraftStore::new(store);
        assert_blank(&drafts.load(now()));
    }

    #[test]
    fn test_missing_dates_and_items_are_defaulted() {
        let store = MemoryScratchStore::new();
        store
            .set(DRAFT_SLOT, r#"{"clientId":"c-1","taxRate":5,"notes":"","items":[]}"#)
            .unwrap();
        let draft = DraftStore::new(store).load(now());
        assert_eq!(draft.client_id.as_deref(), Some("c-1"));
        assert_eq!(draft.issue_date, Some(now()));
        assert_eq!(draft.due_date, Some(now()));
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_clear_removes_slot() {
        let drafts = DraftStore::with_slot(MemoryScratchStore::new(), "other_draft");
        let mut draft = InvoiceDraft::new(now());
        draft.notes = "half typed".to_string();
        drafts.save(&draft).unwrap();
        drafts.clear().unwrap();
        assert_eq!(drafts.slot(), "other_draft");
        assert_blank(&drafts.load(now()));
    }
}
