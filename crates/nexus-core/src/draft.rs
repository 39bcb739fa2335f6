//! # Invoice Draft
//!
//! The in-progress "create invoice" form and its conversion into store rows.
//!
//! ## Lifecycle
//! ```text
//!   load slot ──► from_json() ──► InvoiceDraft ◄──┐ edit (add/update/remove)
//!       │ malformed                   │           │
//!       └──► InvoiceDraft::new(now)   ├── to_json() ──► save slot (every change)
//!                                     │
//!                                     └── commit() ─────► DraftSubmission
//!                                                          └──► clear slot
//! ```
//!
//! ## JSON Shape
//! camelCase keys, dates as RFC 3339 strings, rates as integer cents:
//! ```json
//! { "clientId": "…", "issueDate": "2026-10-14T09:00:00Z", "dueDate": null,
//!   "taxRate": 8.25, "notes": "",
//!   "items": [{ "id": "…", "description": "Design", "quantity": 2, "rate": 5000 }] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::dates::invoice_number_preview;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::totals::{compute_totals, line_amount, whole_quantity, InvoiceTotals, Priced};
use crate::types::{non_empty, InvoiceStatus, NewInvoice, NewLineItem, TaxRate};
use crate::validation::truncate_description;

/// Description of the row a fresh form starts with.
pub const DEFAULT_ITEM_DESCRIPTION: &str = "Web development services";

/// One editable row of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DraftLineItem {
    /// Row identity for edits; not persisted with the invoice.
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Raw form value. Truncated to a whole count on commit.
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub rate: Money,
}

impl DraftLineItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: Money) -> Self {
        DraftLineItem {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            quantity,
            rate,
        }
    }

    /// Display amount for this row.
    pub fn amount(&self) -> Money {
        line_amount(self.quantity, self.rate)
    }
}

impl Priced for DraftLineItem {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn rate(&self) -> Money {
        self.rate
    }
}

/// Partial update for a row. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemPatch {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub rate: Option<Money>,
}

/// The whole create-invoice form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    /// Percentage as typed, e.g. `8.25`.
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<DraftLineItem>,
}

/// A validated draft ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSubmission {
    pub invoice: NewInvoice,
    pub items: Vec<NewLineItem>,
}

impl InvoiceDraft {
    /// Blank form: both dates `now`, one default row.
    pub fn new(now: DateTime<Utc>) -> Self {
        InvoiceDraft {
            client_id: None,
            issue_date: Some(now),
            due_date: Some(now),
            tax_rate: 0.0,
            notes: String::new(),
            items: default_items(),
        }
    }

    /// Decodes a stored draft and fills defaults for missing parts.
    ///
    /// ## Defaults
    /// - missing dates → `now`
    /// - empty item list → the single default row
    pub fn from_json(json: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        let mut draft: InvoiceDraft =
            serde_json::from_str(json).map_err(|e| CoreError::MalformedDraft(e.to_string()))?;

        draft.issue_date.get_or_insert(now);
        draft.due_date.get_or_insert(now);
        if draft.items.is_empty() {
            draft.items = default_items();
        }
        Ok(draft)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::MalformedDraft(e.to_string()))
    }

    /// Appends an empty row with quantity 1 and returns its id.
    pub fn add_item(&mut self) -> String {
        let item = DraftLineItem::new("", 1.0, Money::zero());
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Applies `patch` to the row with `id`. Returns false if no such row.
    pub fn update_item(&mut self, id: &str, patch: LineItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|it| it.id == id) else {
            return false;
        };
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(rate) = patch.rate {
            item.rate = rate;
        }
        true
    }

    /// Removes the row with `id`. Returns false if no such row.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.id != id);
        self.items.len() != before
    }

    /// Tax rate with negatives clamped to zero.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.tax_rate)
    }

    /// Totals over the current rows, recomputed on every call.
    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.items, self.tax_rate())
    }

    /// Invoice number the submission will carry.
    pub fn number_preview(&self, now: DateTime<Utc>) -> String {
        invoice_number_preview(self.issue_date.unwrap_or(now))
    }

    /// Validates the form and converts it into rows for the store.
    ///
    /// ## Errors
    /// - `Validation(Required)` when the client or either date is missing
    /// - `NoLineItems` when there are no rows
    pub fn commit(&self) -> CoreResult<DraftSubmission> {
        let client_id = self
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| required("client"))?;
        let issue_date = self.issue_date.ok_or_else(|| required("issue date"))?;
        let due_date = self.due_date.ok_or_else(|| required("due date"))?;

        if self.items.is_empty() {
            return Err(CoreError::NoLineItems);
        }

        let totals = self.totals();
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| NewLineItem {
                description: truncate_description(&item.description),
                quantity: whole_quantity(item.quantity),
                rate: item.rate.clamp_non_negative(),
                amount: item.amount(),
                position: position as i64,
            })
            .collect();

        let invoice = NewInvoice {
            client_id: client_id.to_string(),
            invoice_number: Some(invoice_number_preview(issue_date)),
            status: InvoiceStatus::Draft,
            issue_date,
            due_date: Some(due_date),
            subtotal: totals.subtotal,
            tax_rate: self.tax_rate(),
            tax_amount: totals.tax_amount,
            total: totals.total,
            notes: non_empty(Some(self.notes.clone())),
        };

        Ok(DraftSubmission { invoice, items })
    }
}

fn default_items() -> Vec<DraftLineItem> {
    vec![DraftLineItem::new(DEFAULT_ITEM_DESCRIPTION, 1.0, Money::zero())]
}

fn required(field: &str) -> CoreError {
    ValidationError::Required {
        field: field.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    fn filled() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(now());
        draft.client_id = Some("client-1".to_string());
        draft.tax_rate = 8.25;
        draft.notes = "Net 14".to_string();
        draft.items = vec![
            DraftLineItem::new("Design", 2.0, Money::from_cents(5_000)),
            DraftLineItem::new("Hosting", 1.5, Money::from_cents(1_999)),
        ];
        draft
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = InvoiceDraft::new(now());
        assert_eq!(draft.issue_date, Some(now()));
        assert_eq!(draft.due_date, Some(now()));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].description, DEFAULT_ITEM_DESCRIPTION);
        assert_eq!(draft.items[0].quantity, 1.0);
        assert_eq!(draft.items[0].rate, Money::zero());
    }

    #[test]
    fn test_json_round_trip_preserves_form() {
        let draft = filled();
        let json = draft.to_json().unwrap();
        assert!(json.contains("\"clientId\""));
        assert!(json.contains("\"taxRate\""));

        let loaded = InvoiceDraft::from_json(&json, Utc::now()).unwrap();
        assert_eq!(loaded, draft);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = InvoiceDraft::from_json("{not json", now()).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDraft(_)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let loaded =
            InvoiceDraft::from_json(r#"{"clientId":"c-9","items":[]}"#, now()).unwrap();
        assert_eq!(loaded.client_id.as_deref(), Some("c-9"));
        assert_eq!(loaded.issue_date, Some(now()));
        assert_eq!(loaded.due_date, Some(now()));
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].description, DEFAULT_ITEM_DESCRIPTION);
    }

    #[test]
    fn test_item_editing_recomputes_totals() {
        let mut draft = InvoiceDraft::new(now());
        let id = draft.add_item();
        assert!(draft.update_item(
            &id,
            LineItemPatch {
                quantity: Some(3.0),
                rate: Some(Money::from_cents(1_000)),
                ..LineItemPatch::default()
            },
        ));
        assert_eq!(draft.totals().subtotal.cents(), 3_000);

        assert!(draft.remove_item(&id));
        assert_eq!(draft.totals().subtotal, Money::zero());
        assert!(!draft.remove_item(&id));
        assert!(!draft.update_item("missing", LineItemPatch::default()));
    }

    #[test]
    fn test_commit_builds_rows() {
        let submission = filled().commit().unwrap();
        let inv = &submission.invoice;

        assert_eq!(inv.status, InvoiceStatus::Draft);
        assert_eq!(inv.invoice_number.as_deref(), Some("INV.2026.1014.09"));
        // 2 × 50.00 + 1.5 × 19.99
        assert_eq!(inv.subtotal.cents(), 12_999);
        assert_eq!(inv.tax_amount.cents(), 1_072);
        assert_eq!(inv.total, inv.subtotal + inv.tax_amount);
        assert_eq!(inv.notes.as_deref(), Some("Net 14"));

        let positions: Vec<i64> = submission.items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1]);
        // Stored quantity is whole; the amount keeps the half unit.
        assert_eq!(submission.items[1].quantity, 1);
        assert_eq!(submission.items[1].amount.cents(), 2_999);
        let item_sum: Money = submission.items.iter().map(|i| i.amount).sum();
        assert_eq!(item_sum, inv.subtotal);
    }

    #[test]
    fn test_commit_requires_client_and_items() {
        let mut draft = filled();
        draft.client_id = Some("  ".to_string());
        assert!(matches!(
            draft.commit().unwrap_err(),
            CoreError::Validation(ValidationError::Required { .. })
        ));

        let mut draft = filled();
        draft.due_date = None;
        assert!(draft.commit().is_err());

        let mut draft = filled();
        draft.items.clear();
        assert!(matches!(draft.commit().unwrap_err(), CoreError::NoLineItems));
    }

    #[test]
    fn test_commit_truncates_description() {
        let mut draft = filled();
        draft.items[0].description = "x".repeat(800);
        let submission = draft.commit().unwrap();
        assert_eq!(submission.items[0].description.chars().count(), 500);
    }

    #[test]
    fn test_empty_notes_become_none() {
        let mut draft = filled();
        draft.notes = "   ".to_string();
        assert_eq!(draft.commit().unwrap().invoice.notes, None);
    }
}
