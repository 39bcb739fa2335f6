//! # Date Utilities
//!
//! Calendar helpers for due-date checks and month bucketing.
//!
//! All functions take `now` explicitly and work in UTC. Nothing here reads
//! the system clock.
//!
//! ## Month Window
//! ```text
//! now = 2027-01-15
//!
//!   trailing_months(now, 6)
//!   ┌────────┬────────┬────────┬────────┬────────┬────────┐
//!   │2026-08 │2026-09 │2026-10 │2026-11 │2026-12 │2027-01 │
//!   │  Aug   │  Sep   │  Oct   │  Nov   │  Dec   │  Jan   │
//!   └────────┴────────┴────────┴────────┴────────┴────────┘
//!    oldest                                        current
//! ```

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Short English month names, January first.
const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Days between issue and due date for a quick-created invoice.
pub const DEFAULT_PAYMENT_TERM_DAYS: i64 = 14;

/// True when `due` is set and strictly before `now`.
///
/// A missing due date never counts as overdue.
#[inline]
pub fn is_past_due(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(due, Some(d) if d < now)
}

/// Midnight UTC on the first day of `now`'s month.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    MonthKey::of(now).start()
}

/// Default due date for quick-created invoices.
pub fn default_due_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(DEFAULT_PAYMENT_TERM_DAYS)
}

/// Invoice number preview derived from the issue date: `INV.YYYY.MMDD.HH`.
///
/// No uniqueness is guaranteed; two invoices issued in the same hour share
/// a preview.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use nexus_core::dates::invoice_number_preview;
///
/// let issued = Utc.with_ymd_and_hms(2026, 3, 7, 9, 30, 0).unwrap();
/// assert_eq!(invoice_number_preview(issued), "INV.2026.0307.09");
/// ```
pub fn invoice_number_preview(issue_date: DateTime<Utc>) -> String {
    format!(
        "INV.{:04}.{:02}{:02}.{:02}",
        issue_date.year(),
        issue_date.month(),
        issue_date.day(),
        issue_date.hour()
    )
}

// =============================================================================
// Month Key
// =============================================================================

/// A calendar month, identified by year and 1-based month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthKey {
    pub year: i32,
    /// 1 = January.
    pub month: u32,
}

impl MonthKey {
    /// The month containing `at`.
    pub fn of(at: DateTime<Utc>) -> Self {
        MonthKey {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The month `n` months before this one, crossing year boundaries.
    pub fn minus_months(self, n: u32) -> Self {
        let zero_based = self.year * 12 + (self.month as i32 - 1) - n as i32;
        MonthKey {
            year: zero_based.div_euclid(12),
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    /// First instant of the month.
    pub fn start(self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// True when `at` falls in this month.
    #[inline]
    pub fn contains(self, at: DateTime<Utc>) -> bool {
        MonthKey::of(at) == self
    }

    /// Short English name, e.g. `Dec`.
    pub fn short_name(self) -> &'static str {
        SHORT_MONTHS[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Sortable key, e.g. `2026-12`.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// The `count` calendar months ending with `now`'s month, oldest first.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<MonthKey> {
    let current = MonthKey::of(now);
    (0..count).rev().map(|back| current.minus_months(back)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
