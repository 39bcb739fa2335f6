//! # Line-Item Totals
//!
//! Pure subtotal/tax/total computation for an invoice being edited.
//!
//! ## Calculation Flow
//! ```text
//! rows ──► amount_i = round(max(0, qty_i) × max(0, rate_i))
//!                │
//!                ▼
//!          subtotal = Σ amount_i
//!                │
//!                ▼
//!          tax      = round_half_up(subtotal × bps / 10000)
//!                │
//!                ▼
//!          total    = subtotal + tax
//! ```
//!
//! Every call recomputes from scratch. There is no incremental state, so
//! editing one row cannot leak into another.
//!
//! Amounts use the quantity as typed; only the stored quantity column is a
//! whole number (see [`whole_quantity`]). A product past `i64::MAX` cents
//! saturates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Anything that can be priced as a line: a quantity and a unit rate.
pub trait Priced {
    fn quantity(&self) -> f64;
    fn rate(&self) -> Money;
}

/// Quantity as the whole, non-negative count that gets committed.
///
/// Fractions are truncated and negatives, NaN and infinities become zero.
#[inline]
pub fn whole_quantity(quantity: f64) -> i64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity.trunc() as i64
    } else {
        0
    }
}

/// Amount for a single row, rounded half away from zero to the cent.
///
/// ```rust
/// use nexus_core::money::Money;
/// use nexus_core::totals::line_amount;
///
/// assert_eq!(line_amount(1.5, Money::from_cents(1_999)).cents(), 2_999);
/// assert_eq!(line_amount(-1.0, Money::from_cents(1_999)).cents(), 0);
/// ```
#[inline]
pub fn line_amount(quantity: f64, rate: Money) -> Money {
    let quantity = if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    };
    // `as` saturates on out-of-range floats
    let cents = (quantity * rate.clamp_non_negative().cents() as f64).round() as i64;
    Money::from_cents(cents)
}

/// Derived totals for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

/// Computes subtotal, tax and total over `items`.
///
/// ```rust
/// use nexus_core::money::Money;
/// use nexus_core::totals::{compute_totals, LineInput};
/// use nexus_core::types::TaxRate;
///
/// let rows = [
///     LineInput::new(2.0, Money::from_cents(5_000)),
///     LineInput::new(1.0, Money::from_cents(2_500)),
/// ];
/// let totals = compute_totals(&rows, TaxRate::from_bps(1_000));
/// assert_eq!(totals.subtotal.cents(), 12_500);
/// assert_eq!(totals.tax_amount.cents(), 1_250);
/// assert_eq!(totals.total.cents(), 13_750);
/// ```
pub fn compute_totals<P: Priced>(items: &[P], tax_rate: TaxRate) -> InvoiceTotals {
    let subtotal: Money = items
        .iter()
        .map(|item| line_amount(item.quantity(), item.rate()))
        .sum();
    let tax_amount = subtotal.calculate_tax(tax_rate);

    InvoiceTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// Plain quantity/rate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInput {
    pub quantity: f64,
    pub rate: Money,
}

impl LineInput {
    pub fn new(quantity: f64, rate: Money) -> Self {
        LineInput { quantity, rate }
    }
}

impl Priced for LineInput {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn rate(&self) -> Money {
        self.rate
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
