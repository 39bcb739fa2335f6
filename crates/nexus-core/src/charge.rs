//! # Charge Requests
//!
//! Validation and request building for paying an invoice in part or in full.
//!
//! ```text
//! Invoice total $100.00 ── total paid $40.00 ──► remaining $60.00
//!                                                   │
//!        quick picks: pay_full = $60.00, pay_half = $30.00
//!                                                   │
//!   user amount ──► validate_payment_amount ──► build_charge_request
//!                    (0 < amount ≤ remaining)       └──► ChargeRequest (cents)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Invoice;

/// Currency sent with charge requests unless configured otherwise.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Path the processor redirects to after a successful checkout.
pub const DEFAULT_SUCCESS_PATH: &str = "/payment-success";

/// Path the processor redirects to when the user abandons checkout.
pub const DEFAULT_CANCEL_PATH: &str = "/payment-canceled";

/// Amount still owed. Negative when overpaid.
#[inline]
pub fn remaining_balance(total: Money, total_paid: Money) -> Money {
    total - total_paid
}

/// "Pay full" shortcut.
#[inline]
pub fn pay_full(remaining: Money) -> Money {
    remaining.clamp_non_negative()
}

/// "Pay half" shortcut, rounding half a cent up.
#[inline]
pub fn pay_half(remaining: Money) -> Money {
    remaining.clamp_non_negative().half()
}

/// Checks a partial payment amount against the remaining balance.
///
/// ## Errors
/// - `AlreadyPaid` when nothing remains
/// - `Validation(MustBePositive)` when `amount <= 0`
/// - `PaymentExceedsBalance` when `amount > remaining`
pub fn validate_payment_amount(
    invoice_id: &str,
    amount: Money,
    remaining: Money,
) -> CoreResult<()> {
    if !remaining.is_positive() {
        return Err(CoreError::AlreadyPaid {
            invoice_id: invoice_id.to_string(),
        });
    }
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        }
        .into());
    }
    if amount > remaining {
        return Err(CoreError::PaymentExceedsBalance {
            requested: amount,
            remaining,
        });
    }
    Ok(())
}

/// Processor settings that do not depend on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeOptions {
    pub currency: String,
    pub success_path: String,
    pub cancel_path: String,
}

impl Default for ChargeOptions {
    fn default() -> Self {
        ChargeOptions {
            currency: DEFAULT_CURRENCY.to_string(),
            success_path: DEFAULT_SUCCESS_PATH.to_string(),
            cancel_path: DEFAULT_CANCEL_PATH.to_string(),
        }
    }
}

/// Payload handed to the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChargeRequest {
    pub invoice_id: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub success_path: String,
    pub cancel_path: String,
}

/// `Partial Payment - Invoice <number or first 8 chars of id>`.
pub fn charge_description(invoice: &Invoice) -> String {
    format!("Partial Payment - Invoice {}", invoice.display_number())
}

/// Validates `amount` and builds the processor request.
pub fn build_charge_request(
    invoice: &Invoice,
    total_paid: Money,
    amount: Money,
    options: &ChargeOptions,
) -> CoreResult<ChargeRequest> {
    let remaining = remaining_balance(invoice.total(), total_paid);
    validate_payment_amount(&invoice.id, amount, remaining)?;

    Ok(ChargeRequest {
        invoice_id: invoice.id.clone(),
        amount: amount.cents(),
        currency: options.currency.clone(),
        description: charge_description(invoice),
        success_path: options.success_path.clone(),
        cancel_path: options.cancel_path.clone(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
