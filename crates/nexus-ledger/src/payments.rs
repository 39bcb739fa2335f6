//! # Payment Initiation
//!
//! Turns "pay X towards this invoice" into a checkout redirect.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Partial Payment Flow                            │
//! │                                                                         │
//! │  quote(invoice)                                                        │
//! │    └── total_paid (cached 30s) ──► remaining, pay full, pay half      │
//! │                                                                         │
//! │  pay(invoice, amount)                                                  │
//! │    1. remaining = total − total_paid                                   │
//! │    2. 0 < amount ≤ remaining, else Core error (nothing sent)          │
//! │    3. ChargeRequest ──► ChargeInitiator::initiate_charge               │
//! │    4. no redirect URL ──► NoCheckoutUrl                                │
//! │    5. invalidate invoice + dashboard caches                            │
//! │    6. return redirect URL                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use nexus_core::charge::{build_charge_request, pay_full, pay_half, remaining_balance, ChargeOptions, ChargeRequest};
use nexus_core::{Invoice, Money};

use crate::aggregator::PaymentAggregator;
use crate::error::{LedgerError, LedgerResult};
use crate::source::LedgerSource;

// =============================================================================
// Charge Collaborator
// =============================================================================

/// What the processor answers to a charge request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Where to send the payer. `None` means the session was not created.
    pub redirect_url: Option<String>,
}

/// The payment processor seam.
pub trait ChargeInitiator: Send + Sync {
    fn initiate_charge(
        &self,
        request: &ChargeRequest,
    ) -> impl Future<Output = LedgerResult<CheckoutSession>> + Send;
}

/// Processor stand-in that redirects straight to the success page.
///
/// Redirect: `<base><success_path>?invoice_id=<id>&session_id=mock_<uuid>`.
#[derive(Debug)]
pub struct MockChargeInitiator {
    base_url: String,
    requests: Mutex<Vec<ChargeRequest>>,
}

impl MockChargeInitiator {
    pub fn new(base_url: impl Into<String>) -> Self {
        MockChargeInitiator {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ChargeRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ChargeInitiator for MockChargeInitiator {
    async fn initiate_charge(&self, request: &ChargeRequest) -> LedgerResult<CheckoutSession> {
        let session_id = format!("mock_{}", Uuid::new_v4().simple());
        let url = format!(
            "{}{}?invoice_id={}&session_id={}",
            self.base_url, request.success_path, request.invoice_id, session_id
        );

        match self.requests.lock() {
            Ok(mut requests) => requests.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        debug!(invoice_id = %request.invoice_id, session_id = %session_id, "Mock checkout created");
        Ok(CheckoutSession {
            redirect_url: Some(url),
        })
    }
}

// =============================================================================
// Payment Flow
// =============================================================================

/// Amounts the payment dialog offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    pub total: Money,
    pub paid: Money,
    pub remaining: Money,
    pub pay_full: Money,
    pub pay_half: Money,
    /// Set when the paid total could not be loaded and is shown as zero.
    pub notice: Option<String>,
}

impl PaymentQuote {
    pub fn is_fully_paid(&self) -> bool {
        !self.remaining.is_positive()
    }
}

pub struct PaymentFlow<S, C> {
    aggregator: PaymentAggregator<S>,
    initiator: C,
    options: ChargeOptions,
}

impl<S: LedgerSource, C: ChargeInitiator> PaymentFlow<S, C> {
    pub fn new(aggregator: PaymentAggregator<S>, initiator: C, options: ChargeOptions) -> Self {
        PaymentFlow {
            aggregator,
            initiator,
            options,
        }
    }

    pub fn initiator(&self) -> &C {
        &self.initiator
    }

    /// Remaining balance and quick-pick amounts for `invoice`.
    pub async fn quote(&self, invoice: &Invoice) -> PaymentQuote {
        let summary = self.aggregator.total_paid(&invoice.id).await;
        let remaining = remaining_balance(invoice.total(), summary.total_paid);
        PaymentQuote {
            total: invoice.total(),
            paid: summary.total_paid,
            remaining,
            pay_full: pay_full(remaining),
            pay_half: pay_half(remaining),
            notice: summary.notice,
        }
    }

    /// Validates `amount` and starts a checkout session for it.
    ///
    /// ## Returns
    /// The redirect URL. On any error nothing is charged and caches are kept.
    pub async fn pay(&self, invoice: &Invoice, amount: Money) -> LedgerResult<String> {
        let summary = self.aggregator.total_paid(&invoice.id).await;
        let request = build_charge_request(invoice, summary.total_paid, amount, &self.options)?;

        info!(
            invoice_id = %invoice.id,
            amount_cents = request.amount,
            currency = %request.currency,
            "Initiating charge"
        );

        let session = self.initiator.initiate_charge(&request).await?;
        let url = session
            .redirect_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                warn!(invoice_id = %invoice.id, "Checkout session without redirect URL");
                LedgerError::NoCheckoutUrl
            })?;

        self.aggregator.invalidate(&invoice.id).await;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use nexus_core::{CoreError, InvoiceStatus, PaymentStatus};

    use crate::cache::SessionCaches;
    use crate::source::fake::{invoice, payment, FakeSource, OWNER};

    struct NoUrlInitiator;

    impl ChargeInitiator for NoUrlInitiator {
        async fn initiate_charge(&self, _request: &ChargeRequest) -> LedgerResult<CheckoutSession> {
            Ok(CheckoutSession::default())
        }
    }

    fn sent_invoice() -> Invoice {
        let mut inv = invoice("9f1c2d3e-aaaa-bbbb", InvoiceStatus::Sent, None, 10_000, Utc::now());
        inv.invoice_number = Some("INV.2026.1014.09".to_string());
        inv
    }

    fn flow<C: ChargeInitiator>(
        initiator: C,
        paid_cents: i64,
    ) -> (PaymentFlow<FakeSource, C>, Arc<FakeSource>, Arc<SessionCaches>) {
        let inv = sent_invoice();
        let source = Arc::new(FakeSource::new(
            vec![payment(&inv.id, paid_cents, PaymentStatus::Paid, Some(Utc::now()))],
            vec![inv],
        ));
        let caches = Arc::new(SessionCaches::default());
        let aggregator = PaymentAggregator::new(Arc::clone(&source), Arc::clone(&caches));
        (
            PaymentFlow::new(aggregator, initiator, ChargeOptions::default()),
            source,
            caches,
        )
    }

    #[tokio::test]
    async fn test_quote_offers_full_and_half() {
        let (flow, _, _) = flow(MockChargeInitiator::new("http://localhost:8080"), 4_001);
        let quote = flow.quote(&sent_invoice()).await;
        assert_eq!(quote.remaining, Money::from_cents(5_999));
        assert_eq!(quote.pay_full, Money::from_cents(5_999));
        assert_eq!(quote.pay_half, Money::from_cents(3_000));
        assert!(!quote.is_fully_paid());
    }

    #[tokio::test]
    async fn test_pay_returns_mock_redirect_and_invalidates() {
        let (flow, source, caches) = flow(MockChargeInitiator::new("http://localhost:8080/"), 4_000);
        let inv = sent_invoice();

        let url = flow.pay(&inv, Money::from_cents(2_500)).await.unwrap();
        assert!(url.starts_with(
            "http://localhost:8080/payment-success?invoice_id=9f1c2d3e-aaaa-bbbb&session_id=mock_"
        ));

        let sent = flow.initiator().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].amount, 2_500);
        assert_eq!(sent[0].currency, "usd");
        assert_eq!(sent[0].description, "Partial Payment - Invoice INV.2026.1014.09");
        assert_eq!(sent[0].cancel_path, "/payment-canceled");

        // The next read goes back to the source.
        assert!(caches.invoice_payments.get(inv.id.as_str()).await.is_none());
        assert!(caches.dashboard.get(OWNER).await.is_none());
        let before = source.payment_fetches();
        flow.quote(&inv).await;
        assert_eq!(source.payment_fetches(), before + 1);
    }

    #[tokio::test]
    async fn test_amount_above_remaining_is_rejected() {
        let (flow, _, _) = flow(MockChargeInitiator::new("http://localhost:8080"), 4_000);
        let err = flow
            .pay(&sent_invoice(), Money::from_cents(6_001))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::PaymentExceedsBalance { .. })
        ));
        assert!(err.is_validation());
        assert!(flow.initiator().requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected() {
        let (flow, _, _) = flow(MockChargeInitiator::new("http://localhost:8080"), 0);
        for cents in [0, -100] {
            let err = flow.pay(&sent_invoice(), Money::from_cents(cents)).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert!(flow.initiator().requests().is_empty());
    }

    #[tokio::test]
    async fn test_fully_paid_invoice_cannot_be_charged() {
        let (flow, _, _) = flow(MockChargeInitiator::new("http://localhost:8080"), 10_000);
        assert!(flow.quote(&sent_invoice()).await.is_fully_paid());
        let err = flow.pay(&sent_invoice(), Money::from_cents(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::AlreadyPaid { .. })));
    }

    #[tokio::test]
    async fn test_missing_redirect_is_an_error_and_keeps_cache() {
        let (flow, _, caches) = flow(NoUrlInitiator, 1_000);
        let inv = sent_invoice();

        let err = flow.pay(&inv, Money::from_cents(500)).await.unwrap_err();
        assert_eq!(err.to_string(), "No checkout URL returned");
        assert!(caches.invoice_payments.get(inv.id.as_str()).await.is_some());
    }
}
