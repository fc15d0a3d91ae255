use {
    crate::domain::{
        error::PaymentError,
        gateway::{PaymentGateway, PaymentRequest, VerificationResult},
        id::Reference,
        notify::{ReceiptDetails, ReceiptSender},
        transaction::{PaymentSource, Transaction},
    },
    crate::infra::sqlite::transaction_store::{ReconcileOutcome, TransactionStore},
    chrono::Utc,
    std::{collections::HashMap, sync::Arc},
};

#[derive(Debug, Clone)]
pub struct InitiatedPayment {
    pub reference: Reference,
    pub redirect_url: Option<String>,
}

/// Orchestrates initiate → persist-intent → verify-or-webhook →
/// persist-result → notify. Owns the asymmetric error policy: anything
/// that corrupts the user-visible payment flow surfaces; bookkeeping
/// (persistence after a live gateway session, notification) degrades
/// with a warn log instead.
pub struct ReconciliationService {
    store: TransactionStore,
    gateways: HashMap<PaymentSource, Arc<dyn PaymentGateway>>,
    receipts: Arc<dyn ReceiptSender>,
}

impl ReconciliationService {
    pub fn new(store: TransactionStore, receipts: Arc<dyn ReceiptSender>) -> Self {
        Self {
            store,
            gateways: HashMap::new(),
            receipts,
        }
    }

    pub fn register_gateway(
        mut self,
        source: PaymentSource,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        self.gateways.insert(source, gateway);
        self
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    fn gateway(&self, source: PaymentSource) -> Result<&Arc<dyn PaymentGateway>, PaymentError> {
        self.gateways.get(&source).ok_or_else(|| {
            PaymentError::Config(format!("no gateway registered for {source}"))
        })
    }

    /// Create the remote payment session first, then record the local
    /// intent row. Once the gateway session exists the user must not see a
    /// failure because of our bookkeeping, so a failed insert is logged
    /// and swallowed.
    pub async fn initiate_payment(
        &self,
        request: PaymentRequest,
        source: PaymentSource,
    ) -> Result<InitiatedPayment, PaymentError> {
        let gateway = self.gateway(source)?;
        let initiated = gateway.initiate(&request).await?;

        match self
            .store
            .insert_initialized(
                &initiated.reference,
                request.money,
                request.email.as_deref(),
                request.phone.as_deref(),
                source,
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(reference = %initiated.reference, "reference already recorded, retry ignored");
            }
            Err(e) => {
                tracing::warn!(reference = %initiated.reference, error = %e, "failed to record initiated transaction");
            }
        }

        Ok(InitiatedPayment {
            reference: initiated.reference,
            redirect_url: initiated.redirect_url,
        })
    }

    /// Poll path. Always re-verifies against the provider; the provider's
    /// answer, not the caller's query string, decides the status. A failed
    /// reconcile after a successful verify is bookkeeping and does not fail
    /// the poll.
    pub async fn verify_and_reconcile(
        &self,
        source: PaymentSource,
        identifier: &str,
    ) -> Result<VerificationResult, PaymentError> {
        let gateway = self.gateway(source)?;
        let verification = gateway.verify(identifier).await?;

        if let Err(e) = self.reconcile(&verification).await {
            tracing::warn!(reference = %verification.reference, error = %e, "persist after verify failed");
        }

        Ok(verification)
    }

    /// Webhook path. The payload was already authenticated by the route;
    /// from here it is trusted as the source of truth and reduced to the
    /// same shape the verify call produces.
    pub async fn ingest_webhook(
        &self,
        source: PaymentSource,
        payload: &serde_json::Value,
    ) -> Result<Option<Transaction>, PaymentError> {
        let gateway = self.gateway(source)?;
        let verification = gateway.webhook_verification(payload)?;
        self.reconcile(&verification).await
    }

    /// Apply a normalized verification to the ledger. Safe to call any
    /// number of times with the same terminal result: the store guard keeps
    /// the row state stable and the notification claim keeps the receipt
    /// count at one. An unknown reference is a logged no-op.
    pub async fn reconcile(
        &self,
        result: &VerificationResult,
    ) -> Result<Option<Transaction>, PaymentError> {
        let row = match self.store.apply_verification(result).await? {
            ReconcileOutcome::Missing => {
                tracing::warn!(reference = %result.reference, "no transaction to reconcile against");
                return Ok(None);
            }
            ReconcileOutcome::Unchanged(row) => {
                if result.status.is_terminal() && row.status != result.status.as_str() {
                    tracing::warn!(
                        reference = %result.reference,
                        stored = %row.status,
                        incoming = %result.status,
                        "conflicting terminal report dropped, first terminal wins"
                    );
                }
                return Ok(Some(row));
            }
            ReconcileOutcome::Updated(row) => row,
        };

        if let Some(claimed) = result.amount {
            if claimed != row.amount {
                tracing::warn!(
                    reference = %row.reference,
                    stored = row.amount,
                    claimed,
                    "provider reports a different amount, keeping the stored one"
                );
            }
        }

        if result.status.is_terminal() && row.status == "successful" {
            self.notify_success(&row).await;
        }

        Ok(Some(row))
    }

    /// Best effort: a lost receipt never rolls back the status update.
    async fn notify_success(&self, row: &Transaction) {
        let Some(email) = row.customer_email.clone() else {
            tracing::info!(reference = %row.reference, "successful payment without customer email, no receipt");
            return;
        };

        let claimed = match self.store.claim_notification(&row.reference).await {
            Ok(claimed) => claimed,
            Err(e) => {
                tracing::warn!(reference = %row.reference, error = %e, "notification claim failed");
                return;
            }
        };
        if !claimed {
            return;
        }

        let details = receipt_details(row);
        if let Err(e) = self.receipts.send_receipt(&email, &details).await {
            tracing::warn!(reference = %row.reference, error = %e, "receipt mail failed");
        }
    }

    /// Admin re-trigger. Deliberately bypasses the notification claim:
    /// an operator asking for a resend wants a second mail.
    pub async fn resend_receipt(&self, key: &str) -> Result<(), PaymentError> {
        let row = self
            .store
            .find_by_key(key)
            .await?
            .ok_or_else(|| PaymentError::NotFound(key.to_string()))?;
        let email = row
            .customer_email
            .clone()
            .ok_or_else(|| PaymentError::Validation("no customer email on record".to_string()))?;

        self.receipts
            .send_receipt(&email, &receipt_details(&row))
            .await
    }
}

pub fn receipt_details(row: &Transaction) -> ReceiptDetails {
    ReceiptDetails {
        reference: row.reference.clone(),
        amount: row.amount,
        currency: row.currency.clone(),
        status: row.status.clone(),
        customer_email: row.customer_email.clone(),
        issued_at: Utc::now(),
    }
}
