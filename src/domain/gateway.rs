use {
    super::error::PaymentError,
    super::id::Reference,
    super::money::{Currency, Money},
    super::transaction::TransactionStatus,
    std::{future::Future, pin::Pin},
};

/// What a caller supplies to start a payment.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub money: Money,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// What an adapter returns after creating a remote payment session.
/// Mock adapters have no hosted page, so no redirect.
#[derive(Debug, Clone)]
pub struct InitiateResult {
    pub reference: Reference,
    pub redirect_url: Option<String>,
    pub raw_response: serde_json::Value,
}

/// A provider's view of a transaction, reduced to the canonical shape.
/// Produced by both the verify endpoint and webhook ingestion.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VerificationResult {
    pub reference: Reference,
    pub gateway_id: Option<String>,
    pub status: TransactionStatus,
    pub amount: Option<i64>,
    pub currency: Option<Currency>,
    pub customer_email: Option<String>,
    pub raw_payload: serde_json::Value,
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One implementation per provider. `initiate` and `verify` each perform a
/// single outbound HTTP call; persistence belongs to the reconciliation
/// service, never to the adapter.
pub trait PaymentGateway: Send + Sync {
    fn initiate(
        &self,
        request: &PaymentRequest,
    ) -> BoxFuture<'_, Result<InitiateResult, PaymentError>>;

    /// `identifier` is the local reference or a provider transaction id,
    /// whichever the provider's verify endpoint accepts.
    fn verify(&self, identifier: &str) -> BoxFuture<'_, Result<VerificationResult, PaymentError>>;

    /// Reduce an already-authenticated webhook payload to the same shape
    /// the verify call produces. Pure normalization, no outbound call.
    fn webhook_verification(
        &self,
        payload: &serde_json::Value,
    ) -> Result<VerificationResult, PaymentError>;
}
