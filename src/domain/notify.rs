use {
    super::error::PaymentError,
    chrono::{DateTime, Utc},
    std::{future::Future, pin::Pin},
};

/// Everything a receipt shows.
#[derive(Debug, Clone)]
pub struct ReceiptDetails {
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub customer_email: Option<String>,
    pub issued_at: DateTime<Utc>,
}

pub trait ReceiptSender: Send + Sync {
    fn send_receipt(
        &self,
        email: &str,
        details: &ReceiptDetails,
    ) -> Pin<Box<dyn Future<Output = Result<(), PaymentError>> + Send + '_>>;
}
