#![allow(dead_code)]

use {
    paysync::{
        adapters::{
            flutterwave::FlutterwaveGateway,
            lygos::LygosGateway,
            mock::{CardMockGateway, MtnMockGateway},
        },
        domain::{
            error::PaymentError,
            gateway::{PaymentRequest, VerificationResult},
            id::Reference,
            money::{Currency, Money, MoneyAmount},
            notify::{ReceiptDetails, ReceiptSender},
            transaction::{PaymentSource, TransactionStatus},
        },
        infra::sqlite::transaction_store::TransactionStore,
        services::reconciliation::ReconciliationService,
    },
    sqlx::sqlite::SqlitePoolOptions,
    std::{
        future::Future,
        pin::Pin,
        sync::{Arc, Mutex},
    },
};

/// Fresh in-memory database per test. One connection so every query sees
/// the same memory store.
pub async fn setup_store() -> TransactionStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    TransactionStore::new(pool)
}

/// Records every (recipient, reference) pair instead of talking SMTP.
#[derive(Default)]
pub struct RecordingReceiptSender {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingReceiptSender {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl ReceiptSender for RecordingReceiptSender {
    fn send_receipt(
        &self,
        email: &str,
        details: &ReceiptDetails,
    ) -> Pin<Box<dyn Future<Output = Result<(), PaymentError>> + Send + '_>> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), details.reference.clone()));
        Box::pin(async { Ok(()) })
    }
}

/// Always fails, for checking that mail trouble never blocks reconciliation.
pub struct FailingReceiptSender;

impl ReceiptSender for FailingReceiptSender {
    fn send_receipt(
        &self,
        _email: &str,
        _details: &ReceiptDetails,
    ) -> Pin<Box<dyn Future<Output = Result<(), PaymentError>> + Send + '_>> {
        Box::pin(async { Err(PaymentError::Notification("smtp down".to_string())) })
    }
}

/// Service wired like production, except the real providers point at a
/// closed port and carry no keys (so any outbound attempt fails loudly).
pub fn build_service(
    store: TransactionStore,
    receipts: Arc<dyn ReceiptSender>,
) -> ReconciliationService {
    let client = reqwest::Client::new();
    ReconciliationService::new(store, receipts)
        .register_gateway(PaymentSource::CardMock, Arc::new(CardMockGateway))
        .register_gateway(PaymentSource::MtnMock, Arc::new(MtnMockGateway))
        .register_gateway(
            PaymentSource::Lygos,
            Arc::new(LygosGateway::new(
                client.clone(),
                None,
                "http://127.0.0.1:9".to_string(),
                "http://localhost:5173".to_string(),
            )),
        )
        .register_gateway(
            PaymentSource::Flutterwave,
            Arc::new(FlutterwaveGateway::new(
                client,
                None,
                "http://127.0.0.1:9".to_string(),
                "http://localhost:5173".to_string(),
            )),
        )
}

pub fn make_request(amount: i64, email: Option<&str>, phone: Option<&str>) -> PaymentRequest {
    PaymentRequest {
        money: Money::new(MoneyAmount::new(amount).unwrap(), Currency::Xaf),
        email: email.map(str::to_string),
        phone: phone.map(str::to_string),
        name: None,
        description: None,
    }
}

pub fn make_verification(
    reference: &str,
    status: TransactionStatus,
    email: Option<&str>,
) -> VerificationResult {
    VerificationResult {
        reference: Reference::new(reference).unwrap(),
        gateway_id: Some("9912".to_string()),
        status,
        amount: Some(5000),
        currency: Some(Currency::Xaf),
        customer_email: email.map(str::to_string),
        raw_payload: serde_json::json!({"status": status.as_str()}),
    }
}

pub async fn seed_initialized(store: &TransactionStore, reference: &str, email: Option<&str>) {
    let inserted = store
        .insert_initialized(
            &Reference::new(reference).unwrap(),
            Money::new(MoneyAmount::new(5000).unwrap(), Currency::Xaf),
            email,
            Some("+237650000001"),
            PaymentSource::CardMock,
        )
        .await
        .expect("seed insert failed");
    assert!(inserted);
}
