mod common;

use {
    common::*,
    paysync::domain::{
        error::PaymentError,
        transaction::{PaymentSource, TransactionStatus},
    },
    std::sync::Arc,
};

// ── full round trip: initiate → reconcile → receipt ────────────────────────

#[tokio::test]
async fn mock_round_trip_sends_one_receipt() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    let initiated = service
        .initiate_payment(
            make_request(5000, Some("a@b.com"), None),
            PaymentSource::CardMock,
        )
        .await
        .unwrap();
    assert!(initiated.redirect_url.is_none(), "mock has no hosted page");

    let row = store
        .find_by_reference(initiated.reference.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "initialized");
    assert_eq!(row.amount, 5000);
    assert_eq!(row.source, "card-mock");

    let verification = make_verification(
        initiated.reference.as_str(),
        TransactionStatus::Successful,
        Some("a@b.com"),
    );
    let row = service.reconcile(&verification).await.unwrap().unwrap();
    assert_eq!(row.status, "successful");

    let sent = receipts.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "a@b.com");
    assert_eq!(sent[0].1, initiated.reference.as_str());
}

#[tokio::test]
async fn repeated_terminal_reconcile_sends_no_second_receipt() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    seed_initialized(&store, "TX_repeat", Some("a@b.com")).await;
    let verification =
        make_verification("TX_repeat", TransactionStatus::Successful, Some("a@b.com"));

    service.reconcile(&verification).await.unwrap();
    service.reconcile(&verification).await.unwrap();
    service.reconcile(&verification).await.unwrap();

    let row = store.find_by_reference("TX_repeat").await.unwrap().unwrap();
    assert_eq!(row.status, "successful");
    assert_eq!(receipts.count(), 1, "same webhook twice, one mail");
}

// ── failure asymmetry ──────────────────────────────────────────────────────

#[tokio::test]
async fn unconfigured_gateway_fails_before_any_row_is_written() {
    let store = setup_store().await;
    let service = build_service(store.clone(), Arc::new(RecordingReceiptSender::default()));

    let err = service
        .initiate_payment(make_request(100, None, None), PaymentSource::Lygos)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Config(_)), "got: {err:?}");

    let rows = store.list(&Default::default()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn unknown_reference_reconcile_is_a_quiet_no_op() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    let verification =
        make_verification("does-not-exist", TransactionStatus::Successful, Some("a@b.com"));
    let result = service.reconcile(&verification).await.unwrap();

    assert!(result.is_none());
    assert_eq!(receipts.count(), 0);
}

#[tokio::test]
async fn receipt_failure_never_rolls_back_the_status() {
    let store = setup_store().await;
    let service = build_service(store.clone(), Arc::new(FailingReceiptSender));

    seed_initialized(&store, "TX_mailfail", Some("a@b.com")).await;
    let verification =
        make_verification("TX_mailfail", TransactionStatus::Successful, Some("a@b.com"));

    let row = service.reconcile(&verification).await.unwrap().unwrap();
    assert_eq!(row.status, "successful");
}

#[tokio::test]
async fn success_without_email_sends_nothing() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    seed_initialized(&store, "TX_noemail", None).await;
    let verification = make_verification("TX_noemail", TransactionStatus::Successful, None);

    let row = service.reconcile(&verification).await.unwrap().unwrap();
    assert_eq!(row.status, "successful");
    assert_eq!(receipts.count(), 0);
}

#[tokio::test]
async fn failed_payment_sends_no_receipt() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    seed_initialized(&store, "TX_failed", Some("a@b.com")).await;
    let verification =
        make_verification("TX_failed", TransactionStatus::Failed, Some("a@b.com"));

    service.reconcile(&verification).await.unwrap();
    assert_eq!(receipts.count(), 0);
}

// ── email learned from the verification result ─────────────────────────────

#[tokio::test]
async fn email_from_verification_backfills_the_row() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    // Initiated without an email; the provider learns it during checkout.
    seed_initialized(&store, "TX_learn", None).await;
    let verification =
        make_verification("TX_learn", TransactionStatus::Successful, Some("late@b.com"));

    service.reconcile(&verification).await.unwrap();

    let row = store.find_by_reference("TX_learn").await.unwrap().unwrap();
    assert_eq!(row.customer_email.as_deref(), Some("late@b.com"));
    assert_eq!(receipts.count(), 1);
}

// ── poll path against the mock provider ────────────────────────────────────

#[tokio::test]
async fn verify_and_reconcile_uses_the_provider_answer() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    seed_initialized(&store, "TX_poll", Some("a@b.com")).await;

    let verification = service
        .verify_and_reconcile(PaymentSource::CardMock, "TX_poll")
        .await
        .unwrap();
    assert_eq!(verification.status, TransactionStatus::Successful);

    let row = store.find_by_reference("TX_poll").await.unwrap().unwrap();
    assert_eq!(row.status, "successful");
    assert_eq!(receipts.count(), 1);
}

// ── admin resend ───────────────────────────────────────────────────────────

#[tokio::test]
async fn resend_receipt_bypasses_the_notification_claim() {
    let store = setup_store().await;
    let receipts = Arc::new(RecordingReceiptSender::default());
    let service = build_service(store.clone(), receipts.clone());

    seed_initialized(&store, "TX_resend", Some("a@b.com")).await;
    let verification =
        make_verification("TX_resend", TransactionStatus::Successful, Some("a@b.com"));
    service.reconcile(&verification).await.unwrap();
    assert_eq!(receipts.count(), 1);

    service.resend_receipt("TX_resend").await.unwrap();
    assert_eq!(receipts.count(), 2, "an operator asking again gets a second mail");
}

#[tokio::test]
async fn resend_receipt_requires_an_email_on_file() {
    let store = setup_store().await;
    let service = build_service(store.clone(), Arc::new(RecordingReceiptSender::default()));

    seed_initialized(&store, "TX_resend_noemail", None).await;
    let err = service.resend_receipt("TX_resend_noemail").await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));

    let err = service.resend_receipt("TX_resend_missing").await.unwrap_err();
    assert!(matches!(err, PaymentError::NotFound(_)));
}
