use {
    super::{admin, api_errors::ApiError},
    crate::{
        AppState,
        domain::{
            error::PaymentError,
            gateway::PaymentRequest,
            money::{Currency, Money, MoneyAmount},
            transaction::PaymentSource,
        },
    },
    axum::{
        Json, Router,
        extract::{DefaultBodyLimit, Path, Query, State},
        http::HeaderMap,
        routing::{get, post},
    },
    serde::Deserialize,
    serde_json::json,
    std::time::Duration,
    tower_http::timeout::TimeoutLayer,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/pay/{provider}/init", post(init_payment))
        .route("/pay/{provider}/verify", get(verify_payment))
        .route("/pay/{provider}/webhook", post(webhook))
        .merge(admin::router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct InitBody {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

async fn init_payment(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(body): Json<InitBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let source = PaymentSource::try_from(provider.as_str())?;
    let amount = body
        .amount
        .ok_or_else(|| PaymentError::Validation("amount is required".to_string()))?;
    // XAF has no minor unit, so amounts arrive as whole units. A fractional
    // amount must not be rounded into a different charge behind the
    // caller's back.
    if amount.fract() != 0.0 {
        return Err(PaymentError::Validation(format!(
            "amount must be a whole number of currency units, got: {amount}"
        ))
        .into());
    }
    let amount = MoneyAmount::new(amount as i64)?;
    let currency = match &body.currency {
        Some(c) => Currency::try_from(c.as_str())?,
        None => Currency::default(),
    };

    let request = PaymentRequest {
        money: Money::new(amount, currency),
        email: body.email,
        phone: body.phone,
        name: body.name,
        description: body.description,
    };

    let initiated = state.service.initiate_payment(request, source).await?;
    tracing::info!(reference = %initiated.reference, %source, "payment initiated");

    Ok(Json(json!({
        "ok": true,
        "reference": initiated.reference,
        "redirect_url": initiated.redirect_url,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub transaction_id: Option<String>,
    pub order_id: Option<String>,
    pub reference: Option<String>,
    pub id: Option<String>,
}

impl VerifyQuery {
    /// Providers disagree on which identifier their verify endpoint takes.
    fn identifier(&self) -> Option<&str> {
        self.transaction_id
            .as_deref()
            .or(self.order_id.as_deref())
            .or(self.reference.as_deref())
            .or(self.id.as_deref())
    }
}

async fn verify_payment(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let source = PaymentSource::try_from(provider.as_str())?;
    let identifier = query.identifier().ok_or_else(|| {
        PaymentError::Validation("transaction identifier is required".to_string())
    })?;

    let verification = state.service.verify_and_reconcile(source, identifier).await?;
    Ok(Json(json!({"ok": true, "data": verification})))
}

/// Async provider push. Replies 200 after the signature check no matter
/// what happens internally — a 5xx here would only make the provider
/// storm us with retries for a row we may never be able to write.
async fn webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_webhook_signature(&state, &headers)?;

    let source = PaymentSource::try_from(provider.as_str())?;
    match state.service.ingest_webhook(source, &payload).await {
        Ok(Some(row)) => {
            tracing::info!(reference = %row.reference, status = %row.status, "webhook reconciled");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(%source, error = %e, "webhook processing failed");
        }
    }

    Ok(Json(json!({"ok": true})))
}

fn check_webhook_signature(state: &AppState, headers: &HeaderMap) -> Result<(), PaymentError> {
    let secret = state
        .config
        .webhook_secret
        .as_deref()
        .ok_or_else(|| PaymentError::Auth("webhook secret not configured".to_string()))?;
    let signature = headers
        .get("verif-hash")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PaymentError::Auth("missing verif-hash header".to_string()))?;

    if signature != secret {
        return Err(PaymentError::Auth("invalid webhook signature".to_string()));
    }
    Ok(())
}
