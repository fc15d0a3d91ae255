use {
    super::{json_id, json_str},
    crate::domain::{
        error::PaymentError,
        gateway::{InitiateResult, PaymentGateway, PaymentRequest, VerificationResult},
        id::Reference,
        money::Currency,
        transaction::normalize_status,
    },
    serde_json::json,
    std::{future::Future, pin::Pin},
};

/// Lygos hosted-checkout gateway. Lygos keys sessions by an `order_id`,
/// which we populate with our own reference so the callback and verify
/// paths correlate without extra bookkeeping.
pub struct LygosGateway {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    front_url: String,
}

impl LygosGateway {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: String,
        front_url: String,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            front_url,
        }
    }

    fn api_key(&self) -> Result<&str, PaymentError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PaymentError::Config("LYGOS_API_KEY is not configured".to_string()))
    }

    async fn initiate_inner(
        &self,
        request: &PaymentRequest,
    ) -> Result<InitiateResult, PaymentError> {
        let api_key = self.api_key()?;
        let reference = Reference::generate();

        let callback = |status: &str| {
            format!(
                "{}/payment/callback?order_id={}&status={status}",
                self.front_url,
                reference.as_str()
            )
        };
        let body = json!({
            "amount": request.money.amount().units(),
            "shop_name": "PaySync",
            "message": request.description.as_deref().unwrap_or("Order payment"),
            "success_url": callback("successful"),
            "failure_url": callback("failed"),
            "order_id": reference.as_str(),
        });

        let resp = self
            .client
            .post(format!("{}/gateway", self.base_url))
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await.unwrap_or_default();
        if !status.is_success() {
            let message = json_str(data.get("message"))
                .unwrap_or_else(|| "Lygos init failed".to_string());
            return Err(PaymentError::gateway(status.as_u16(), message));
        }

        // The payment link moves around between API versions.
        let redirect_url = json_str(data.get("url"))
            .or_else(|| json_str(data.get("payment_url")))
            .or_else(|| json_str(data.get("link")))
            .or_else(|| json_str(data.get("data").and_then(|d| d.get("url"))));

        Ok(InitiateResult {
            reference,
            redirect_url,
            raw_response: data,
        })
    }

    async fn verify_inner(&self, identifier: &str) -> Result<VerificationResult, PaymentError> {
        let api_key = self.api_key()?;
        let resp = self
            .client
            .get(format!("{}/gateway/payin/{identifier}", self.base_url))
            .header("api-key", api_key)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await.unwrap_or_default();
        if !status.is_success() {
            let message = json_str(data.get("message"))
                .unwrap_or_else(|| "Lygos verify failed".to_string());
            return Err(PaymentError::gateway(status.as_u16(), message));
        }

        let payload = data.get("data").cloned().unwrap_or(data);
        verification_from_payload(identifier, payload)
    }
}

/// Shared between the verify response and webhook pushes; both carry the
/// order_id we issued plus a free-text status.
fn verification_from_payload(
    reference: &str,
    payload: serde_json::Value,
) -> Result<VerificationResult, PaymentError> {
    let raw_status = json_str(payload.get("status"))
        .or_else(|| json_str(payload.get("payment_status")))
        .unwrap_or_default();

    Ok(VerificationResult {
        reference: Reference::new(reference)?,
        gateway_id: json_id(payload.get("id")),
        status: normalize_status(&raw_status),
        amount: payload.get("amount").and_then(|v| v.as_i64()),
        currency: json_str(payload.get("currency"))
            .and_then(|c| Currency::try_from(c.as_str()).ok()),
        customer_email: json_str(payload.get("customer_email"))
            .or_else(|| json_str(payload.get("email"))),
        raw_payload: payload,
    })
}

impl PaymentGateway for LygosGateway {
    fn initiate(
        &self,
        request: &PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InitiateResult, PaymentError>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move { self.initiate_inner(&request).await })
    }

    fn verify(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<VerificationResult, PaymentError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move { self.verify_inner(&identifier).await })
    }

    fn webhook_verification(
        &self,
        payload: &serde_json::Value,
    ) -> Result<VerificationResult, PaymentError> {
        let payload = payload.get("data").cloned().unwrap_or_else(|| payload.clone());
        let reference = json_str(payload.get("order_id")).ok_or_else(|| {
            PaymentError::Validation("lygos webhook missing order_id".to_string())
        })?;
        verification_from_payload(&reference, payload)
    }
}
