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

/// Flutterwave v3 standard checkout. Initiation keys the session by our
/// `tx_ref`; verification goes by the provider-assigned transaction id,
/// and the response echoes the `tx_ref` back for correlation.
pub struct FlutterwaveGateway {
    client: reqwest::Client,
    secret_key: Option<String>,
    base_url: String,
    front_url: String,
}

impl FlutterwaveGateway {
    pub fn new(
        client: reqwest::Client,
        secret_key: Option<String>,
        base_url: String,
        front_url: String,
    ) -> Self {
        Self {
            client,
            secret_key,
            base_url,
            front_url,
        }
    }

    fn secret_key(&self) -> Result<&str, PaymentError> {
        self.secret_key
            .as_deref()
            .ok_or_else(|| PaymentError::Config("FLW_SECRET_KEY is not configured".to_string()))
    }

    async fn initiate_inner(
        &self,
        request: &PaymentRequest,
    ) -> Result<InitiateResult, PaymentError> {
        let secret = self.secret_key()?;
        let reference = Reference::generate();

        let body = json!({
            "tx_ref": reference.as_str(),
            "amount": request.money.amount().units(),
            "currency": request.money.currency().as_str(),
            "redirect_url": format!("{}/payment/callback", self.front_url),
            "customer": {
                "email": request.email.as_deref().unwrap_or("client@example.com"),
                "phonenumber": request.phone,
                "name": request.name.as_deref().unwrap_or("Client"),
            },
            "customizations": {
                "title": "PaySync",
                "description": request.description.as_deref().unwrap_or("Order payment"),
            },
        });

        let resp = self
            .client
            .post(format!("{}/payments", self.base_url))
            .bearer_auth(secret)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await.unwrap_or_default();
        if !status.is_success() {
            let message = json_str(data.get("message"))
                .unwrap_or_else(|| "Flutterwave init failed".to_string());
            return Err(PaymentError::gateway(status.as_u16(), message));
        }

        let redirect_url = json_str(data.get("data").and_then(|d| d.get("link")));

        Ok(InitiateResult {
            reference,
            redirect_url,
            raw_response: data,
        })
    }

    async fn verify_inner(&self, identifier: &str) -> Result<VerificationResult, PaymentError> {
        let secret = self.secret_key()?;
        let resp = self
            .client
            .get(format!("{}/transactions/{identifier}/verify", self.base_url))
            .bearer_auth(secret)
            .send()
            .await?;

        let status = resp.status();
        let data: serde_json::Value = resp.json().await.unwrap_or_default();
        if !status.is_success() {
            let message = json_str(data.get("message"))
                .unwrap_or_else(|| "Flutterwave verify failed".to_string());
            return Err(PaymentError::gateway(status.as_u16(), message));
        }

        let payload = data.get("data").cloned().unwrap_or(data);
        verification_from_payload(payload)
    }
}

/// The verify response and webhook push share one shape: `tx_ref`, numeric
/// `id`, free-text `status` and a nested `customer`.
fn verification_from_payload(
    payload: serde_json::Value,
) -> Result<VerificationResult, PaymentError> {
    let tx_ref = json_str(payload.get("tx_ref")).ok_or_else(|| {
        PaymentError::Validation("flutterwave payload missing tx_ref".to_string())
    })?;
    let raw_status = json_str(payload.get("status")).unwrap_or_default();
    let customer = payload.get("customer");
    let customer_email = json_str(customer.and_then(|c| c.get("email")))
        .or_else(|| json_str(customer.and_then(|c| c.get("email_address"))));

    Ok(VerificationResult {
        reference: Reference::new(tx_ref)?,
        gateway_id: json_id(payload.get("id")),
        status: normalize_status(&raw_status),
        amount: payload.get("amount").and_then(|v| v.as_i64()),
        currency: json_str(payload.get("currency"))
            .and_then(|c| Currency::try_from(c.as_str()).ok()),
        customer_email,
        raw_payload: payload,
    })
}

impl PaymentGateway for FlutterwaveGateway {
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
        verification_from_payload(payload)
    }
}
