use {
    crate::domain::{
        error::PaymentError,
        gateway::{InitiateResult, PaymentGateway, PaymentRequest, VerificationResult},
        id::Reference,
        transaction::TransactionStatus,
    },
    serde_json::json,
    std::{future::Future, pin::Pin},
};

/// Stub card gateway: validates locally and reports a canned success.
/// No remote session exists, so there is nothing to redirect to.
pub struct CardMockGateway;

/// Stub MTN mobile-money gateway. Requires a phone number, since a real
/// mobile-money push has nowhere to go without one.
pub struct MtnMockGateway;

fn canned_initiate(method: &str) -> InitiateResult {
    let reference = Reference::generate();
    let raw_response = json!({
        "method": method,
        "status": "successful",
        "message": format!("{method} payment accepted (mock)"),
    });
    InitiateResult {
        reference,
        redirect_url: None,
        raw_response,
    }
}

fn canned_verification(identifier: &str, method: &str) -> Result<VerificationResult, PaymentError> {
    Ok(VerificationResult {
        reference: Reference::new(identifier)?,
        gateway_id: None,
        status: TransactionStatus::Successful,
        amount: None,
        currency: None,
        customer_email: None,
        raw_payload: json!({"method": method, "status": "successful"}),
    })
}

impl PaymentGateway for CardMockGateway {
    fn initiate(
        &self,
        _request: &PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InitiateResult, PaymentError>> + Send + '_>> {
        Box::pin(async move { Ok(canned_initiate("card")) })
    }

    fn verify(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<VerificationResult, PaymentError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move { canned_verification(&identifier, "card") })
    }

    fn webhook_verification(
        &self,
        _payload: &serde_json::Value,
    ) -> Result<VerificationResult, PaymentError> {
        Err(PaymentError::Validation(
            "card-mock does not deliver webhooks".to_string(),
        ))
    }
}

impl PaymentGateway for MtnMockGateway {
    fn initiate(
        &self,
        request: &PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InitiateResult, PaymentError>> + Send + '_>> {
        let has_phone = request.phone.as_deref().is_some_and(|p| !p.is_empty());
        Box::pin(async move {
            if !has_phone {
                return Err(PaymentError::Validation("phone is required".to_string()));
            }
            Ok(canned_initiate("mtn"))
        })
    }

    fn verify(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<VerificationResult, PaymentError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move { canned_verification(&identifier, "mtn") })
    }

    fn webhook_verification(
        &self,
        _payload: &serde_json::Value,
    ) -> Result<VerificationResult, PaymentError> {
        Err(PaymentError::Validation(
            "mtn-mock does not deliver webhooks".to_string(),
        ))
    }
}
