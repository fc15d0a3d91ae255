use {
    super::receipt::render_receipt_pdf,
    crate::{
        config::SmtpConfig,
        domain::{
            error::PaymentError,
            notify::{ReceiptDetails, ReceiptSender},
        },
    },
    lettre::{
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        message::{Attachment, MultiPart, SinglePart, header::ContentType},
        transport::smtp::authentication::Credentials,
    },
    std::{future::Future, pin::Pin},
};

/// Sends the receipt as a plain-text mail with the PDF attached. A failed
/// PDF render downgrades to text-only rather than dropping the mail.
pub struct SmtpReceiptSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpReceiptSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, PaymentError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| PaymentError::Config(format!("smtp relay: {e}")))?
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    async fn send_inner(
        &self,
        email: &str,
        details: &ReceiptDetails,
    ) -> Result<(), PaymentError> {
        let text = format!(
            "Thank you for your payment.\n\n\
             Reference: {}\nAmount: {} {}\nStatus: {}\n",
            details.reference, details.amount, details.currency, details.status
        );

        let builder = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| PaymentError::Notification(format!("from address: {e}")))?,
            )
            .to(email
                .parse()
                .map_err(|e| PaymentError::Notification(format!("to address: {e}")))?)
            .subject(format!("Payment receipt - {}", details.reference));

        let message = match render_receipt_pdf(details) {
            Ok(pdf) => {
                let content_type = ContentType::parse("application/pdf")
                    .map_err(|e| PaymentError::Notification(format!("content type: {e}")))?;
                let attachment = Attachment::new(format!("receipt_{}.pdf", details.reference))
                    .body(pdf, content_type);
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(text))
                        .singlepart(attachment),
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "PDF render failed, sending receipt without attachment");
                builder.singlepart(SinglePart::plain(text))
            }
        }
        .map_err(|e| PaymentError::Notification(format!("build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PaymentError::Notification(format!("smtp send: {e}")))?;
        Ok(())
    }
}

impl ReceiptSender for SmtpReceiptSender {
    fn send_receipt(
        &self,
        email: &str,
        details: &ReceiptDetails,
    ) -> Pin<Box<dyn Future<Output = Result<(), PaymentError>> + Send + '_>> {
        let email = email.to_string();
        let details = details.clone();
        Box::pin(async move { self.send_inner(&email, &details).await })
    }
}

/// Stands in when no SMTP credentials are configured. Mail is a disabled
/// feature in that case, not an error.
pub struct DisabledReceiptSender;

impl ReceiptSender for DisabledReceiptSender {
    fn send_receipt(
        &self,
        email: &str,
        details: &ReceiptDetails,
    ) -> Pin<Box<dyn Future<Output = Result<(), PaymentError>> + Send + '_>> {
        tracing::debug!(
            email,
            reference = %details.reference,
            "mail disabled, skipping receipt"
        );
        Box::pin(async { Ok(()) })
    }
}
