use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error("gateway ({status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("auth: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("notification: {0}")]
    Notification(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    pub fn gateway(status: u16, message: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            message: message.into(),
        }
    }
}

// Network failures and timeouts surface as gateway errors: the provider
// was unreachable, which is neither the caller's fault nor ours.
impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
        let message = if err.is_timeout() {
            "gateway timed out".to_string()
        } else {
            err.to_string()
        };
        Self::Gateway { status, message }
    }
}
