use {
    super::error::PaymentError,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Initialized,
    Pending,
    Successful,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses are never overwritten — first terminal wins.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed | Self::Cancelled)
    }

    /// Transition guard for reconciliation: a stored status accepts an
    /// incoming one only while it is not yet terminal, and nothing ever
    /// regresses back to `initialized`.
    pub fn accepts(&self, incoming: &TransactionStatus) -> bool {
        !self.is_terminal() && *incoming != Self::Initialized
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "initialized" => Ok(Self::Initialized),
            "pending" => Ok(Self::Pending),
            "successful" => Ok(Self::Successful),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(PaymentError::Validation(format!(
                "unknown transaction status: {other}"
            ))),
        }
    }
}

/// Collapse a provider's free-text status into the canonical set. Providers
/// disagree on spelling ("successful" / "success" / "paid"), so every call
/// site goes through this one table. Anything unrecognized is treated as
/// still in flight rather than failed.
pub fn normalize_status(provider_status: &str) -> TransactionStatus {
    match provider_status.trim().to_ascii_lowercase().as_str() {
        "successful" | "success" | "paid" | "completed" | "approved" => {
            TransactionStatus::Successful
        }
        "failed" | "failure" | "declined" | "error" => TransactionStatus::Failed,
        "cancelled" | "canceled" | "aborted" | "voided" => TransactionStatus::Cancelled,
        "pending" | "processing" | "initiated" | "in_progress" | "" => TransactionStatus::Pending,
        other => {
            tracing::warn!(status = other, "unknown provider status, treating as pending");
            TransactionStatus::Pending
        }
    }
}

/// Which gateway adapter created a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentSource {
    Lygos,
    Flutterwave,
    CardMock,
    MtnMock,
}

impl PaymentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lygos => "lygos",
            Self::Flutterwave => "flutterwave",
            Self::CardMock => "card-mock",
            Self::MtnMock => "mtn-mock",
        }
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentSource {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        // Route segments use the short form ("card", "mtn").
        match s {
            "lygos" => Ok(Self::Lygos),
            "flutterwave" => Ok(Self::Flutterwave),
            "card" | "card-mock" => Ok(Self::CardMock),
            "mtn" | "mtn-mock" => Ok(Self::MtnMock),
            other => Err(PaymentError::Validation(format!(
                "unknown payment provider: {other}"
            ))),
        }
    }
}

/// Full transaction row from the store (for reads).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub reference: String,
    pub gateway_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: String,
    pub source: String,
    pub raw_payload: Option<sqlx::types::Json<serde_json::Value>>,
    #[serde(skip_serializing)]
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn status(&self) -> Result<TransactionStatus, PaymentError> {
        TransactionStatus::try_from(self.status.as_str())
    }
}
