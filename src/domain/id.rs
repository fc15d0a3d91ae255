use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::PaymentError;

/// Caller-generated correlation key between a local transaction row and the
/// remote gateway session (`TX_<unix-millis>_<hex>`). Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(raw: impl Into<String>) -> Result<Self, PaymentError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PaymentError::Validation(
                "reference must not be empty".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    /// Timestamp plus random suffix. Collisions are astronomically unlikely;
    /// the store's unique constraint is the real backstop.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("TX_{millis}_{}", &suffix[..6]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
