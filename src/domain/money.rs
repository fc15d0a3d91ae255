use {
    super::error::PaymentError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Amount in the currency's minor unit (XAF has none, so whole francs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub fn new(units: i64) -> Result<Self, PaymentError> {
        if units <= 0 {
            return Err(PaymentError::Validation(format!(
                "amount must be positive, got: {units}"
            )));
        }
        Ok(Self(units))
    }

    pub fn units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Xaf,
    Usd,
    Eur,
    Ngn,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xaf => "XAF",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Ngn => "NGN",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Xaf
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "XAF" => Ok(Self::Xaf),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "NGN" => Ok(Self::Ngn),
            other => Err(PaymentError::Validation(format!(
                "unknown currency: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: MoneyAmount,
    currency: Currency,
}

impl Money {
    pub fn new(amount: MoneyAmount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn amount(&self) -> MoneyAmount {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}
