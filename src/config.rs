use std::{env, time::Duration};

/// SMTP relay credentials. When absent, receipt mail is a disabled feature,
/// not an error.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Externally-visible base URL used to build redirect links back to us.
    pub front_url: String,
    pub lygos_api_key: Option<String>,
    pub lygos_base_url: String,
    pub flw_secret_key: Option<String>,
    pub flw_base_url: String,
    /// Shared secret for webhook signature checks. Webhooks are rejected
    /// outright when this is unset.
    pub webhook_secret: Option<String>,
    /// Admin routes are open when unset (local/dev deployments).
    pub admin_token: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub gateway_timeout: Duration,
}

fn opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let smtp = match (opt("SMTP_HOST"), opt("SMTP_USER"), opt("SMTP_PASS")) {
            (Some(host), Some(user), Some(pass)) => {
                let from = opt("SMTP_FROM").unwrap_or_else(|| user.clone());
                Some(SmtpConfig {
                    host,
                    user,
                    pass,
                    from,
                })
            }
            _ => None,
        };

        let timeout_secs = opt("GATEWAY_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(15u64);

        Self {
            database_url: opt("DATABASE_URL").unwrap_or_else(|| "sqlite://paysync.db".to_string()),
            bind_addr: opt("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            front_url: opt("FRONT_URL").unwrap_or_else(|| "http://localhost:5173".to_string()),
            lygos_api_key: opt("LYGOS_API_KEY"),
            lygos_base_url: opt("LYGOS_BASE_URL")
                .unwrap_or_else(|| "https://api.lygosapp.com/v1".to_string()),
            flw_secret_key: opt("FLW_SECRET_KEY"),
            flw_base_url: opt("FLW_BASE_URL")
                .unwrap_or_else(|| "https://api.flutterwave.com/v3".to_string()),
            webhook_secret: opt("WEBHOOK_SECRET").or_else(|| opt("FLW_WEBHOOK_SECRET")),
            admin_token: opt("ADMIN_TOKEN"),
            smtp,
            gateway_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
