use anyhow::{ensure, Result};
use std::env;
use std::time::Duration;

/// Settings for the outbound WhatsApp HTTP gateway.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Gateway session the messages are sent from.
    pub session: String,
    /// Prefix added to every athlete phone number.
    pub country_code: String,
    pub request_timeout: Duration,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            api_key: None,
            session: "default".to_string(),
            country_code: "55".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl WhatsAppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = env::var("WHATSAPP_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let api_key = env::var("WHATSAPP_API_KEY").ok().filter(|key| !key.is_empty());
        let session = env::var("WHATSAPP_SESSION").unwrap_or(defaults.session);
        let country_code = env::var("WHATSAPP_COUNTRY_CODE").unwrap_or(defaults.country_code);

        ensure!(
            !country_code.is_empty() && country_code.chars().all(|c| c.is_ascii_digit()),
            "WHATSAPP_COUNTRY_CODE must contain only digits"
        );

        Ok(Self {
            base_url,
            api_key,
            session,
            country_code,
            request_timeout: defaults.request_timeout,
        })
    }
}
