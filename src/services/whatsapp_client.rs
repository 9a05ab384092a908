use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::config::WhatsAppConfig;
use crate::models::WhatsAppMessage;

/// Outbound channel for athlete notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_text(&self, message: &WhatsAppMessage) -> Result<()>;
}

/// Client for a WAHA-compatible WhatsApp HTTP API.
///
/// Messages are posted to `{base_url}/api/sendText`; when an API key is
/// configured it is sent in the `X-Api-Key` header.
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WhatsAppClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MessageGateway for WhatsAppClient {
    async fn send_text(&self, message: &WhatsAppMessage) -> Result<()> {
        let mut request = self
            .client
            .post(format!("{}/api/sendText", self.base_url))
            .json(message);

        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach WhatsApp gateway")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("WhatsApp sendText failed: {} - {}", status, error_text);
            anyhow::bail!("WhatsApp gateway rejected message: {}", status);
        }

        debug!(chat_id = %message.chat_id, "message accepted by gateway");
        Ok(())
    }
}
