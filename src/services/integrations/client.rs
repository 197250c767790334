//! 出站同步客户端

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::IntegrationConfig;
use crate::errors::{ClassQuestError, Result};
use crate::models::integrations::responses::SyncPushBody;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct SyncClient {
    client: Client,
    url: String,
    token: String,
}

impl SyncClient {
    /// 未配置地址或 token 时返回 None
    pub fn from_config(config: &IntegrationConfig) -> Result<Option<Self>> {
        if config.sync_url.is_empty() || config.sync_api_token.is_empty() {
            return Ok(None);
        }
        let timeout = match config.sync_timeout {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Some(Self {
            client,
            url: config.sync_url.clone(),
            token: config.sync_api_token.clone(),
        }))
    }

    pub async fn push(&self, body: &SyncPushBody) -> Result<()> {
        info!(url = %self.url, records = body.records.len(), "Pushing grade sync");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClassQuestError::external_service(format!(
                "sync endpoint returned {status}: {}",
                truncate(&text, 200)
            )));
        }
        debug!(sync_id = %body.sync_id, "Sync accepted");
        Ok(())
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_client_is_none() {
        let config = IntegrationConfig::default();
        assert!(SyncClient::from_config(&config).unwrap().is_none());

        let config = IntegrationConfig {
            sync_url: "https://sis.example.com/grades".to_string(),
            ..Default::default()
        };
        assert!(SyncClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_configured_client() {
        let config = IntegrationConfig {
            sync_url: "https://sis.example.com/grades".to_string(),
            sync_api_token: "token".to_string(),
            ..Default::default()
        };
        assert!(SyncClient::from_config(&config).unwrap().is_some());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
