use async_trait::async_trait;
use reqwest::Client;

use crate::config::PncpApiConfig;
use crate::domain::PurchaseKey;
use crate::errors::{PncpError, PncpResult};

/// Source of the expected item count for a purchase
#[async_trait]
pub trait ItemCountSource: Send + Sync {
    async fn fetch_item_count(&self, key: &PurchaseKey) -> PncpResult<u32>;
}

/// Reads `/orgaos/{cnpj}/compras/{ano}/{sequencial}/itens/quantidade` from the PNCP API
pub struct PncpApiClient {
    client: Client,
    base_url: String,
}

impl PncpApiClient {
    pub fn new(config: &PncpApiConfig) -> PncpResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PncpError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn quantity_url(&self, key: &PurchaseKey) -> String {
        format!(
            "{}/orgaos/{}/compras/{}/{}/itens/quantidade",
            self.base_url, key.cnpj, key.ano, key.sequencial
        )
    }
}

pub fn parse_item_count(body: &str) -> PncpResult<u32> {
    let trimmed = body.trim();
    trimmed.parse::<u32>().map_err(|_| {
        PncpError::UpstreamUnavailable(format!("resposta inválida da API: '{}'", trimmed))
    })
}

#[async_trait]
impl ItemCountSource for PncpApiClient {
    async fn fetch_item_count(&self, key: &PurchaseKey) -> PncpResult<u32> {
        let url = self.quantity_url(key);
        tracing::debug!("Fetching item count from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::warn!("PNCP API request for {} failed: {}", key, e);
                PncpError::UpstreamUnavailable(e.to_string())
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| PncpError::UpstreamUnavailable(e.to_string()))?;

        let count = parse_item_count(&body)?;
        tracing::info!("PNCP reports {} items for purchase {}", count, key);
        Ok(count)
    }
}
