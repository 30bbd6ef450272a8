use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{DevelopmentWork, TaxQrCodes, default_development_works, default_tax_qr_codes};

/// Source of the development-works feed and the tax QR metadata.
pub struct ContentService {
    client: Client,
    upstream: Option<String>,
}

impl ContentService {
    pub fn new(upstream: Option<String>) -> Self {
        ContentService {
            client: Client::new(),
            upstream: upstream.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    pub fn from_config() -> Self {
        let upstream = Config::upstream_api_url();
        match &upstream {
            Some(url) => info!("Content served from upstream {}", url),
            None => info!("Content served from built-in defaults"),
        }
        Self::new(upstream)
    }

    pub async fn development_works(&self) -> Result<Vec<DevelopmentWork>, String> {
        match &self.upstream {
            Some(base) => self.fetch(base, "/devworks").await,
            None => Ok(default_development_works()),
        }
    }

    pub async fn tax_qr_codes(&self) -> Result<TaxQrCodes, String> {
        match &self.upstream {
            Some(base) => self.fetch(base, "/qr").await,
            None => Ok(default_tax_qr_codes()),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, base: &str, path: &str) -> Result<T, String> {
        let url = format!("{}{}", base, path);

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Upstream request failed: {}", e))?;

        if !res.status().is_success() {
            warn!("Upstream {} answered {}", url, res.status());
            return Err(format!("Upstream answered {}", res.status()));
        }

        res.json::<T>()
            .await
            .map_err(|e| format!("Upstream returned unexpected data: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_are_used_without_upstream() {
        let content = ContentService::new(None);
        assert_eq!(content.development_works().await.unwrap().len(), 3);
        assert!(content.tax_qr_codes().await.unwrap().water_tax.is_some());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        let content = ContentService::new(Some("http://127.0.0.1:9/".to_string()));
        assert!(content.development_works().await.is_err());
        assert!(content.tax_qr_codes().await.is_err());
    }
}
