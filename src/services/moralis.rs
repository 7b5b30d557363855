use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::FetchError, models::Token};

/// Anything that can quote a token in USD.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn usd_price(&self, token: &Token) -> Result<f64, FetchError>;
}

#[derive(Clone)]
pub struct MoralisClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl MoralisClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn token_price(&self, token: &Token) -> Result<TokenPriceResponse, FetchError> {
        if !self.has_key() {
            return Err(FetchError::MissingKey);
        }

        let url = format!(
            "{}/erc20/{}/price",
            self.base_url.trim_end_matches('/'),
            token.address
        );
        let res = self
            .http
            .get(&url)
            .query(&[("chain", token.chain)])
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        Ok(res.json::<TokenPriceResponse>().await?)
    }
}

#[async_trait]
impl PriceSource for MoralisClient {
    async fn usd_price(&self, token: &Token) -> Result<f64, FetchError> {
        let resp = self.token_price(token).await?;
        resp.usd(token.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenPriceResponse {
    // kept untyped: a string or null here is a bad quote, not a decode failure
    #[serde(rename = "usdPrice", default)]
    pub usd_price: Option<serde_json::Value>,
}

impl TokenPriceResponse {
    pub fn usd(&self, token_name: &str) -> Result<f64, FetchError> {
        self.usd_price
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|p| p.is_finite())
            .ok_or_else(|| FetchError::InvalidPrice(token_name.to_string()))
    }
}
