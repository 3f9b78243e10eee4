// src/client.rs
use crate::config::SkillConfig;
use crate::error::SkillError;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use std::fmt;

/// Price of one coin in a target currency as reported by the quote service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceQuote {
    Price(f64),
    Unavailable,
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceQuote::Price(value) => write!(f, "{}", value),
            PriceQuote::Unavailable => f.write_str("Unavailable"),
        }
    }
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_price(
        &self,
        from_symbol: &str,
        to_symbol: &str,
    ) -> Result<PriceQuote, SkillError>;
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Country code of the device, `None` when the service does not report one.
    async fn fetch_country_code(
        &self,
        api_endpoint: &str,
        device_id: &str,
        consent_token: &str,
    ) -> Result<Option<String>, SkillError>;
}

pub struct CryptoCompareClient {
    endpoint: String,
    client: Client,
}

impl CryptoCompareClient {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn from_config(config: &SkillConfig, client: Client) -> Self {
        Self::new(config.price_api_url.clone(), client)
    }
}

#[async_trait]
impl QuoteSource for CryptoCompareClient {
    async fn fetch_price(
        &self,
        from_symbol: &str,
        to_symbol: &str,
    ) -> Result<PriceQuote, SkillError> {
        info!("Fetching {} price in {}", from_symbol, to_symbol);

        let res = self
            .client
            .get(&self.endpoint)
            .query(&[("fsym", from_symbol), ("tsyms", to_symbol)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SkillError::Upstream {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = res.json::<Value>().await?;
        debug!("Quote response: {}", body);
        Ok(quote_from_body(&body, to_symbol))
    }
}

fn quote_from_body(body: &Value, to_symbol: &str) -> PriceQuote {
    body.get(to_symbol)
        .and_then(Value::as_f64)
        .map(PriceQuote::Price)
        .unwrap_or(PriceQuote::Unavailable)
}

pub struct AlexaLocationClient {
    client: Client,
}

impl AlexaLocationClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn country_lookup_url(api_endpoint: &str, device_id: &str) -> String {
    format!(
        "{}/v1/devices/{}/settings/address/countryAndPostalCode",
        api_endpoint.trim_end_matches('/'),
        urlencoding::encode(device_id)
    )
}

#[async_trait]
impl LocationSource for AlexaLocationClient {
    async fn fetch_country_code(
        &self,
        api_endpoint: &str,
        device_id: &str,
        consent_token: &str,
    ) -> Result<Option<String>, SkillError> {
        let url = country_lookup_url(api_endpoint, device_id);

        let res = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", consent_token))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SkillError::Upstream {
                status: status.as_u16(),
                url,
            });
        }

        let body = res.json::<Value>().await?;
        Ok(body
            .get("countryCode")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
