// src/handler.rs
use crate::client::{LocationSource, PriceQuote, QuoteSource};
use crate::config::SkillConfig;
use crate::error::SkillError;
use crate::reference::ReferenceData;
use crate::resolver::resolve_with_cutoff;
use crate::response::SkillResponse;
use crate::types::{
    Intent, RequestBody, SkillRequest, CRYPTO_SLOT, CURRENCY_SLOT, HELP_INTENT, PRICE_INTENT,
};
use log::{debug, info, warn};
use std::sync::Arc;

const LAUNCH_TITLE: &str = "Crypto Price Trends";
const LAUNCH_MESSAGE: &str = "Please ask a question like: What is the price of bitcoin";
const HELP_TITLE: &str = "Crypto Price Help";
const HELP_MESSAGE: &str = "Crypto Price returns the price of the leading cryptocurrencies. \
You can ask questions like: What is the price of bitcoin, tell me the current price of monero \
in US dollars, and, what is the price of litecoin in pounds. Please ask a question.";
const GOODBYE_TITLE: &str = "Crypto Price Cancel";
const GOODBYE_MESSAGE: &str = "Thanks for using crypto price. See you at the moon.";

/// Outcome of a price question: resolved names and the quoted price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub coin: String,
    pub coin_symbol: String,
    pub currency: String,
    pub currency_symbol: String,
    pub price: PriceQuote,
}

impl PriceReport {
    pub fn title(&self) -> String {
        format!("{} Price in {}", self.coin, self.currency)
    }

    pub fn message(&self) -> String {
        format!("{} is currently worth {} {}", self.coin, self.price, self.currency)
    }
}

pub struct SkillHandler {
    config: SkillConfig,
    reference: ReferenceData,
    default_currency: String,
    quotes: Arc<dyn QuoteSource>,
    locations: Arc<dyn LocationSource>,
}

impl SkillHandler {
    pub fn new(
        config: SkillConfig,
        reference: ReferenceData,
        quotes: Arc<dyn QuoteSource>,
        locations: Arc<dyn LocationSource>,
    ) -> Result<Self, SkillError> {
        config.validate()?;
        reference.validate(&config)?;
        let default_currency = reference.default_currency(&config.default_country)?.to_string();

        info!(
            "Skill handler ready: {} coins, {} currencies, defaults {} / {}",
            reference.coins.len(),
            reference.currencies.len(),
            config.default_crypto,
            default_currency
        );

        Ok(Self {
            config,
            reference,
            default_currency,
            quotes,
            locations,
        })
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub async fn handle(&self, request: &SkillRequest) -> Result<SkillResponse, SkillError> {
        info!("Handling {}", request.request_type());
        let location_permission = request.has_location_permission();

        let response = match &request.request {
            RequestBody::LaunchRequest(_) => {
                SkillResponse::build(LAUNCH_TITLE, LAUNCH_MESSAGE, false).with_reprompt()
            }
            RequestBody::IntentRequest(intent_request) => {
                let intent = &intent_request.intent;
                debug!("Intent {}", intent.name);
                match intent.name.as_str() {
                    PRICE_INTENT => {
                        let report = self.collect_crypto_price(request, intent).await?;
                        SkillResponse::build(report.title(), report.message(), true)
                    }
                    HELP_INTENT => {
                        SkillResponse::build(HELP_TITLE, HELP_MESSAGE, false).with_reprompt()
                    }
                    _ => return Ok(goodbye()),
                }
            }
            RequestBody::SessionEndedRequest(_) | RequestBody::Other => return Ok(goodbye()),
        };

        if location_permission {
            Ok(response)
        } else {
            Ok(response.with_permission_request())
        }
    }

    /// Resolves the spoken coin and currency and quotes the price.
    pub async fn collect_crypto_price(
        &self,
        request: &SkillRequest,
        intent: &Intent,
    ) -> Result<PriceReport, SkillError> {
        let crypto = intent
            .slot_value(CRYPTO_SLOT)
            .unwrap_or(&self.config.default_crypto);
        let currency = match intent.slot_value(CURRENCY_SLOT) {
            Some(spoken) => spoken.to_string(),
            None => self.currency_from_location(request).await,
        };

        let coin = resolve_with_cutoff(
            crypto,
            &self.reference.coins,
            &self.config.default_crypto,
            self.config.match_cutoff,
        )?;
        let target = resolve_with_cutoff(
            &currency,
            &self.reference.currencies,
            &self.default_currency,
            self.config.match_cutoff,
        )?;
        debug!(
            "Resolved '{}' -> {} ({}), '{}' -> {} ({})",
            crypto, coin.name, coin.kind, currency, target.name, target.kind
        );

        let price = match self.quotes.fetch_price(coin.symbol, target.symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!("Price lookup for {}/{} failed: {}", coin.symbol, target.symbol, e);
                PriceQuote::Unavailable
            }
        };

        Ok(PriceReport {
            coin: coin.name.to_string(),
            coin_symbol: coin.symbol.to_string(),
            currency: target.name.to_string(),
            currency_symbol: target.symbol.to_string(),
            price,
        })
    }

    /// Currency of the device's country, or the default currency when the
    /// location is not available.
    async fn currency_from_location(&self, request: &SkillRequest) -> String {
        let (Some(token), Some(device_id)) = (request.consent_token(), request.device_id()) else {
            return self.default_currency.clone();
        };
        let endpoint = request
            .api_endpoint()
            .unwrap_or(&self.config.location_api_url);

        let country = match self
            .locations
            .fetch_country_code(endpoint, device_id, token)
            .await
        {
            Ok(Some(code)) => code,
            Ok(None) => {
                warn!(
                    "Location service returned no country, using {}",
                    self.config.default_country
                );
                self.config.default_country.clone()
            }
            Err(e) => {
                warn!("Location lookup failed: {}, using {}", e, self.config.default_country);
                self.config.default_country.clone()
            }
        };

        match self.reference.currency_for_country(&country) {
            Some(currency) => currency.to_string(),
            None => {
                warn!("No currency mapped for country {}", country);
                self.default_currency.clone()
            }
        }
    }
}

fn goodbye() -> SkillResponse {
    SkillResponse::build(GOODBYE_TITLE, GOODBYE_MESSAGE, true)
}
