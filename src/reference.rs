// src/reference.rs
use crate::config::SkillConfig;
use crate::error::SkillError;
use crate::resolver::LookupTable;
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const COINS_FILE: &str = "cryptocurrencies.json";
pub const CURRENCIES_FILE: &str = "currencies.json";
pub const COUNTRIES_FILE: &str = "country_to_currency.json";

const BUNDLED_COINS: &str = include_str!("../data/cryptocurrencies.json");
const BUNDLED_CURRENCIES: &str = include_str!("../data/currencies.json");
const BUNDLED_COUNTRIES: &str = include_str!("../data/country_to_currency.json");

/// Coin, currency and country tables the skill resolves spoken input against.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub coins: LookupTable,
    pub currencies: LookupTable,
    /// ISO country code -> currency name (a key of `currencies`).
    pub country_currencies: HashMap<String, String>,
}

impl ReferenceData {
    /// Tables compiled into the binary.
    pub fn bundled() -> Result<Self, SkillError> {
        Self::from_json(BUNDLED_COINS, BUNDLED_CURRENCIES, BUNDLED_COUNTRIES)
    }

    pub fn load(dir: &Path) -> Result<Self, SkillError> {
        info!("Loading reference tables from {}", dir.display());
        let coins = fs::read_to_string(dir.join(COINS_FILE))?;
        let currencies = fs::read_to_string(dir.join(CURRENCIES_FILE))?;
        let countries = fs::read_to_string(dir.join(COUNTRIES_FILE))?;
        Self::from_json(&coins, &currencies, &countries)
    }

    /// Loads from `config.data_dir` when set, otherwise the bundled tables.
    pub fn for_config(config: &SkillConfig) -> Result<Self, SkillError> {
        match &config.data_dir {
            Some(dir) => Self::load(dir),
            None => Self::bundled(),
        }
    }

    pub fn from_json(coins: &str, currencies: &str, countries: &str) -> Result<Self, SkillError> {
        Ok(Self {
            coins: serde_json::from_str(coins)?,
            currencies: serde_json::from_str(currencies)?,
            country_currencies: serde_json::from_str(countries)?,
        })
    }

    pub fn currency_for_country(&self, country_code: &str) -> Option<&str> {
        self.country_currencies.get(country_code).map(String::as_str)
    }

    /// Currency name used when neither the user nor their location names one.
    pub fn default_currency(&self, default_country: &str) -> Result<&str, SkillError> {
        let currency = self.currency_for_country(default_country).ok_or_else(|| {
            SkillError::invalid_configuration(format!(
                "default country '{}' has no currency mapping",
                default_country
            ))
        })?;
        if !self.currencies.contains_name(currency) {
            return Err(SkillError::invalid_configuration(format!(
                "default currency '{}' is not a known currency",
                currency
            )));
        }
        Ok(currency)
    }

    pub fn validate(&self, config: &SkillConfig) -> Result<(), SkillError> {
        for (label, table) in [("coin", &self.coins), ("currency", &self.currencies)] {
            if table.is_empty() {
                return Err(SkillError::invalid_configuration(format!("{} table is empty", label)));
            }
            let duplicates = table.duplicate_symbols();
            if !duplicates.is_empty() {
                return Err(SkillError::invalid_configuration(format!(
                    "{} table repeats symbols: {}",
                    label,
                    duplicates.join(", ")
                )));
            }
        }

        if !self.coins.contains_name(&config.default_crypto) {
            return Err(SkillError::invalid_configuration(format!(
                "default coin '{}' is not in the coin table",
                config.default_crypto
            )));
        }

        self.default_currency(&config.default_country)?;

        let mut unknown: Vec<&str> = self
            .country_currencies
            .iter()
            .filter(|(_, currency)| !self.currencies.contains_name(currency))
            .map(|(country, _)| country.as_str())
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(SkillError::invalid_configuration(format!(
                "countries mapped to unknown currencies: {}",
                unknown.join(", ")
            )));
        }

        Ok(())
    }
}
