// src/config.rs
use crate::error::SkillError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PRICE_API_URL: &str = "https://min-api.cryptocompare.com/data/price";
pub const DEFAULT_LOCATION_API_URL: &str = "https://api.amazonalexa.com";
pub const DEFAULT_CRYPTO: &str = "Bitcoin";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_MATCH_CUTOFF: f64 = 0.6;

#[derive(Clone, Debug)]
pub struct SkillConfig {
    pub price_api_url: String,
    pub location_api_url: String,
    pub default_crypto: String,
    pub default_country: String,
    /// Directory holding the reference tables. `None` uses the tables compiled into the binary.
    pub data_dir: Option<PathBuf>,
    pub match_cutoff: f64,
    pub timeout: Duration,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            location_api_url: DEFAULT_LOCATION_API_URL.to_string(),
            default_crypto: DEFAULT_CRYPTO.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            data_dir: None,
            match_cutoff: DEFAULT_MATCH_CUTOFF,
            timeout: Duration::from_secs(10),
        }
    }
}

impl SkillConfig {
    pub fn from_env() -> Result<Self, SkillError> {
        let defaults = Self::default();

        let match_cutoff = match env::var("MATCH_CUTOFF") {
            Ok(raw) => parse_setting::<f64>("MATCH_CUTOFF", &raw)?,
            Err(_) => defaults.match_cutoff,
        };
        let timeout = match env::var("REQUEST_TIMEOUT") {
            Ok(raw) => Duration::from_secs(parse_setting::<u64>("REQUEST_TIMEOUT", &raw)?),
            Err(_) => defaults.timeout,
        };

        let config = Self {
            price_api_url: env::var("PRICE_API_URL").unwrap_or(defaults.price_api_url),
            location_api_url: env::var("LOCATION_API_URL").unwrap_or(defaults.location_api_url),
            default_crypto: env::var("DEFAULT_CRYPTO").unwrap_or(defaults.default_crypto),
            default_country: env::var("DEFAULT_COUNTRY").unwrap_or(defaults.default_country),
            data_dir: env::var("SKILL_DATA_DIR").ok().map(PathBuf::from),
            match_cutoff,
            timeout,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SkillError> {
        if self.price_api_url.is_empty() {
            return Err(SkillError::invalid_configuration("price_api_url cannot be empty"));
        }
        if self.location_api_url.is_empty() {
            return Err(SkillError::invalid_configuration("location_api_url cannot be empty"));
        }
        if self.default_crypto.is_empty() {
            return Err(SkillError::invalid_configuration("default_crypto cannot be empty"));
        }
        if self.default_country.is_empty() {
            return Err(SkillError::invalid_configuration("default_country cannot be empty"));
        }
        if !(0.0..=1.0).contains(&self.match_cutoff) {
            return Err(SkillError::invalid_configuration(format!(
                "match_cutoff must be within [0, 1], got {}",
                self.match_cutoff
            )));
        }
        Ok(())
    }
}

/// Parses a numeric environment setting, naming the variable on failure.
fn parse_setting<T: FromStr>(name: &str, raw: &str) -> Result<T, SkillError> {
    raw.trim().parse::<T>().map_err(|_| {
        SkillError::invalid_configuration(format!("{} is not a valid number: {}", name, raw))
    })
}
