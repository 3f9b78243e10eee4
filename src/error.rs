// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream service returned {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        SkillError::InvalidConfiguration(message.into())
    }
}
