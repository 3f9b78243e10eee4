// src/lib.rs
pub mod config;
pub mod error;
pub mod types;
pub mod response;
pub mod resolver;
pub mod reference;
pub mod client;
pub mod handler;
pub mod server;

pub use client::{AlexaLocationClient, CryptoCompareClient, LocationSource, PriceQuote, QuoteSource};
pub use config::SkillConfig;
pub use error::SkillError;
pub use handler::{PriceReport, SkillHandler};
pub use reference::ReferenceData;
pub use resolver::{resolve, resolve_with_cutoff, LookupTable, MatchKind, Resolution};
pub use response::SkillResponse;
pub use server::{configure, cors_handler, handle_skill_request, health_check, AppState};
pub use types::SkillRequest;
