// src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const PRICE_INTENT: &str = "GetCryptoPriceIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CRYPTO_SLOT: &str = "cryptocurrency";
pub const CURRENCY_SLOT: &str = "Currency";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub request: RequestBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    LaunchRequest(RequestMeta),
    IntentRequest(IntentRequest),
    SessionEndedRequest(RequestMeta),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Spoken value of a slot; absent and empty values are both `None`.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|s| s.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub consent_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: Option<String>,
}

impl SkillRequest {
    /// Price question as the voice platform would send it, without any device context.
    pub fn price_question(crypto: Option<&str>, currency: Option<&str>) -> Self {
        let mut slots = HashMap::new();
        for (slot, value) in [(CRYPTO_SLOT, crypto), (CURRENCY_SLOT, currency)] {
            slots.insert(
                slot.to_string(),
                Slot {
                    name: Some(slot.to_string()),
                    value: value.map(str::to_string),
                },
            );
        }
        Self {
            version: Some("1.0".to_string()),
            session: None,
            request: RequestBody::IntentRequest(IntentRequest {
                request_id: None,
                locale: None,
                timestamp: None,
                intent: Intent {
                    name: PRICE_INTENT.to_string(),
                    slots,
                },
            }),
            context: None,
        }
    }

    pub fn request_type(&self) -> &'static str {
        match &self.request {
            RequestBody::LaunchRequest(_) => "LaunchRequest",
            RequestBody::IntentRequest(_) => "IntentRequest",
            RequestBody::SessionEndedRequest(_) => "SessionEndedRequest",
            RequestBody::Other => "Other",
        }
    }

    fn system(&self) -> Option<&SystemContext> {
        self.context.as_ref().map(|c| &c.system)
    }

    /// Token granted when the user allowed the skill to read their country.
    pub fn consent_token(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.permissions.as_ref())
            .and_then(|p| p.consent_token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn has_location_permission(&self) -> bool {
        self.consent_token().is_some()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.device.as_ref())
            .and_then(|d| d.device_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn api_endpoint(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.api_endpoint.as_deref())
            .filter(|e| !e.is_empty())
    }
}
