// src/response.rs
use serde::{Deserialize, Serialize};

pub const RESPONSE_VERSION: &str = "1.0";
pub const LOCATION_PERMISSION: &str = "read::alexa:device:all:address:country_and_postal_code";
pub const PERMISSION_MESSAGE: &str = "To get your country's currency automatically, please enable location permissions for crypto price in your alexa app";
pub const REPROMPT_MESSAGE: &str = "Please ask your crypto price question";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub card: Card,
    pub output_speech: OutputSpeech,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
    AskForPermissionsConsent { permissions: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl SkillResponse {
    /// Simple card and spoken text carrying the same message.
    pub fn build(
        title: impl Into<String>,
        message: impl Into<String>,
        should_end_session: bool,
    ) -> Self {
        let message = message.into();
        Self {
            version: RESPONSE_VERSION.to_string(),
            response: ResponseBody {
                card: Card::Simple {
                    title: title.into(),
                    content: message.clone(),
                },
                output_speech: OutputSpeech::plain_text(message),
                reprompt: None,
                should_end_session,
            },
        }
    }

    /// Swaps the card for a location consent card and appends the request to the speech.
    pub fn with_permission_request(mut self) -> Self {
        self.response.card = Card::AskForPermissionsConsent {
            permissions: vec![LOCATION_PERMISSION.to_string()],
        };
        let speech = &mut self.response.output_speech.text;
        *speech = [speech.as_str(), PERMISSION_MESSAGE].join(". ");
        self
    }

    pub fn with_reprompt(mut self) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::plain_text(REPROMPT_MESSAGE),
        });
        self
    }

    pub fn speech(&self) -> &str {
        &self.response.output_speech.text
    }
}
