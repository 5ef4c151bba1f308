//! The request and response bodies of the `web` module and their parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// ###################################
// ->   STRUCTS
// ###################################
/// The email a visitor submitted, kept as the JSON value it arrived as.
/// Only presence is checked here, what counts as an email is up to the upstream list API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(Value);

impl SubscriberEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        Self::from_value(Value::String(value.as_ref().to_owned()))
    }

    /// Accepts any JSON value that is truthy the way the browser sees it:
    /// `null`, `false`, `0` and `""` are missing, everything else is forwarded untouched.
    pub fn from_value(value: Value) -> Result<Self, DataParsingError> {
        let is_falsy = match &value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        };
        if is_falsy {
            return Err(DataParsingError::EmailMissing);
        }

        Ok(SubscriberEmail(value))
    }

    /// Parses a raw subscribe request body.
    ///
    /// An empty body counts as `{}`. Anything that is not JSON is rejected as malformed,
    /// JSON without a truthy `email` (including non-object JSON) as missing the email.
    pub fn from_body(body: &[u8]) -> Result<Self, DataParsingError> {
        let mut json: Value = if body.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body).map_err(DataParsingError::InvalidJson)?
        };

        match json.get_mut("email").map(Value::take) {
            Some(email) => Self::from_value(email),
            None => Err(DataParsingError::EmailMissing),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(email) => f.write_str(email),
            other => write!(f, "{other}"),
        }
    }
}

/// The JSON body of every relay response.
/// Fields that are `None` are left out, so validation errors only carry `error`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl SubscribeResponse {
    pub const SUBSCRIBED: &'static str = "Successfully subscribed to newsletter";

    pub fn subscribed() -> Self {
        SubscribeResponse {
            success: Some(true),
            message: Some(Self::SUBSCRIBED.to_string()),
            error: None,
        }
    }

    /// A rejected request, no `success` field.
    pub fn rejected(error: impl Into<String>) -> Self {
        SubscribeResponse {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// A request that was accepted but could not be completed.
    pub fn failed(error: impl Into<String>) -> Self {
        SubscribeResponse {
            success: Some(false),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("request body is not valid json: {0}")]
    InvalidJson(serde_json::Error),
    #[error("email missing")]
    EmailMissing,
}
