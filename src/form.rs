//! The client side of the newsletter form.
//!
//! `SubscriptionForm` is the state a front end renders: the email input, whether a
//! submission is in flight and the feedback to show. `RelayClient` is the one HTTP call
//! the form makes. A submission moves the form from `Idle` through loading to either
//! `Success` or `Error`; nothing is retried.

use reqwest::Client;
use serde_json::json;
use validator::ValidateEmail;

use crate::web::types::SubscribeResponse;

pub const SUBSCRIBED_MESSAGE: &str =
    "Thank you for subscribing! Please check your email to confirm your subscription.";
pub const FAILED_MESSAGE: &str = "Failed to subscribe";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct SubscriptionForm {
    email: String,
    status: FormStatus,
    message: String,
    is_loading: bool,
}

impl SubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    // -> getters
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The input is disabled while a submission is in flight.
    pub fn set_email(&mut self, email: impl Into<String>) {
        if !self.is_loading {
            self.email = email.into();
        }
    }

    /// Starts a submission and returns the email to send.
    /// Refuses (leaving the state untouched) while loading, or when the email would fail
    /// a `required` `type=email` input.
    pub fn begin_submit(&mut self) -> Result<String, FormError> {
        if self.is_loading {
            return Err(FormError::Busy);
        }
        if self.email.is_empty() {
            return Err(FormError::EmailRequired);
        }
        if !self.email.validate_email() {
            return Err(FormError::EmailInvalid);
        }

        self.is_loading = true;
        self.status = FormStatus::Idle;
        self.message.clear();

        Ok(self.email.clone())
    }

    /// Records the outcome of the submission started by `begin_submit`.
    pub fn finish_submit(&mut self, outcome: Result<SubscribeResponse, RelayError>) {
        match outcome {
            Ok(_) => {
                self.status = FormStatus::Success;
                self.message = SUBSCRIBED_MESSAGE.to_string();
                self.email.clear();
            }
            Err(er) => {
                self.status = FormStatus::Error;
                self.message = er.user_message();
            }
        }
        self.is_loading = false;
    }

    pub async fn submit(&mut self, client: &RelayClient) -> Result<FormStatus, FormError> {
        let email = self.begin_submit()?;
        let outcome = client.subscribe(&email).await;
        self.finish_submit(outcome);

        Ok(self.status)
    }
}

/// Posts `{ email }` to the relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http_client: Client,
    endpoint: reqwest::Url,
}

impl RelayClient {
    pub fn new<S: AsRef<str>>(endpoint: S) -> Result<Self, FormError> {
        let endpoint = reqwest::Url::parse(endpoint.as_ref())
            .map_err(|er| FormError::UrlParsing(er.to_string()))?;
        let http_client = Client::builder().build()?;

        Ok(RelayClient {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// The body is read before the status is checked, a non-JSON answer is an error either way.
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeResponse, RelayError> {
        let resp = self
            .http_client
            .post(self.endpoint.clone())
            .json(&json!({ "email": email }))
            .send()
            .await?;
        let status = resp.status();
        let data: SubscribeResponse = resp.json().await?;

        if !status.is_success() {
            let message = data
                .error
                .filter(|er| !er.is_empty())
                .unwrap_or_else(|| FAILED_MESSAGE.to_string());
            return Err(RelayError::Rejected(message));
        }

        Ok(data)
    }
}

// ###################################
// ->   ERROR
// ###################################
/// Reasons a submission never left the form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("email is required")]
    EmailRequired,
    #[error("email is not a valid address")]
    EmailInvalid,

    #[error("invalid relay endpoint: {0}")]
    UrlParsing(String),
    #[error("http client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Reasons a submission that was sent did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Reqwest(reqwest::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(value: reqwest::Error) -> Self {
        RelayError::Reqwest(value.without_url())
    }
}

impl RelayError {
    /// The text shown under the form.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNEXPECTED_MESSAGE.to_string()
        } else {
            message
        }
    }
}
