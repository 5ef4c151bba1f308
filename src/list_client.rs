use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::{ListApi, ListConfig},
    web::types::SubscriberEmail,
};

const JSON_API_MIME: &str = "application/vnd.api+json";

/// A client for the upstream list-management API.
/// Holds the list identifier and the secret key, so handlers only ever pass an email.
#[derive(Debug)]
pub struct ListClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    pub list_id: String,
    pub api: ListApi,
    api_key: SecretString,
}

impl ListClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        list_id: String,
        api_key: SecretString,
        api: ListApi,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(ListClient {
            http_client,
            url,
            list_id,
            api,
            api_key,
        })
    }

    pub fn from_config(config: &ListConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.list_id.clone(),
            config.api_key.clone(),
            config.api.clone(),
            config.timeout(),
        )
    }

    /// Adds `email` to the configured list with a single POST.
    /// The upstream body is only read when the call fails, and only to hand it back for logging.
    pub async fn subscribe(&self, email: &SubscriberEmail) -> Result<()> {
        let request = match &self.api {
            ListApi::V2 => {
                let url = self.endpoint(&["api", "v2", "list", &self.list_id, "subscribe"])?;
                let body = V2Subscribe {
                    api_key: self.api_key.expose_secret(),
                    profiles: [V2Profile {
                        email: email.as_value(),
                    }],
                };

                self.http_client
                    .post(url)
                    .header(header::ACCEPT, "application/json")
                    .json(&body)
            }
            ListApi::Revisioned { revision } => {
                // Trailing empty segment keeps the slash the upstream path ends with.
                let url = self.endpoint(&["api", "profile-subscription-bulk-create-jobs", ""])?;
                let body = revisioned_body(&self.list_id, email.as_value());

                self.http_client
                    .post(url)
                    .header(
                        header::AUTHORIZATION,
                        format!("Klaviyo-API-Key {}", self.api_key.expose_secret()),
                    )
                    .header("revision", revision)
                    .header(header::ACCEPT, JSON_API_MIME)
                    .header(header::CONTENT_TYPE, JSON_API_MIME)
                    .body(body.to_string())
            }
        };

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Rejected { status, body });
        }

        Ok(())
    }

    /// Appends percent-encoded `segments` to the base url, keeping any path prefix it has.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::UrlParsing(format!("{} cannot be a base url", self.url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

#[derive(Serialize)]
pub struct V2Subscribe<'a> {
    pub api_key: &'a str,
    pub profiles: [V2Profile<'a>; 1],
}

#[derive(Serialize)]
pub struct V2Profile<'a> {
    pub email: &'a serde_json::Value,
}

fn revisioned_body(list_id: &str, email: &serde_json::Value) -> serde_json::Value {
    json!({
        "data": {
            "type": "profile-subscription-bulk-create-job",
            "attributes": {
                "profiles": {
                    "data": [{
                        "type": "profile",
                        "attributes": {
                            "email": email,
                            "subscriptions": {
                                "email": { "marketing": { "consent": "SUBSCRIBED" } }
                            }
                        }
                    }]
                }
            },
            "relationships": {
                "list": { "data": { "type": "list", "id": list_id } }
            }
        }
    })
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("list api responded with {status}")]
    Rejected { status: StatusCode, body: String },
    #[error("{0}")]
    Reqwest(reqwest::Error),
}

// The upstream url carries the list id, keep it out of anything we display.
impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Reqwest(value.without_url())
    }
}
