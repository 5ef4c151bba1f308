//! Cross-origin headers for the browser form.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::{ConfigError, CorsConfig};

pub const ALLOW_HEADERS: &str = "Content-Type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

#[derive(Debug, Clone)]
enum AllowOrigin {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct Cors {
    allow_origin: AllowOrigin,
}

impl Cors {
    pub fn any() -> Self {
        Cors {
            allow_origin: AllowOrigin::Any,
        }
    }

    /// Writes the CORS headers for a request that came from `origin`.
    /// With an explicit origin list an unlisted origin gets no `Access-Control-Allow-Origin`.
    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        match &self.allow_origin {
            AllowOrigin::Any => {
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                );
            }
            AllowOrigin::List(allowed) => {
                headers.append(header::VARY, HeaderValue::from_static("origin"));
                if let Some(origin) = origin.filter(|origin| allowed.contains(origin)) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                }
            }
        }

        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
    }
}

impl TryFrom<&CorsConfig> for Cors {
    type Error = ConfigError;

    fn try_from(config: &CorsConfig) -> Result<Self, Self::Error> {
        if config.allowed_origins.iter().any(|origin| origin == "*") {
            return Ok(Cors::any());
        }

        let allowed = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/'))
                    .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cors {
            allow_origin: AllowOrigin::List(allowed),
        })
    }
}
