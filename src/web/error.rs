use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::{
    routes::SubscribeError,
    types::{DataParsingError, SubscribeResponse},
};
use crate::list_client;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, InvalidMethod),
            Error::Subscribe(SubscribeError::DataParsing(parse_er)) => {
                match parse_er {
                    DataParsingError::InvalidJson(_) => (StatusCode::BAD_REQUEST, MalformedBody),
                    DataParsingError::EmailMissing => (StatusCode::BAD_REQUEST, MissingEmail),
                }
            }
            Error::Subscribe(SubscribeError::ListClient(list_client::Error::Rejected {
                ..
            })) => (StatusCode::INTERNAL_SERVER_ERROR, UpstreamFailure),
            Error::Subscribe(SubscribeError::ListClient(client_er)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UnexpectedFailure(client_er.to_string()),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the caller gets to see of an `Error`.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Method not allowed")]
    InvalidMethod,
    #[display("Invalid JSON in request body")]
    MalformedBody,
    #[display("Email is required")]
    MissingEmail,
    #[display("Failed to subscribe to newsletter")]
    UpstreamFailure,
    #[display("{_0}")]
    UnexpectedFailure(String),
}

impl ClientError {
    pub const FALLBACK_MESSAGE: &'static str = "An unexpected error occurred";

    /// Requests that never reached the upstream get a bare `error`,
    /// the rest report `success: false`.
    pub fn body(&self) -> SubscribeResponse {
        match self {
            ClientError::InvalidMethod | ClientError::MalformedBody | ClientError::MissingEmail => {
                SubscribeResponse::rejected(self.to_string())
            }
            ClientError::UpstreamFailure => SubscribeResponse::failed(self.to_string()),
            ClientError::UnexpectedFailure(msg) if msg.trim().is_empty() => {
                SubscribeResponse::failed(Self::FALLBACK_MESSAGE)
            }
            ClientError::UnexpectedFailure(msg) => SubscribeResponse::failed(msg.as_str()),
        }
    }
}
