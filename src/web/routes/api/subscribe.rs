use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{error, info};

use crate::{
    list_client,
    utils::error_chain_fmt,
    web::{
        self,
        types::{DataParsingError, SubscribeResponse, SubscriberEmail},
        WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),

    #[error("list client error: {0}")]
    ListClient(#[from] list_client::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// ###################################
// ->   API
// ###################################
/// Relays one subscription to the list API.
/// The body is read raw so malformed JSON and a missing email can be told apart.
#[tracing::instrument(
    name = "Relaying a subscription to the list api",
    skip(app_state, body),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    body: Bytes,
) -> WebResult<(StatusCode, Json<SubscribeResponse>)> {
    let email = SubscriberEmail::from_body(&body).map_err(SubscribeError::DataParsing)?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    if let Err(er) = app_state.list_client.subscribe(&email).await {
        if let list_client::Error::Rejected { status, body } = &er {
            error!(%status, upstream_body = %body, "list api rejected the subscription");
        }
        return Err(SubscribeError::ListClient(er).into());
    }

    info!("SUCCESS");
    Ok((StatusCode::OK, Json(SubscribeResponse::subscribed())))
}

/// CORS preflight, the headers are added by the CORS middleware.
pub async fn subscribe_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> WebResult<()> {
    Err(web::Error::MethodNotAllowed)
}
