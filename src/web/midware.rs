use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    web::{log, Error, REQUEST_ID_HEADER},
    AppState,
};

/// Turns an `Error` stashed in the response extensions into the JSON body the caller sees,
/// and logs the request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    resp: Response,
) -> Response {
    let uuid = req_headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    log::log_request(
        uuid,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    );

    let err_resp = client_status_and_error
        .map(|(status, cl_err)| (status, Json(cl_err.body())).into_response());

    err_resp.unwrap_or(resp)
}

/// Adds the CORS headers to every response, errors included.
pub async fn cors_headers(
    State(app_state): State<AppState>,
    req_headers: HeaderMap,
    mut resp: Response,
) -> Response {
    app_state
        .cors
        .apply(req_headers.get(header::ORIGIN), resp.headers_mut());

    resp
}
