use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnRequest, TraceLayer},
};
use tracing::{Level, Span};

use crate::{
    web::{midware, routes::routes, REQUEST_ID_HEADER},
    App, Result,
};

/// The core async function returning a future that will serve this application.
///
/// Accepts an `App` (listener and state) and sets up the request-id, tracing, CORS and
/// error mapping middleware around the routes.
///
/// Current implementation might return an IO error from `axum::serve`
pub async fn serve(app: App) -> Result<()> {
    let App {
        app_state,
        listener,
    } = app;
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = build_trace_layer();

    let app = Router::new().merge(routes(app_state.clone())).layer(
        ServiceBuilder::new()
            // Set UUID per request
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            // Propagate UUID to response. It sits outside the response mapper because the
            // mapper replaces error responses wholesale.
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(trace_layer)
            // Responses travel the stack bottom-up, so the CORS headers get added
            // after the response mapper has rebuilt any error response.
            .layer(middleware::map_response_with_state(
                app_state,
                midware::cors_headers,
            ))
            .layer(middleware::map_response(midware::response_mapper)),
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Request spans for `tower_http::TraceLayer`: `relay_request` span per request, `DEBUG` on
/// arrival, and one line on completion whose level follows the status class.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    DefaultOnRequest,
    fn(&Response<Body>, Duration, &Span),
> {
    TraceLayer::new_for_http()
        .make_span_with(relay_request_span as fn(&Request<Body>) -> Span)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(log_relay_response as fn(&Response<Body>, Duration, &Span))
}

fn relay_request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "relay_request",
        request_id,
        method = %req.method(),
        route = req.uri().path(),
        status = tracing::field::Empty,
    )
}

fn log_relay_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status().as_u16();
    let latency_ms = latency.as_millis() as u64;
    span.record("status", status);

    match status {
        500.. => tracing::error!(latency_ms, "relay request failed"),
        400..=499 => tracing::warn!(latency_ms, "relay request refused"),
        _ => tracing::info!(latency_ms, "relay request done"),
    }
}
