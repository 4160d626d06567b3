//! Fresca Storefront library.
//!
//! This crate provides the order/payment service as a library, allowing
//! the router to be exercised in tests without a listening socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod stripe;
pub mod telegram;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::{Span, field};

use crate::state::AppState;

/// Upper bound on request handling, covering upstream processor calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP application: all routes plus the session, tracing, and
/// timeout layers. The binary adds the Sentry layers on top.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    // Every request gets a span carrying method and URI up front; status and
    // elapsed time are filled in once the response is ready.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &axum::http::Request<_>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                status = field::Empty,
                elapsed_ms = field::Empty,
            )
        })
        .on_response(|res: &axum::http::Response<_>, elapsed: Duration, span: &Span| {
            span.record("status", res.status().as_u16());
            span.record("elapsed_ms", elapsed.as_millis() as u64);
            DefaultOnResponse::default().on_response(res, elapsed, span);
        });

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(trace_layer)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
