//! Fresca Storefront - Order and payment service.
//!
//! This binary serves the order/payment API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with JSON request/response bodies
//! - Session-backed cart storage (cookie identifies the session)
//! - Stripe Checkout for card payments, confirmed via signed webhooks
//! - Telegram and SMTP email for order notifications
//!
//! # Security
//!
//! This binary only has access to:
//! - Stripe secret key and webhook signing secret
//! - Telegram bot credentials (if configured)
//! - SMTP credentials (if configured)
//!
//! All prices are computed server-side; client-submitted totals are
//! advisory only and never charged.

#![cfg_attr(not(test), forbid(unsafe_code))]

use fresca_storefront::config::StorefrontConfig;
use fresca_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start error tracking when a DSN is configured. The returned guard
/// flushes pending events on drop, so it must live until exit.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;
    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        attach_stacktrace: true,
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        ..Default::default()
    };
    Some(sentry::init((dsn, options)))
}

/// Map tracing levels onto Sentry: warnings and errors become events,
/// info and debug become breadcrumbs on whatever event follows.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    let level = *metadata.level();
    if level <= tracing::Level::WARN {
        sentry_tracing::EventFilter::Event
    } else if level <= tracing::Level::DEBUG {
        sentry_tracing::EventFilter::Breadcrumb
    } else {
        sentry_tracing::EventFilter::Ignore
    }
}

/// Tracing subscriber with env-based filtering and the Sentry bridge.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fresca_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry must exist before the subscriber so its tracing layer has a hub.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let state = AppState::new(config.clone()).expect("Failed to initialize application state");

    // The Sentry tower layers wrap the app from the outside so every
    // request, including rejected webhooks, is covered.
    let app = fresca_storefront::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server exited abnormally");
}

/// Resolve on Ctrl+C or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C handler failed to install");
    };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())
            .expect("SIGTERM handler failed to install")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = term => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
