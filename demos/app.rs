//! Example host application with a deliberately slow handler.
//!
//! Builds a chain with one handler that takes three times its budget to
//! hand off, instruments the app, and serves it over HTTP. Watch the log
//! output for the slow-handler warning while hitting the endpoints.
//!
//! Run with an optional config path:
//!     cargo run --example app [demos/watchdog.toml]

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use http::StatusCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stallwatch::{
    App, ChainError, ErrorHandler, Handler, InstrumentConfig, Next, Request, ResponseHandle,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stallwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => stallwatch::load_config(Path::new(&path))?,
        None => InstrumentConfig::default(),
    };

    tracing::info!(
        enabled = config.enabled,
        budget_ms = config.budget_ms,
        "configuration loaded"
    );

    let mut app = App::new();

    app.mount(Handler::named(
        "request_log",
        |req, _res, next: Next| async move {
            tracing::info!(method = %req.method, path = req.path(), "incoming request");
            next.run(None).await;
            Ok(())
        },
    ));

    // Takes three times its budget to hand off, so every request through
    // here shows up on the diagnostic channel.
    let lag = config.budget() * 3;
    app.mount(Handler::named(
        "molasses",
        move |_req, _res, next: Next| async move {
            tokio::time::sleep(lag).await;
            next.run(None).await;
            Ok(())
        },
    ));

    app.get(
        "/",
        Handler::named("index", |_req, res: ResponseHandle, next: Next| async move {
            res.set_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            res.send(StatusCode::OK, "hello from the instrumented chain\n");
            next.run(None).await;
            Ok(())
        }),
    );

    app.get(
        "/boom",
        Handler::named("boom", |_req, _res, _next| async {
            Err(ChainError::new("deliberate failure"))
        }),
    );

    app.mount_error(ErrorHandler::named(
        "rescue",
        |err: ChainError, _req, res: ResponseHandle, next: Next| async move {
            res.send(StatusCode::INTERNAL_SERVER_ERROR, format!("error: {err}\n"));
            next.run(None).await;
            Ok(())
        },
    ));

    if config.enabled {
        stallwatch::instrument_with(&mut app, config.budget())?;
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:6656").await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    let router = axum::Router::new().fallback(relay).with_state(Arc::new(app));
    axum::serve(listener, router).await?;

    Ok(())
}

/// Bridge one incoming request into the instrumented chain.
async fn relay(State(app): State<Arc<App>>, req: axum::extract::Request) -> impl IntoResponse {
    let (parts, _body) = req.into_parts();
    let response = app
        .dispatch(Request {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
        })
        .await;
    (response.status, response.headers, response.body)
}
