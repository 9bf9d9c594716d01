use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use ipcquery_ai::Generator;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::HandlerConfig;
use crate::error::HandlerError;
use crate::routes;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub config: HandlerConfig,
}

/// Build the router: `POST /get_response` with CORS, tracing and panic capture.
pub fn router(generator: Arc<dyn Generator>, config: HandlerConfig) -> Router {
    let state = Arc::new(AppState { generator, config });

    Router::new()
        .route("/get_response", post(routes::get_response))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "request handler panicked".to_string()
    };
    error!(panic = %detail, "request handler panicked");
    HandlerError::Internal(detail).into_response()
}

/// Bind `addr` and serve `app` until Ctrl-C.
pub async fn run(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}
