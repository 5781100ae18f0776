//! Purpose: Provide the HTTP/JSON server and the request failure boundary.
//! Exports: `ServeConfig`, `Rejection`, `app`, `serve`, `validate_config`, `panic_layer`.
//! Role: Axum-based server echoing typed request envelopes back through their codecs.
//! Invariants: Field failures map to 400 `{"error": reason}`; everything else to an opaque 500.
//! Invariants: Each request produces exactly one response; handler panics are caught and logged.
//! Invariants: Loopback-only unless explicitly allowed.

use std::any::Any;
use std::future::IntoFuture;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::api::{
    CodecSet, DateTimeRequest, DecodeError, Error, ErrorKind, FieldFailure, ListRequest,
    RequestShape, decode_body, encode_body,
};

pub const DEFAULT_BIND: &str = "127.0.0.1:9700";
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;
/// Method and path of every served endpoint.
pub const ROUTES: &[(&str, &str)] = &[("POST", "/date-time"), ("POST", "/array-string")];

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub max_body_bytes: u64,
    pub allow_non_loopback: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9700),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_non_loopback: false,
        }
    }
}

struct AppState {
    codecs: CodecSet,
}

/// Builds the router and its shared state; call once per process before serving.
pub fn app(config: &ServeConfig) -> Result<Router, Error> {
    validate_config(config)?;
    let max_body_bytes: usize = config
        .max_body_bytes
        .try_into()
        .map_err(|_| Error::new(ErrorKind::Usage).with_message("--max-body-bytes is too large"))?;

    let state = Arc::new(AppState {
        codecs: CodecSet::new(),
    });

    Ok(Router::new()
        .route("/date-time", post(date_time))
        .route("/array-string", post(array_string))
        .layer(panic_layer())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    let app = app(&config)?;

    init_tracing();

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;
    tracing::info!(bind = %config.bind, "serving");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("server failed")
                    .with_source(err)
            })?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutting down");
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(Duration::from_secs(10), &mut server).await {
                Ok(result) => result.map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("server failed")
                        .with_source(err)
                })?,
                Err(_) => {
                    return Err(Error::new(ErrorKind::Io).with_message("server shutdown timed out"));
                }
            }
        }
    };
    Ok(())
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

pub fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }

    if config.max_body_bytes == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-body-bytes must be greater than zero")
            .with_hint("Use a positive value like 1048576."));
    }

    if config.max_body_bytes > usize::MAX as u64 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-body-bytes exceeds platform limits")
            .with_hint("Use a smaller value that fits in memory."));
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

/// Failure outcome of one request, rendered as exactly one JSON error response.
#[derive(Debug)]
pub enum Rejection {
    Invalid(FieldFailure),
    Internal(Error),
}

impl From<FieldFailure> for Rejection {
    fn from(failure: FieldFailure) -> Self {
        Rejection::Invalid(failure)
    }
}

impl From<Error> for Rejection {
    fn from(err: Error) -> Self {
        Rejection::Internal(err)
    }
}

impl From<DecodeError> for Rejection {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Invalid(failure) => Rejection::Invalid(failure),
            DecodeError::Internal(err) => Rejection::Internal(err),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Invalid(failure) => {
                tracing::debug!(
                    field = failure.field().unwrap_or("-"),
                    kind = ?failure.kind(),
                    reason = failure.reason(),
                    "rejected request field"
                );
                error_response(StatusCode::BAD_REQUEST, failure.reason())
            }
            Rejection::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

async fn date_time(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, Rejection> {
    echo::<DateTimeRequest>(&state, body)
}

async fn array_string(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, Rejection> {
    echo::<ListRequest>(&state, body)
}

fn echo<T: RequestShape>(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, Rejection> {
    let body =
        body.map_err(|rejection| body_read_error(rejection.status(), rejection.body_text()))?;
    let request: T = decode_body(&body, &state.codecs)?;
    let payload = encode_body(&request, &state.codecs)?;
    Ok(json_response(StatusCode::OK, payload))
}

// Hint carries the rejection status, e.g. 413 for a body over the limit.
fn body_read_error(status: StatusCode, detail: String) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to read request body")
        .with_hint(format!("{status}: {detail}"))
}

/// Layer turning handler panics into the opaque 500 response.
pub fn panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}

fn json_response(status: StatusCode, payload: Value) -> Response {
    (status, Json(payload)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorEnvelope { error: message })).into_response()
}
