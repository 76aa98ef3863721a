use anyhow::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};

use crate::{
    command, config::Config, mux, process, types, types::ScanRequest,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Path or name of the scan binary to spawn.
    pub scan_binary: String,
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    q: Option<String>,
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(scan_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn spawn_server(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("serving on http://{bind}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// GET / — run one scan and stream its output.
///
/// The multiplexer runs in its own task; the response body is the receiving
/// end of the chunk channel, so bytes reach the client as the tool produces
/// them. Dropping the body (client disconnect) closes the channel, which the
/// multiplexer turns into a process kill.
async fn scan_handler(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
    headers: HeaderMap,
) -> Response {
    let req_id = request_id(&headers);
    let span = info_span!("scan", req_id = %req_id);

    let Some(raw) = params.q else {
        return plain(StatusCode::OK, "No hostname");
    };

    let hostname = match command::sanitize_hostname(&raw) {
        Ok(h) => h.to_string(),
        Err(e) => {
            span.in_scope(|| info!(error = %e, "rejected hostname"));
            return plain(StatusCode::BAD_REQUEST, "Invalid hostname");
        }
    };

    let client = types::classify_agent(
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );
    let request = ScanRequest {
        hostname,
        client,
        quick: state.config.quick,
        console_echo: state.config.console_log,
    };
    let args = command::build_args(&request);
    span.in_scope(|| {
        info!(?client, command = %format_args!("{} {}", state.scan_binary, args.join(" ")), "starting scan")
    });

    let proc = match process::launch(&state.scan_binary, &args) {
        Ok(p) => p,
        Err(e) => {
            span.in_scope(|| error!(error = %e, "launch failed"));
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Scan failed to start");
        }
    };

    let selected = types::select_stream(client);
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(
        async move {
            let outcome = mux::multiplex(proc, selected, tx, request.console_echo).await;
            info!(?outcome, "completed");
        }
        .instrument(span),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html")
        .header("x-request-id", req_id)
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .unwrap()
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

/// Correlation id for log lines: honor an upstream `X-Request-Id`, otherwise
/// mint a short random hex token.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:08x}", rand::random::<u32>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_prefers_upstream_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "abc123".parse().unwrap());
        assert_eq!(request_id(&headers), "abc123");
    }

    #[test]
    fn request_id_is_minted_when_absent() {
        let id = request_id(&HeaderMap::new());
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
