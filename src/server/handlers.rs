use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};

use super::{AppState, CLUSTER_ID_HEADER};
use crate::enrich::enrich;
use crate::error::{Error, ErrorKind, Result};

fn reply(status: StatusCode, message: String) -> Response {
    (status, format!("{}\n", message)).into_response()
}

fn error_reply(err: &Error) -> Response {
    match err.kind() {
        ErrorKind::Validation => reply(StatusCode::BAD_REQUEST, err.to_string()),
        ErrorKind::Parse => reply(
            StatusCode::BAD_REQUEST,
            format!("Error processing metrics: {}", err),
        ),
        ErrorKind::Delivery => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error forwarding metrics: {}", err),
        ),
        ErrorKind::Other => reply(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return reply(
            StatusCode::METHOD_NOT_ALLOWED,
            String::from("Method not allowed"),
        );
    }

    let source = peer.map(|ConnectInfo(addr)| addr.ip());
    match relay(&state, &headers, source, &body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation | ErrorKind::Parse => {
                    tracing::warn!(error = %e, "rejected push")
                }
                ErrorKind::Delivery | ErrorKind::Other => {
                    tracing::error!(error = %e, "failed to relay push")
                }
            }
            error_reply(&e)
        }
    }
}

async fn relay(
    state: &AppState,
    headers: &HeaderMap,
    source: Option<std::net::IpAddr>,
    body: &[u8],
) -> Result<()> {
    let cluster_id = headers
        .get(CLUSTER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation("X-Cluster-ID header is required"))?;

    let context = state.contexts.build(cluster_id, source)?;
    let enriched = enrich(body, &context)?;

    state
        .forwarder
        .forward(enriched)
        .await
        .map_err(Error::from)?;

    tracing::debug!(cluster_id, "push relayed");
    Ok(())
}
