//! HTTP API for the coordinator
//!
//! Speaks the legacy client protocol: `/put`, `/get` and `/storage` are all
//! HTTP GETs carrying query parameters. A write is acknowledged as soon as
//! its ticket is enqueued and its worker task spawned; a read replies with
//! the fetched value, or the literal `"0"` when no value was obtained.

use crate::common::{Error, Metrics, METRICS};
use crate::coordinator::admission::{AdmissionQueue, OpKind};
use crate::coordinator::mode::Mode;
use crate::coordinator::router::Router;
use crate::coordinator::shard::Shard;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Router as AxumRouter,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Wire representation of "no value" in the legacy protocol. Kept for
/// compatibility; inside the core, absence is `None`.
const NO_VALUE: &str = "0";

/// Shared coordinator state for HTTP handlers.
#[derive(Clone)]
pub struct CoordState {
    pub admission: Arc<AdmissionQueue>,
    pub router: Arc<Router>,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: CoordState) -> AxumRouter {
    AxumRouter::new()
        .route("/put", axum::routing::get(put_value))
        .route("/get", axum::routing::get(get_value))
        .route("/storage", axum::routing::get(set_storage_mode))
        .route("/health", axum::routing::get(health))
        .route("/metrics", axum::routing::get(metrics))
        .with_state(state)
}

fn bad_request(err: Error) -> (StatusCode, String) {
    (err.to_http_status(), err.to_string())
}

fn require<'a>(param: &'a Option<String>, name: &str) -> Result<&'a str, (StatusCode, String)> {
    match param.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(bad_request(Error::InvalidRequest(format!(
            "missing query parameter: {}",
            name
        )))),
    }
}

#[derive(Debug, Deserialize)]
struct PutParams {
    key: Option<String>,
    value: Option<String>,
}

/// `GET /put?key=K&value=V`
///
/// Enqueues the write and acknowledges immediately; the write itself runs on
/// its own task once the ticket is admitted. Ordering against other
/// operations on the same key is fixed here, at enqueue time.
async fn put_value(
    State(state): State<CoordState>,
    Query(params): Query<PutParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = require(&params.key, "key")?.to_string();
    let value = require(&params.value, "value")?.to_string();

    Metrics::inc(&METRICS.puts_total);
    Metrics::inc(&METRICS.tickets_pending);
    let ticket = state.admission.enqueue(&key, OpKind::Write);

    tokio::spawn(async move {
        state.admission.acquire(&key, ticket).await;
        state.router.write(&key, &value).await;
        state.admission.release(&key, ticket);
        Metrics::dec(&METRICS.tickets_pending);
    });

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
struct GetParams {
    key: Option<String>,
    loc: Option<String>,
}

/// `GET /get?key=K&loc=L`
///
/// Waits for admission, performs the read and replies with the value, or
/// `"0"` when no value was obtained.
async fn get_value(
    State(state): State<CoordState>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = require(&params.key, "key")?.to_string();
    let loc = require(&params.loc, "loc")?;
    let requested = Shard::parse(loc).ok_or_else(|| {
        bad_request(Error::InvalidRequest(format!(
            "loc must be 1, 2 or 3, got {:?}",
            loc
        )))
    })?;

    Metrics::inc(&METRICS.gets_total);
    Metrics::inc(&METRICS.tickets_pending);
    let ticket = state.admission.enqueue(&key, OpKind::Read);

    // The ticketed section runs on its own task: a client disconnect drops
    // this handler future, but the task still runs through release, so an
    // abandoned request cannot leave its ticket wedging the key.
    let worker = tokio::spawn(async move {
        state.admission.acquire(&key, ticket).await;
        let value = state.router.read(&key, requested).await;
        state.admission.release(&key, ticket);
        Metrics::dec(&METRICS.tickets_pending);
        value
    });

    let value = worker.await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("read task failed: {}", e),
        )
    })?;

    Ok(value.unwrap_or_else(|| NO_VALUE.to_string()))
}

#[derive(Debug, Deserialize)]
struct StorageParams {
    storage: Option<String>,
}

/// `GET /storage?storage=replication|sharding`
///
/// Any other value is rejected rather than stored.
async fn set_storage_mode(
    State(state): State<CoordState>,
    Query(params): Query<StorageParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mode: Mode = require(&params.storage, "storage")?
        .parse()
        .map_err(bad_request)?;
    state.router.set_mode(mode);
    Ok(StatusCode::OK)
}

/// Health check endpoint reporting the current placement mode.
async fn health(State(state): State<CoordState>) -> impl IntoResponse {
    axum::Json(json!({
        "status": "healthy",
        "mode": state.router.mode().as_str(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, METRICS.to_prometheus())
}
