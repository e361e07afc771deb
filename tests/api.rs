//! HTTP surface tests against the coordinator router with a transport double

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use trikv::common::{Error, Result};
use trikv::coordinator::admission::{AdmissionQueue, OpKind};
use trikv::coordinator::http::{create_router, CoordState};
use trikv::coordinator::router::Router;
use trikv::coordinator::transport::DataCenterTransport;

/// In-memory stand-in for the three data centers: records every call and
/// serves values out of a per-endpoint map.
#[derive(Default)]
struct FakeDataCenters {
    store: Mutex<HashMap<(String, String), String>>,
    puts: Mutex<Vec<(String, String, String)>>,
    gets: Mutex<Vec<(String, String)>>,
}

impl FakeDataCenters {
    fn seed(&self, endpoint: &str, key: &str, value: &str) {
        self.store
            .lock()
            .unwrap()
            .insert((endpoint.to_string(), key.to_string()), value.to_string());
    }

    fn put_endpoints(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|p| p.0.clone()).collect()
    }
}

impl DataCenterTransport for FakeDataCenters {
    fn put<'a>(
        &'a self,
        endpoint: &'a str,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.puts.lock().unwrap().push((
                endpoint.to_string(),
                key.to_string(),
                value.to_string(),
            ));
            self.seed(endpoint, key, value);
            Ok(())
        })
    }

    fn get<'a>(&'a self, endpoint: &'a str, key: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            self.gets
                .lock()
                .unwrap()
                .push((endpoint.to_string(), key.to_string()));
            self.store
                .lock()
                .unwrap()
                .get(&(endpoint.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| Error::transport(endpoint, "no value"))
        })
    }
}

fn test_app() -> (axum::Router, Arc<FakeDataCenters>) {
    let fake = Arc::new(FakeDataCenters::default());
    let router = Arc::new(Router::new(
        fake.clone(),
        ["dc://1".into(), "dc://2".into(), "dc://3".into()],
    ));
    let state = CoordState {
        admission: Arc::new(AdmissionQueue::new()),
        router,
    };
    (create_router(state), fake)
}

async fn send(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Writes are acknowledged before they land; poll until the fan-out shows up.
async fn wait_for_puts(fake: &FakeDataCenters, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while fake.puts.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("write never reached the data centers");
}

#[tokio::test]
async fn test_put_replicates_to_all_three() {
    let (app, fake) = test_app();
    let (status, body) = send(&app, "/put?key=user&value=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    wait_for_puts(&fake, 3).await;
    assert_eq!(fake.put_endpoints(), vec!["dc://1", "dc://2", "dc://3"]);
}

#[tokio::test]
async fn test_get_in_replication_mode_reads_dc1_only() {
    let (app, fake) = test_app();
    fake.seed("dc://1", "k", "from-one");
    fake.seed("dc://3", "k", "from-three");

    // loc is ignored under replication
    let (status, body) = send(&app, "/get?key=k&loc=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "from-one");

    let gets = fake.gets.lock().unwrap();
    assert_eq!(gets.len(), 1);
    assert_eq!(gets[0].0, "dc://1");
}

#[tokio::test]
async fn test_get_missing_key_returns_zero() {
    let (app, _fake) = test_app();
    let (status, body) = send(&app, "/get?key=ghost&loc=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0");
}

#[tokio::test]
async fn test_sharding_put_targets_owning_node() {
    let (app, fake) = test_app();
    let (status, _) = send(&app, "/storage?storage=sharding").await;
    assert_eq!(status, StatusCode::OK);

    // "c" is pinned to shard 3
    send(&app, "/put?key=c&value=v").await;
    wait_for_puts(&fake, 1).await;
    assert_eq!(fake.put_endpoints(), vec!["dc://3"]);
}

#[tokio::test]
async fn test_sharding_get_honors_location_guard() {
    let (app, fake) = test_app();
    send(&app, "/storage?storage=sharding").await;
    fake.seed("dc://1", "a", "apple");

    // Matching location returns the value.
    let (_, body) = send(&app, "/get?key=a&loc=1").await;
    assert_eq!(body, "apple");

    // Wrong location yields "0" without touching any node.
    let before = fake.gets.lock().unwrap().len();
    let (status, body) = send(&app, "/get?key=a&loc=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0");
    assert_eq!(fake.gets.lock().unwrap().len(), before);
}

#[tokio::test]
async fn test_mode_round_trip_via_storage_endpoint() {
    let (app, fake) = test_app();

    send(&app, "/storage?storage=sharding").await;
    send(&app, "/put?key=b&value=v1").await;
    wait_for_puts(&fake, 1).await;

    send(&app, "/storage?storage=replication").await;
    send(&app, "/put?key=b&value=v2").await;
    wait_for_puts(&fake, 4).await;

    let endpoints = fake.put_endpoints();
    assert_eq!(endpoints[0], "dc://2");
    assert_eq!(&endpoints[1..], &["dc://1", "dc://2", "dc://3"]);
}

#[tokio::test]
async fn test_invalid_mode_is_rejected() {
    let (app, _fake) = test_app();
    let (status, body) = send(&app, "/storage?storage=cache").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("cache"));

    // The mode is unchanged afterwards.
    let (_, health) = send(&app, "/health").await;
    assert!(health.contains("replication"));
}

#[tokio::test]
async fn test_missing_parameters_are_rejected() {
    let (app, _fake) = test_app();
    for uri in [
        "/put?key=k",
        "/put?value=v",
        "/put?key=&value=v",
        "/get?key=k",
        "/get?loc=1",
        "/storage",
    ] {
        let (status, _) = send(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {} must be rejected", uri);
    }
}

#[tokio::test]
async fn test_invalid_location_is_rejected() {
    let (app, _fake) = test_app();
    let (status, _) = send(&app, "/get?key=k&loc=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let (app, _fake) = test_app();
    let (status, body) = send(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));

    let (status, body) = send(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("trikv_puts_total"));
    assert!(body.contains("trikv_tickets_pending"));
}

#[tokio::test]
async fn test_disconnected_get_still_releases_its_ticket() {
    let fake = Arc::new(FakeDataCenters::default());
    let admission = Arc::new(AdmissionQueue::new());
    let router = Arc::new(Router::new(
        fake.clone(),
        ["dc://1".into(), "dc://2".into(), "dc://3".into()],
    ));
    let state = CoordState {
        admission: admission.clone(),
        router,
    };
    let app = create_router(state);
    fake.seed("dc://1", "k", "v");

    // Hold the key so the incoming read parks in acquire.
    let holder = admission.enqueue_at("k", 0, OpKind::Write);
    admission.acquire("k", holder).await;

    // The client sends a read and goes away before it is admitted: the
    // handler future is dropped mid-wait, like a closed connection.
    let abandoned = tokio::time::timeout(Duration::from_millis(100), send(&app, "/get?key=k&loc=1"));
    assert!(abandoned.await.is_err());

    admission.release("k", holder);

    // The orphaned ticket must still drain and release; a fresh read on
    // the same key completes instead of queueing forever behind it.
    let (status, body) =
        tokio::time::timeout(Duration::from_secs(2), send(&app, "/get?key=k&loc=1"))
            .await
            .expect("key wedged by a ticket from a disconnected client");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "v");
    assert_eq!(admission.depth("k"), 0);
    assert!(!admission.is_in_flight("k"));
}

#[tokio::test]
async fn test_same_key_writes_apply_in_arrival_order() {
    let (app, fake) = test_app();
    for i in 0..5 {
        send(&app, &format!("/put?key=seq&value=v{}", i)).await;
    }
    wait_for_puts(&fake, 15).await; // 5 writes x 3 replicas

    // Values must land in arrival order on every endpoint.
    let puts = fake.puts.lock().unwrap();
    for endpoint in ["dc://1", "dc://2", "dc://3"] {
        let values: Vec<&str> = puts
            .iter()
            .filter(|p| p.0 == endpoint)
            .map(|p| p.2.as_str())
            .collect();
        assert_eq!(values, vec!["v0", "v1", "v2", "v3", "v4"]);
    }
}
