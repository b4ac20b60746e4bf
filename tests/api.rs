//! End-to-end tests: the real router on an ephemeral port, driven over HTTP.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};

use aquasense_gateway::api;
use aquasense_gateway::app_state::AppState;
use aquasense_gateway::config::GatewayConfig;
use aquasense_gateway::domain::{Clock, ManualClock};
use aquasense_gateway::notify::{NotificationError, PushNotifier};
use aquasense_gateway::persistence::{MeasurementStore, MemoryStore, SnapshotStore};
use aquasense_gateway::service::{ReportService, SensorService};

/// 2023-11-14T22:13:20Z, 05:13 on 2023-11-15 at UTC+7.
const EPOCH_SECS: i64 = 1_700_000_000;

#[derive(Debug, Default)]
struct RecordingNotifier {
    sent: AtomicUsize,
}

#[async_trait]
impl PushNotifier for RecordingNotifier {
    async fn send(&self, _target: &str, _text: &str) -> Result<(), NotificationError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    clock: Arc<ManualClock>,
    notifier: Arc<RecordingNotifier>,
}

impl TestServer {
    async fn start() -> Self {
        let Some(start) = DateTime::<Utc>::from_timestamp(EPOCH_SECS, 0) else {
            panic!("valid timestamp");
        };
        let clock = Arc::new(ManualClock::new(start));
        let store = Arc::new(MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>));
        let notifier = Arc::new(RecordingNotifier::default());
        let config = GatewayConfig::default();

        let sensor_service = Arc::new(SensorService::from_config(
            &config,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::clone(&store) as Arc<dyn MeasurementStore>,
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            Arc::clone(&notifier) as Arc<dyn PushNotifier>,
        ));
        let report_service = Arc::new(ReportService::new(
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            config.report_utc_offset_hours,
        ));
        let app = api::build_app(AppState {
            sensor_service,
            report_service,
        });

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            clock,
            notifier,
        }
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.client.get(format!("{}{path}", self.base)).send().await else {
            panic!("GET {path} failed");
        };
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let Ok(resp) = self
            .client
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
        else {
            panic!("POST {path} failed");
        };
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn ingest_nominal(&self) {
        for (path, body) in [
            ("ph", json!({"device_id": "esp32-1", "ph": 7.0})),
            ("turbidity", json!({"device_id": "esp32-1", "NTU": 10.0})),
            ("nh3", json!({"device_id": "esp32-1", "NH3": 0.01})),
            ("temperature", json!({"device_id": "esp32-1", "temperature": 25.0})),
            ("tds", json!({"device_id": "esp32-1", "tds": 100.0})),
        ] {
            let (status, _) = self.post(&format!("/api/v1/sensors/add/{path}"), body).await;
            assert_eq!(status, 200, "ingesting {path}");
        }
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn deadband_skips_small_changes() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post("/api/v1/sensors/add/ph", json!({"device_id": "esp32-1", "ph": 7.0}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["type"], "ph");
    assert_eq!(body["saved"], true);

    let (_, body) = server
        .post("/api/v1/sensors/add/ph", json!({"device_id": "esp32-1", "ph": 7.05}))
        .await;
    assert_eq!(body["saved"], false);

    let (_, body) = server
        .post("/api/v1/sensors/add/ph", json!({"device_id": "esp32-1", "ph": 7.2}))
        .await;
    assert_eq!(body["saved"], true);

    let (status, latest) = server.get("/api/v1/sensors/latest/ph").await;
    assert_eq!(status, 200);
    assert_eq!(latest["value"], 7.2);
    assert_eq!(latest["device_id"], "esp32-1");

    let (_, history) = server.get("/api/v1/sensors/history/ph?limit=10").await;
    let Some(rows) = history.as_array() else {
        panic!("history is not an array");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["value"], 7.2);
    assert_eq!(rows[1]["value"], 7.0);
}

#[tokio::test]
async fn flat_signal_is_stored_after_heartbeat() {
    let server = TestServer::start().await;
    let body = json!({"device_id": "esp32-1", "temperature": 25.0});

    let (_, first) = server.post("/api/v1/sensors/add/temperature", body.clone()).await;
    assert_eq!(first["saved"], true);

    server.clock.advance(TimeDelta::seconds(600));
    let (_, flat) = server.post("/api/v1/sensors/add/temperature", body.clone()).await;
    assert_eq!(flat["saved"], false);

    server.clock.advance(TimeDelta::seconds(1300));
    let (_, heartbeat) = server.post("/api/v1/sensors/add/temperature", body).await;
    assert_eq!(heartbeat["saved"], true);
}

#[tokio::test]
async fn legacy_field_names_are_accepted() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post("/api/v1/sensors/add/turbidity", json!({"device_id": "d", "NTU": 40.0}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["type"], "turbidity");

    let (status, body) = server
        .post("/api/v1/sensors/add/nh3", json!({"device_id": "d", "NH3": 0.1}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["type"], "nh3");

    let (status, _) = server.get("/api/v1/sensors/latest/ntu").await;
    assert_eq!(status, 200);
    let (status, _) = server.get("/api/v1/sensors/latest/ammonia").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn query_errors_map_to_status_codes() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/v1/sensors/latest/salinity").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1002);

    let (status, body) = server.get("/api/v1/sensors/latest/tds").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);

    let (status, body) = server
        .post("/api/v1/sensors/add/ph", json!({"device_id": "  ", "ph": 7.0}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);

    let (status, _) = server
        .post("/api/v1/sensors/add/ph", json!({"device_id": "d"}))
        .await;
    assert!((400..500).contains(&status));
}

#[tokio::test]
async fn analysis_without_data_is_no_data() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/api/v1/sensors/status/analysis").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "No Data");
    assert_eq!(body["color"], "gray");
    assert_eq!(body["values"]["ph"], Value::Null);
}

#[tokio::test]
async fn critical_analysis_alerts_once_and_feeds_reports() {
    let server = TestServer::start().await;
    server.ingest_nominal().await;
    let (_, body) = server
        .post("/api/v1/sensors/add/nh3", json!({"device_id": "esp32-1", "NH3": 0.6}))
        .await;
    assert_eq!(body["saved"], true);

    let (status, analysis) = server.get("/api/v1/sensors/status/analysis").await;
    assert_eq!(status, 200);
    assert_eq!(analysis["status"], "Critical");
    assert_eq!(analysis["color"], "red");
    assert_eq!(analysis["values"]["nh3"], 0.6);
    assert_eq!(server.notifier.sent.load(Ordering::SeqCst), 1);

    server.clock.advance(TimeDelta::minutes(10));
    let (_, again) = server.get("/api/v1/sensors/status/analysis").await;
    assert_eq!(again["status"], "Critical");
    assert_eq!(server.notifier.sent.load(Ordering::SeqCst), 1);

    let (status, summary) = server.get("/api/v1/reports/summary/daily").await;
    assert_eq!(status, 200);
    assert_eq!(summary["date"], "2023-11-15");
    assert_eq!(summary["summary_text"], "Critical events recorded");
    assert_eq!(summary["statistics"]["critical"], 1);
    assert_eq!(summary["statistics"]["max_nh3"], 0.6);

    let (_, table) = server.get("/api/v1/reports/table/daily").await;
    let Some(rows) = table.as_array() else {
        panic!("daily table is not an array");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["time"], "05:13");
    assert_eq!(rows[0]["nh3"], "0.600");

    let (_, monthly) = server
        .get("/api/v1/reports/summary/monthly?month=11&year=2023")
        .await;
    assert_eq!(monthly["grade"], "C");
    assert_eq!(monthly["total_logs"], 1);

    let (_, days) = server
        .get("/api/v1/reports/table/monthly?month=11&year=2023")
        .await;
    let Some(days) = days.as_array() else {
        panic!("monthly table is not an array");
    };
    assert_eq!(days.len(), 30);
    assert_eq!(days[14]["status"], "Critical");
    assert_eq!(days[0]["status"], "No Data");
}

#[tokio::test]
async fn reports_without_snapshots() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/v1/reports/summary/daily").await;
    assert_eq!(status, 200);
    assert!(body["message"].is_string());

    let (status, body) = server
        .get("/api/v1/reports/summary/monthly?month=2&year=2024")
        .await;
    assert_eq!(status, 200);
    assert!(body["message"].is_string());

    let (status, body) = server
        .get("/api/v1/reports/table/monthly?month=13&year=2024")
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);
}
