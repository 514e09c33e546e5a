use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use collector::{
    ArchiveClient, CoordinatePatcher, DustService, FetchConfig, FetchError, FetchOrchestrator,
    MesonetCsvParser, PartitionRequest, ReportBuilder, ResultCache, RetryPolicy, SystemClock,
};
use dust_monitor_core::discard_logger;
use server::{app, AppState};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tower::ServiceExt;

pub const DUST_DAY: &str = "\
station,valid,lon,lat,tmpf,dwpf,drct,sknt,vsby,wxcodes,metar
OERK,2025-03-14 06:00,46.6988,24.9576,91.40,35.60,40.00,12.00,0.50,+BLDU,OERK 140600Z 04012KT 0800 +BLDU
OERK,2025-03-14 09:00,46.6988,24.9576,95.00,33.80,0.00,0.00,3.00,DU,OERK 140900Z 00000KT 4800 DU
OKBK,2025-03-14 10:00,47.9689,29.2266,88.00,40.00,270.00,22.00,6.00,SA,OKBK 141000Z 27022KT 9000 SA
OKBK,2025-03-14 11:00,47.9689,29.2266,88.00,40.00,270.00,18.00,9.00,RA,OKBK 141100Z 27018KT 9999 RA
";

/// Upstream stand-in that answers every partition with the same body.
pub struct CannedArchive {
    body: String,
    calls: AtomicUsize,
    requests: Mutex<Vec<PartitionRequest>>,
}

impl CannedArchive {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PartitionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveClient for CannedArchive {
    async fn fetch(&self, request: &PartitionRequest) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.body.clone())
    }
}

pub struct TestApp {
    pub app: Router,
    pub archive: Arc<CannedArchive>,
}

pub fn spawn_app(body: &str) -> TestApp {
    let logger = discard_logger();
    let archive = Arc::new(CannedArchive::new(body));

    let orchestrator = FetchOrchestrator::new(
        logger.clone(),
        archive.clone(),
        Arc::new(MesonetCsvParser),
        Arc::new(CoordinatePatcher::default()),
        FetchConfig {
            networks: vec![String::from("SA__ASOS")],
            retry: RetryPolicy::new(0, Duration::from_millis(1)),
            ..FetchConfig::default()
        },
    )
    .unwrap();
    let clock = Arc::new(SystemClock);
    let cache = ResultCache::new(logger.clone(), time::Duration::minutes(5), clock.clone());
    let service = DustService::new(
        logger.clone(),
        orchestrator,
        cache,
        clock,
        ReportBuilder::default(),
    );

    let app = app(AppState {
        logger,
        service: Arc::new(service),
    });
    TestApp { app, archive }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
