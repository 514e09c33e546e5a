use crate::helpers::{spawn_app, DUST_DAY};
use axum::http::StatusCode;
use time::{macros::datetime, Duration};

#[tokio::test]
async fn all_returns_only_dust_reports() {
    let test_app = spawn_app(DUST_DAY);

    let (status, body) = test_app.get("/api/dust/all").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["station"], "OERK");
    assert_eq!(rows[0]["wxcodes"], "+BLDU");
    assert_eq!(rows[0]["sknt"], 12.0);
    assert_eq!(rows[0]["valid"], "2025-03-14T06:00:00Z");
    assert!(rows.iter().all(|row| row["wxcodes"] != "RA"));
}

#[tokio::test]
async fn all_filters_by_station() {
    let test_app = spawn_app(DUST_DAY);

    let (status, body) = test_app.get("/api/dust/all?station=OKBK").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["station"], "OKBK");
}

#[tokio::test]
async fn views_of_one_window_share_a_fetch() {
    let test_app = spawn_app(DUST_DAY);

    let (_, summary) = test_app.get("/api/dust/summary?hours=12").await;
    let (_, points) = test_app.get("/api/dust/map?hours=12").await;

    assert_eq!(summary["totalEvents"], 3);
    assert_eq!(summary["byType"]["BLDU"], 1);
    assert_eq!(summary["byStation"]["OERK"]["count"], 2);
    assert_eq!(summary["byStation"]["OERK"]["maxWind"], 12.0);
    assert_eq!(summary["latestEvent"]["station"], "OKBK");

    let points = points.as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["intensity"], 1.0);
    assert_eq!(points[2]["intensity"], 0.6);

    assert_eq!(test_app.archive.calls(), 1);
}

#[tokio::test]
async fn explicit_range_reaches_upstream() {
    let test_app = spawn_app(DUST_DAY);

    let (status, _) = test_app
        .get("/api/dust/summary?start=2025-03-01&end=2025-03-05&hours=6")
        .await;

    assert_eq!(status, StatusCode::OK);
    let requests = test_app.archive.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].span.start, datetime!(2025-03-01 00:00 UTC));
    assert_eq!(requests[0].span.end, datetime!(2025-03-05 23:59:59.999 UTC));
}

#[tokio::test]
async fn inverted_range_is_a_bad_request() {
    let test_app = spawn_app(DUST_DAY);

    let (status, body) = test_app
        .get("/api/dust/summary?start=2025-03-05&end=2025-03-01")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("after"));
    assert_eq!(test_app.archive.calls(), 0);
}

#[tokio::test]
async fn wind_rose_skips_calm_and_filters_station() {
    let test_app = spawn_app(DUST_DAY);

    let (status, rose) = test_app.get("/api/dust/windrose").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rose["total"], 2);
    assert_eq!(rose["directions"][2], "NE");
    assert_eq!(rose["bins"][4]["label"], "10-15");
    assert_eq!(rose["bins"][4]["counts"][2], 1);

    let (_, kuwait) = test_app.get("/api/dust/windrose?station=OKBK").await;
    assert_eq!(kuwait["total"], 1);
    assert_eq!(kuwait["bins"][6]["counts"][12], 1);
}

#[tokio::test]
async fn report_for_a_day() {
    let test_app = spawn_app(DUST_DAY);

    let (status, report) = test_app.get("/api/dust/report?date=2025-03-14").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["date"], "2025-03-14");
    let table = report["summaryTable"].as_array().unwrap();
    assert_eq!(table.len(), 12);
    assert_eq!(table[0]["country"], "Saudi Arabia");
    assert_eq!(table[0]["total"], 2);
    assert_eq!(table[1]["country"], "Kuwait");
    assert_eq!(table[1]["SA"], 1);
    assert_eq!(report["totals"]["primary"], 2);
    assert_eq!(report["totals"]["region"], 1);

    let oerk = &report["stationsByCountry"]["Saudi Arabia"][0];
    assert_eq!(oerk["station"], "OERK");
    assert_eq!(oerk["observations"][0]["tempC"], 33);
    assert_eq!(oerk["observations"][0]["windKmh"], 22);
    assert_eq!(oerk["observations"][0]["windDirCompass"], "NE");
    assert_eq!(oerk["observations"][0]["visMeters"], 800);

    let requests = test_app.archive.requests();
    assert_eq!(requests[0].span.start, datetime!(2025-03-14 00:00 UTC));
}

#[tokio::test]
async fn report_without_date_is_rejected_before_fetching() {
    let test_app = spawn_app(DUST_DAY);

    let (missing, body) = test_app.get("/api/dust/report").await;
    let (malformed, _) = test_app.get("/api/dust/report?date=14-03-2025").await;

    assert_eq!(missing, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date"));
    assert_eq!(malformed, StatusCode::BAD_REQUEST);
    assert_eq!(test_app.archive.calls(), 0);
}

#[tokio::test]
async fn malformed_upstream_is_a_server_error() {
    let test_app = spawn_app("<html><body>Service Unavailable</body></html>\n");

    let (status, body) = test_app.get("/api/dust/all").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("station"));
}

#[tokio::test]
async fn empty_upstream_is_an_empty_list() {
    let test_app = spawn_app("");

    let (status, body) = test_app.get("/api/dust/map").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn unreadable_hours_use_the_default_lookback() {
    let test_app = spawn_app(DUST_DAY);

    let (status, _) = test_app.get("/api/dust/summary?hours=abc").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = test_app.get("/api/dust/map?hours=-5").await;
    assert_eq!(status, StatusCode::OK);

    let requests = test_app.archive.requests();
    assert!(!requests.is_empty());
    assert_eq!(requests[0].span.end - requests[0].span.start, Duration::hours(24));
}

#[tokio::test]
async fn out_of_range_windows_are_bad_requests() {
    let test_app = spawn_app(DUST_DAY);

    let (status, body) = test_app.get("/api/dust/summary?hours=200000000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("hours"));
    assert_eq!(test_app.archive.calls(), 0);

    let (status, _) = test_app
        .get("/api/dust/all?start=9999-12-25&end=9999-12-31")
        .await;
    assert_eq!(status, StatusCode::OK);
}
