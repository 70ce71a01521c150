use axum::http::StatusCode;
use serde_json::json;
use time::Duration;
use time::macros::datetime;

mod common;
use common::mock_app::MockApp;

#[tokio::test]
async fn test_energy_report() {
    let app = MockApp::new();

    let (status, body) = app
        .post("/update-power", json!({ "device": "heater", "power": 100.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "device": "heater", "power": 100.0 }));

    app.post("/floor2/heater", json!({ "state": "ON" })).await;
    app.clock.advance(Duration::hours(1));

    let (status, report) = app.get("/energy-report").await;
    assert_eq!(status, StatusCode::OK);

    let heater = &report["floors"]["floor2"]["daily"]["devices"]["heater"];
    assert_eq!(heater["runtime_seconds"], json!(3600));
    assert_eq!(heater["power_w"], json!(100.0));
    assert_eq!(heater["energy_kwh"], json!(0.1));
    assert_eq!(heater["cost"], json!(250));

    assert_eq!(report["price_per_kwh"], json!(2500.0));
    assert_eq!(report["currency"], json!("VND"));
    assert_eq!(report["total"]["daily"]["cost"], json!(250));
    assert_eq!(report["total"]["monthly"]["cost"], json!(7500));
    assert_eq!(report["total"]["monthly"]["cost_formatted"], json!("7.500 VND"));
}

#[tokio::test]
async fn test_update_price_applies_to_report() {
    let app = MockApp::new();

    let (status, body) = app.post("/update-price", json!({ "price": 3000.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], json!(3000.0));

    let (_, report) = app.get("/energy-report").await;
    assert_eq!(report["price_per_kwh"], json!(3000.0));
}

#[tokio::test]
async fn test_tariff_updates_accept_numeric_text() {
    let app = MockApp::new();

    let (status, body) = app.post("/update-price", json!({ "price": "3000" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], json!(3000.0));

    let (status, body) = app
        .post("/update-power", json!({ "device": "heater", "power": " 120 " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["power"], json!(120.0));

    let (status, _) = app.post("/update-price", json!({ "price": "cheap" })).await;
    assert!(status.is_client_error());

    let (_, report) = app.get("/energy-report").await;
    assert_eq!(report["price_per_kwh"], json!(3000.0));
    assert_eq!(report["device_power"]["heater"], json!(120.0));
}

#[tokio::test]
async fn test_invalid_tariff_updates_are_rejected() {
    let app = MockApp::new();

    let (status, body) = app.post("/update-price", json!({ "price": 0.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!(400));

    let (status, _) = app
        .post("/update-power", json!({ "device": "fan", "power": -5.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/update-power", json!({ "device": "pump", "power": 5.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, report) = app.get("/energy-report").await;
    assert_eq!(report["price_per_kwh"], json!(2500.0));
    assert_eq!(report["device_power"]["fan"], json!(50.0));
}

#[tokio::test]
async fn test_report_resets_after_midnight() {
    let app = MockApp::new();
    app.post("/floor1/heater", json!({ "state": "ON" })).await;
    app.clock.advance(Duration::hours(3));

    let (_, report) = app.get("/energy-report").await;
    assert_eq!(report["floors"]["floor1"]["daily"]["devices"]["heater"]["runtime_seconds"], json!(10_800));

    app.clock.set(datetime!(2026-03-03 00:05 UTC));
    let (_, report) = app.get("/energy-report").await;

    assert_eq!(report["date"], json!("2026-03-03"));
    assert_eq!(report["total"]["daily"]["cost"], json!(0));

    let (_, commands) = app.get("/commands").await;
    assert_eq!(commands["floor1"]["heater"], json!("OFF"));
}
