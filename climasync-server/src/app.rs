use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::{HubConfig, HubService, SystemClock};

#[derive(OpenApi)]
#[openapi(
    paths(
        push_sensor_reading,
        update_from_coordinator,
        get_floor_data,
        get_history,
        get_stats,
        get_stats_detail,
        control_device,
        get_commands,
        get_energy_report,
        update_power,
        update_price,
        get_detection_history,
        add_detection,
        delete_detection,
    ),
    tags(
        (name = "sensor", description = "Climate readings from the floor nodes"),
        (name = "device", description = "Actuator control"),
        (name = "energy", description = "Consumption and tariff"),
        (name = "detection", description = "Camera detections of the last three days")
    )
)]
pub struct ApiDoc;

pub fn create_app(settings: &Settings) -> anyhow::Result<Router> {
    let clock = SystemClock::new(settings.clock.utc_offset_hours)?;
    let hub = HubService::new(HubConfig::from(settings), Arc::new(clock))?;

    Ok(create_router(Arc::new(hub)))
}

pub fn create_router(hub: Arc<HubService>) -> Router {
    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(sensor_router(SensorState { hub: hub.clone() }))
        .merge(control_router(ControlState { hub: hub.clone() }))
        .merge(energy_router(EnergyState { hub: hub.clone() }))
        .merge(detection_router(DetectionState { hub }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
