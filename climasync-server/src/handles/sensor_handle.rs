use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use climasync_api::models::*;

use crate::errors::ApiError;
use crate::handles::parse_location;
use crate::services::HubService;

#[derive(Clone)]
pub struct SensorState {
    pub hub: Arc<HubService>,
}

pub fn sensor_router(sensor_state: SensorState) -> Router {
    Router::new()
        .route("/update", post(update_from_coordinator))
        .route("/data", get(get_floor_data))
        .route("/history/:floor", get(get_history))
        .route("/stats", get(get_stats))
        .route("/stats-detail", get(get_stats_detail))
        .route("/:floor", post(push_sensor_reading))
        .with_state(sensor_state)
}

/// Renders the command line the floor nodes parse, e.g.
/// `LED_ON FAN_OFF FOG_OFF HEATER_OFF`.
pub fn command_line(states: &BTreeMap<DeviceKind, DeviceState>) -> String {
    states
        .iter()
        .map(|(kind, state)| format!("{}_{}", kind.as_str().to_ascii_uppercase(), state))
        .collect::<Vec<_>>()
        .join(" ")
}

#[utoipa::path(
    post,
    path = "/{floor}",
    tag = "sensor",
    params(
        ("floor" = String, Path, description = "Floor name, floor1 or floor2")
    ),
    request_body = SensorPushRequest,
    responses(
        (status = 200, description = "Commanded device states", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown floor")
    )
)]
pub async fn push_sensor_reading(
    State(state): State<SensorState>,
    Path(floor): Path<String>,
    Json(body): Json<SensorPushRequest>,
) -> Result<String, ApiError> {
    let location = parse_location(floor)?;
    let now = state.hub.now();

    state
        .hub
        .push_reading(location, Some(body.temp), Some(body.hum), now);

    Ok(command_line(&state.hub.device_states(location, now)))
}

#[utoipa::path(
    post,
    path = "/update",
    tag = "sensor",
    request_body = CoordinatorUpdateRequest,
    responses(
        (status = 200, description = "Readings stored", body = AckResponse)
    )
)]
pub async fn update_from_coordinator(
    State(state): State<SensorState>,
    Json(body): Json<CoordinatorUpdateRequest>,
) -> Json<AckResponse> {
    let now = state.hub.now();

    let mut stored = 0;
    for (location, reading) in body.readings() {
        state
            .hub
            .push_reading(location, reading.temperature(), reading.humidity(), now);
        stored += 1;
    }

    Json(AckResponse::ok(format!("{stored} floor(s) updated")))
}

#[utoipa::path(
    get,
    path = "/data",
    tag = "sensor",
    responses(
        (status = 200, description = "Live view of both floors", body = BTreeMap<String, FloorData>)
    )
)]
pub async fn get_floor_data(State(state): State<SensorState>) -> Json<DataResponse> {
    let now = state.hub.now();

    Json(state.hub.floor_data(now))
}

#[utoipa::path(
    get,
    path = "/history/{floor}",
    tag = "sensor",
    params(
        ("floor" = String, Path, description = "Floor name, floor1 or floor2")
    ),
    responses(
        (status = 200, description = "Today's readings, oldest first", body = HistoryResponse),
        (status = 404, description = "Unknown floor")
    )
)]
pub async fn get_history(
    State(state): State<SensorState>,
    Path(floor): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let location = parse_location(floor)?;
    let now = state.hub.now();

    Ok(Json(state.hub.history(location, now)))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "sensor",
    responses(
        (status = 200, description = "Runtime per device", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<SensorState>) -> Json<StatsResponse> {
    let now = state.hub.now();

    Json(state.hub.stats(now))
}

#[utoipa::path(
    get,
    path = "/stats-detail",
    tag = "sensor",
    responses(
        (status = 200, description = "Climate statistics with recent readings", body = StatsDetailResponse)
    )
)]
pub async fn get_stats_detail(State(state): State<SensorState>) -> Json<StatsDetailResponse> {
    let now = state.hub.now();

    Json(state.hub.stats_detail(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_order() {
        let states = BTreeMap::from([
            (DeviceKind::Heater, DeviceState::Off),
            (DeviceKind::Lighting, DeviceState::On),
            (DeviceKind::Fogger, DeviceState::Off),
            (DeviceKind::Ventilation, DeviceState::On),
        ]);

        assert_eq!(command_line(&states), "LED_ON FAN_ON FOG_OFF HEATER_OFF");
    }
}
