use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use climasync_api::models::*;

use crate::errors::{ApiError, DeviceError};
use crate::handles::{parse_device, parse_location};
use crate::services::HubService;

#[derive(Clone)]
pub struct ControlState {
    pub hub: Arc<HubService>,
}

pub fn control_router(control_state: ControlState) -> Router {
    Router::new()
        .route("/commands", get(get_commands))
        .route("/:floor/:device", post(control_device))
        .with_state(control_state)
}

#[utoipa::path(
    post,
    path = "/{floor}/{device}",
    tag = "device",
    params(
        ("floor" = String, Path, description = "Floor name, floor1 or floor2"),
        ("device" = String, Path, description = "Device name: led, fan, fog or heater")
    ),
    request_body = DeviceControlRequest,
    responses(
        (status = 200, description = "State applied", body = DeviceControlResponse),
        (status = 400, description = "Unknown device or state"),
        (status = 404, description = "Unknown floor")
    )
)]
pub async fn control_device(
    State(state): State<ControlState>,
    Path((floor, device)): Path<(String, String)>,
    Json(body): Json<DeviceControlRequest>,
) -> Result<Json<DeviceControlResponse>, ApiError> {
    let location = parse_location(floor)?;
    let kind = parse_device(device)?;
    let requested = body
        .state
        .parse::<DeviceState>()
        .map_err(|_| DeviceError::InvalidState(body.state.clone()))?;

    let now = state.hub.now();
    let applied = state.hub.set_device_state(location, kind, requested, now);

    Ok(Json(DeviceControlResponse {
        floor: location,
        device: kind,
        state: applied,
        success: true,
    }))
}

#[utoipa::path(
    get,
    path = "/commands",
    tag = "device",
    responses(
        (status = 200, description = "Commanded state per floor and device", body = BTreeMap<String, BTreeMap<String, DeviceState>>)
    )
)]
pub async fn get_commands(State(state): State<ControlState>) -> Json<DeviceCommands> {
    let now = state.hub.now();

    Json(state.hub.device_commands(now))
}
