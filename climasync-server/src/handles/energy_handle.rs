use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use climasync_api::models::*;

use crate::errors::ApiError;
use crate::handles::parse_device;
use crate::services::HubService;

#[derive(Clone)]
pub struct EnergyState {
    pub hub: Arc<HubService>,
}

pub fn energy_router(energy_state: EnergyState) -> Router {
    Router::new()
        .route("/energy-report", get(get_energy_report))
        .route("/update-power", post(update_power))
        .route("/update-price", post(update_price))
        .with_state(energy_state)
}

#[utoipa::path(
    get,
    path = "/energy-report",
    tag = "energy",
    responses(
        (status = 200, description = "Today's consumption and the 30 day projection", body = EnergyReport)
    )
)]
pub async fn get_energy_report(State(state): State<EnergyState>) -> Json<EnergyReport> {
    let now = state.hub.now();

    Json(state.hub.energy_report(now))
}

#[utoipa::path(
    post,
    path = "/update-power",
    tag = "energy",
    request_body = UpdatePowerRequest,
    responses(
        (status = 200, description = "Rated power updated", body = UpdatePowerResponse),
        (status = 400, description = "Unknown device or non-positive power")
    )
)]
pub async fn update_power(
    State(state): State<EnergyState>,
    Json(body): Json<UpdatePowerRequest>,
) -> Result<Json<UpdatePowerResponse>, ApiError> {
    let kind = parse_device(body.device)?;

    state.hub.set_device_power(kind, body.power)?;

    Ok(Json(UpdatePowerResponse {
        success: true,
        device: kind,
        power: body.power,
    }))
}

#[utoipa::path(
    post,
    path = "/update-price",
    tag = "energy",
    request_body = UpdatePriceRequest,
    responses(
        (status = 200, description = "Tariff updated", body = UpdatePriceResponse),
        (status = 400, description = "Non-positive price")
    )
)]
pub async fn update_price(
    State(state): State<EnergyState>,
    Json(body): Json<UpdatePriceRequest>,
) -> Result<Json<UpdatePriceResponse>, ApiError> {
    state.hub.set_tariff(body.price)?;

    Ok(Json(UpdatePriceResponse {
        success: true,
        price: body.price,
    }))
}
