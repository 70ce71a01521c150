use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use climasync_api::models::*;
use serde::Deserialize;
use time::Duration;

use crate::errors::{ApiError, DetectionError};
use crate::services::{DayKey, HubService, NewDetection};

#[derive(Clone)]
pub struct DetectionState {
    pub hub: Arc<HubService>,
}

/// `day` is kept as text so that junk falls back to today instead of
/// rejecting the request. Leading digits are read the way a lenient
/// integer parse does, so `2abc` selects yesterday.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetectionHistoryQuery {
    /// 1 = today, 2 = yesterday, 3 = the day before
    pub day: Option<String>,
}

impl DetectionHistoryQuery {
    pub fn slot(&self) -> DaySlot {
        self.day
            .as_deref()
            .and_then(|day| {
                let day = day.trim_start();
                let end = day.find(|c: char| !c.is_ascii_digit()).unwrap_or(day.len());
                day[..end].parse::<u8>().ok()
            })
            .and_then(DaySlot::from_day)
            .unwrap_or(DaySlot::Today)
    }
}

pub fn detection_router(detection_state: DetectionState) -> Router {
    Router::new()
        .route("/detection-history", get(get_detection_history))
        .route("/detection-add", post(add_detection))
        .route("/detection-delete/:id", delete(delete_detection))
        .with_state(detection_state)
}

#[utoipa::path(
    get,
    path = "/detection-history",
    tag = "detection",
    params(DetectionHistoryQuery),
    responses(
        (status = 200, description = "Detections of one retained day, oldest first", body = DetectionHistoryResponse)
    )
)]
pub async fn get_detection_history(
    State(state): State<DetectionState>,
    Query(query): Query<DetectionHistoryQuery>,
) -> Json<DetectionHistoryResponse> {
    let slot = query.slot();
    let now = state.hub.now();

    let data = state.hub.list_detections(slot, now);
    let date_label = state
        .hub
        .active_day(now)
        .date()
        .checked_sub(Duration::days(slot.index() as i64))
        .map(|date| format!("{} ({})", slot.label(), DayKey::from(date)))
        .unwrap_or_else(|| slot.label().to_string());

    Json(DetectionHistoryResponse {
        success: true,
        day: slot.day(),
        date_label,
        count: data.len(),
        data,
    })
}

#[utoipa::path(
    post,
    path = "/detection-add",
    tag = "detection",
    request_body = AddDetectionRequest,
    responses(
        (status = 200, description = "Detection stored in today's slot", body = AddDetectionResponse),
        (status = 400, description = "Confidence outside 0..=1")
    )
)]
pub async fn add_detection(
    State(state): State<DetectionState>,
    Json(body): Json<AddDetectionRequest>,
) -> Result<Json<AddDetectionResponse>, ApiError> {
    let now = state.hub.now();
    let detection = state.hub.add_detection(NewDetection::from(body), now)?;

    Ok(Json(AddDetectionResponse {
        success: true,
        detection,
    }))
}

#[utoipa::path(
    delete,
    path = "/detection-delete/{id}",
    tag = "detection",
    params(
        ("id" = u64, Path, description = "Detection ID")
    ),
    responses(
        (status = 200, description = "Detection removed", body = AckResponse),
        (status = 404, description = "No retained detection has this ID")
    )
)]
pub async fn delete_detection(
    State(state): State<DetectionState>,
    Path(id): Path<u64>,
) -> Result<Json<AckResponse>, ApiError> {
    let now = state.hub.now();

    if !state.hub.remove_detection(id, now) {
        return Err(DetectionError::NotFound(id).into());
    }

    Ok(Json(AckResponse::ok(format!("Detection {id} deleted"))))
}
