//! Property availability HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::application::services::AvailabilityService;
use crate::interfaces::http::common::{error_reply, ApiResponse};

use super::dto::*;

/// Application state for property handlers.
#[derive(Clone)]
pub struct PropertyAppState {
    pub availability: AvailabilityService,
}

fn parse_instant<T>(
    field: &str,
    value: &str,
) -> Result<DateTime<Utc>, (StatusCode, Json<ApiResponse<T>>)> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Invalid {}: {}", field, e))),
            )
        })
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}/availability",
    tag = "Properties",
    params(
        ("property_id" = String, Path, description = "Property ID"),
        ("check_in" = String, Query, description = "Check-in instant (ISO 8601)"),
        ("check_out" = String, Query, description = "Check-out instant (ISO 8601)")
    ),
    responses(
        (status = 200, description = "Availability verdict", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn check_availability(
    State(state): State<PropertyAppState>,
    Path(property_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<
    Json<ApiResponse<AvailabilityResponse>>,
    (StatusCode, Json<ApiResponse<AvailabilityResponse>>),
> {
    let check_in = parse_instant("check_in", &query.check_in)?;
    let check_out = parse_instant("check_out", &query.check_out)?;

    if check_out <= check_in {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("check_out must be after check_in")),
        ));
    }

    let conflicts = state
        .availability
        .conflicts(&property_id, check_in, check_out, None)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(AvailabilityResponse {
        property_id,
        check_in: check_in.to_rfc3339(),
        check_out: check_out.to_rfc3339(),
        available: conflicts.is_empty(),
        conflicting_bookings: conflicts.len(),
    })))
}
