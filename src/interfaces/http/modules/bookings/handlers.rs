//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::application::services::{BookingService, CreateBooking};
use crate::domain::booking::CancelledBy;
use crate::interfaces::http::common::{error_reply, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub service: Arc<BookingService>,
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

fn parse_role<T>(value: &str) -> Result<CancelledBy, (StatusCode, Json<ApiResponse<T>>)> {
    match value {
        "guest" => Ok(CancelledBy::Guest),
        "host" => Ok(CancelledBy::Host),
        "admin" => Ok(CancelledBy::Admin),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "Invalid cancelled_by '{}': expected guest, host or admin",
                other
            ))),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created, payment pending", body = ApiResponse<CreateBookingResponse>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Dates already booked")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<CreateBookingResponse>>),
    (StatusCode, Json<ApiResponse<CreateBookingResponse>>),
> {
    let check_in = parse_instant("check_in", &request.check_in)?;
    let check_out = parse_instant("check_out", &request.check_out)?;

    let created = state
        .service
        .create(CreateBooking {
            property_id: request.property_id,
            guest_id: request.guest_id,
            check_in,
            check_out,
            number_of_guests: request.number_of_guests,
            guests: request.guests.into(),
            special_requests: request.special_requests,
        })
        .await
        .map_err(error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateBookingResponse {
            booking: created.booking.into(),
            pricing: created.quote,
            client_secret: created.client_secret,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(
        ("property_id" = Option<String>, Query, description = "Filter by property"),
        ("guest_id" = Option<String>, Query, description = "Filter by guest")
    ),
    responses(
        (status = 200, description = "Matching bookings", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)> {
    let bookings = match (query.property_id, query.guest_id) {
        (Some(property_id), _) => state.service.list_for_property(&property_id).await,
        (None, Some(guest_id)) => state.service.list_for_guest(&guest_id).await,
        (None, None) => state.service.list_all().await,
    }
    .map_err(error_reply)?;

    let dtos: Vec<BookingDto> = bookings.into_iter().map(BookingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state.service.get(&booking_id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/confirm",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking is not pending")
    )
)]
pub async fn confirm_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .service
        .confirm(&booking_id)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 403, description = "Actor may not cancel this booking"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking already finished")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CancelBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let by = parse_role(&request.cancelled_by)?;
    let booking = state
        .service
        .cancel(&booking_id, &request.actor_id, by, request.reason)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/refund",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = RefundBookingRequest,
    responses(
        (status = 200, description = "Refund issued", body = ApiResponse<BookingDto>),
        (status = 402, description = "Payment processor rejected the refund"),
        (status = 403, description = "Actor may not refund this booking"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking is not paid")
    )
)]
pub async fn refund_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RefundBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .service
        .refund(&booking_id, &request.actor_id, request.amount, request.reason)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/complete",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Stay completed", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking is not confirmed")
    )
)]
pub async fn complete_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .service
        .complete(&booking_id)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/no-show",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking marked as no-show", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking is not confirmed")
    )
)]
pub async fn mark_no_show(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .service
        .mark_no_show(&booking_id)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/confirm",
    tag = "Payments",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed", body = ApiResponse<BookingDto>),
        (status = 402, description = "Payment did not succeed"),
        (status = 404, description = "No booking for this payment intent")
    )
)]
pub async fn confirm_payment(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<ConfirmPaymentRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .service
        .confirm_payment(&request.payment_intent_id)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(booking.into())))
}
