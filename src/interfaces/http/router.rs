//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::BookingService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{bookings, health, properties};

use crate::interfaces::http::modules::bookings::dto::*;
use crate::interfaces::http::modules::bookings::BookingAppState;
use crate::interfaces::http::modules::health::handlers as health_handlers;
use crate::interfaces::http::modules::properties::dto::AvailabilityResponse;
use crate::interfaces::http::modules::properties::PropertyAppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health_handlers::health_check,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::confirm_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::refund_booking,
        bookings::handlers::complete_booking,
        bookings::handlers::mark_no_show,
        // Payments
        bookings::handlers::confirm_payment,
        // Properties
        properties::handlers::check_availability,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Bookings
            BookingDto,
            CancellationDto,
            GuestDetailsDto,
            CreateBookingRequest,
            CreateBookingResponse,
            CancelBookingRequest,
            RefundBookingRequest,
            ConfirmPaymentRequest,
            // Properties
            AvailabilityResponse,
            // Health
            health_handlers::HealthResponse,
            health_handlers::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service health check endpoints"),
        (name = "Bookings", description = "Booking creation, queries and lifecycle transitions"),
        (name = "Payments", description = "Payment confirmation after checkout"),
        (name = "Properties", description = "Per-property calendar availability"),
    ),
    info(
        title = "StayHaven Booking API",
        version = "1.0.0",
        description = "REST API for vacation rental bookings, payments and availability"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    service: Arc<BookingService>,
    db: DatabaseConnection,
    metrics_handle: PrometheusHandle,
    started_at: Arc<Instant>,
) -> Router {
    let booking_state = BookingAppState {
        service: Arc::clone(&service),
    };

    let property_state = PropertyAppState {
        availability: service.availability().clone(),
    };

    let health_state = health::HealthState { db, started_at };

    let metrics_state = MetricsState {
        handle: metrics_handle,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::handlers::list_bookings).post(bookings::handlers::create_booking),
        )
        .route("/{booking_id}", get(bookings::handlers::get_booking))
        .route(
            "/{booking_id}/confirm",
            post(bookings::handlers::confirm_booking),
        )
        .route(
            "/{booking_id}/cancel",
            post(bookings::handlers::cancel_booking),
        )
        .route(
            "/{booking_id}/refund",
            post(bookings::handlers::refund_booking),
        )
        .route(
            "/{booking_id}/complete",
            post(bookings::handlers::complete_booking),
        )
        .route(
            "/{booking_id}/no-show",
            post(bookings::handlers::mark_no_show),
        )
        .with_state(booking_state.clone());

    let payment_routes = Router::new()
        .route("/confirm", post(bookings::handlers::confirm_payment))
        .with_state(booking_state);

    let property_routes = Router::new()
        .route(
            "/{property_id}/availability",
            get(properties::handlers::check_availability),
        )
        .with_state(property_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .route(
            "/health",
            get(health_handlers::health_check).with_state(health_state),
        )
        .route(
            "/metrics",
            get(prometheus_metrics).with_state(metrics_state),
        )
        // Bookings
        .nest("/api/v1/bookings", booking_routes)
        // Payments
        .nest("/api/v1/payments", payment_routes)
        // Properties
        .nest("/api/v1/properties", property_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
