//! Router, handlers and error mapping.

use axum::{
    Json, Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use acidsim_engine::Simulation;
use acidsim_types::{ControlError, ProcessSnapshot};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type";

/// Build the application router around a simulation handle.
///
/// With `cors` set, every routed response allows any origin and `OPTIONS`
/// preflights are answered directly with 204.
pub fn router(sim: Simulation, cors: bool) -> Router {
    let app = Router::new()
        .route("/api/state", get(state_handler))
        .route("/api/start", post(start_handler))
        .route("/api/pause", post(pause_handler))
        .route("/api/reset", post(reset_handler))
        .route("/api/speed", post(speed_handler))
        .route("/api/device", post(device_handler))
        .route("/health", get(health_handler))
        .with_state(sim);

    if cors {
        app.layer(middleware::from_fn(cors_middleware))
    } else {
        app
    }
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    factor: f64,
}

#[derive(Debug, Deserialize)]
struct DeviceRequest {
    device: String,
    on: bool,
}

async fn state_handler(State(sim): State<Simulation>) -> Json<ProcessSnapshot> {
    Json(sim.snapshot())
}

async fn start_handler(State(sim): State<Simulation>) -> StatusCode {
    sim.start();
    StatusCode::NO_CONTENT
}

async fn pause_handler(State(sim): State<Simulation>) -> StatusCode {
    sim.pause();
    StatusCode::NO_CONTENT
}

async fn reset_handler(State(sim): State<Simulation>) -> StatusCode {
    sim.reset();
    StatusCode::NO_CONTENT
}

async fn speed_handler(
    State(sim): State<Simulation>,
    payload: Result<Json<SpeedRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    sim.set_speed(request.factor);
    Ok(StatusCode::NO_CONTENT)
}

async fn device_handler(
    State(sim): State<Simulation>,
    payload: Result<Json<DeviceRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    sim.set_device(&request.device, request.on)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }
    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// A rejected control request. Always rendered as 400 with a JSON message.
#[derive(Debug)]
pub struct ApiError(ControlError);

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ControlError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        tracing::warn!("Rejected request: {message}");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}
