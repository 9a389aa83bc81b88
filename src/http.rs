use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::demand::RandomDemand;
use crate::engine::{Engine, EngineError};
use crate::model::{AvailabilitySlot, SlotKey};

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/api/availability", get(list_availability))
        .route("/api/availability/book", post(book_slot))
        .route("/api/availability/release", post(release_slot))
        .route("/api/admin/bootstrap", post(bootstrap))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Book/Release request body: `{"furnitureId": "...", "date": "YYYY-MM-DD"}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRequest {
    #[serde(default)]
    furniture_id: String,
    #[serde(default)]
    date: String,
}

impl SlotRequest {
    fn into_key(self) -> Result<SlotKey, EngineError> {
        if self.furniture_id.is_empty() {
            return Err(EngineError::Validation("furnitureId is required"));
        }
        let date: NaiveDate = self
            .date
            .parse()
            .map_err(|_| EngineError::Validation("date must be YYYY-MM-DD"))?;
        Ok(SlotKey::new(self.furniture_id, date))
    }
}

#[derive(Serialize)]
struct SlotResponse {
    success: bool,
    slot: AvailabilitySlot,
}

#[derive(Serialize)]
struct BootstrapResponse {
    /// Inventory size after seeding.
    items: usize,
    /// Slots newly generated by this call (zero when already present).
    slots: usize,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EngineError::SlotNotFound { .. } => (StatusCode::NOT_FOUND, "Slot not found".into()),
            EngineError::Conflict { .. } => {
                (StatusCode::BAD_REQUEST, "Slot is not available".into())
            }
            EngineError::Validation(msg) => (StatusCode::BAD_REQUEST, (*msg).to_string()),
            EngineError::Storage(e) => {
                tracing::error!("storage failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// GET /api/availability — the full slot collection, day-major order.
/// Side-effect-free: baseline data comes from the bootstrap operation.
async fn list_availability(State(engine): State<Arc<Engine>>) -> Json<Vec<AvailabilitySlot>> {
    Json(engine.list_slots().await)
}

async fn book_slot(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<SlotRequest>,
) -> Result<Json<SlotResponse>, ApiError> {
    let key = req.into_key()?;
    let slot = engine.book(&key).await?;
    Ok(Json(SlotResponse {
        success: true,
        slot,
    }))
}

async fn release_slot(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<SlotRequest>,
) -> Result<Json<SlotResponse>, ApiError> {
    let key = req.into_key()?;
    let slot = engine.release(&key).await?;
    Ok(Json(SlotResponse {
        success: true,
        slot,
    }))
}

/// POST /api/admin/bootstrap — seed the catalog and generate the calendar,
/// each idempotent-by-absence.
async fn bootstrap(State(engine): State<Arc<Engine>>) -> Result<Json<BootstrapResponse>, ApiError> {
    let mut demand = RandomDemand::new();
    let (items, slots) = engine.bootstrap(&mut demand).await?;
    Ok(Json(BootstrapResponse { items, slots }))
}
