pub(crate) mod error;
pub(crate) mod exercises;
pub(crate) mod params;
pub(crate) mod records;
pub(crate) mod sets;
pub(crate) mod templates;
pub(crate) mod workouts;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

pub(crate) async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Workout App API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) fn created(id: i32) -> Response {
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}
