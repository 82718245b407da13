use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use repbook::db::models::{NewWorkoutSet, UpdateWorkoutSet, WorkoutSet};

use super::created;
use super::error::ApiResult;
use crate::AppState;

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkoutSet>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new) = payload?;
    let set = state.tracker.create_set(new).await?;
    Ok(created(set.id))
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateWorkoutSet>, JsonRejection>,
) -> ApiResult<Json<WorkoutSet>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    Ok(Json(state.tracker.update_set(id, update).await?))
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tracker.delete_set(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
