use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use repbook::db::models::{NewWorkout, UpdateWorkout, Workout, WorkoutDetail};
use repbook::history::WorkoutHistory;

use super::created;
use super::error::ApiResult;
use super::params::{Params, history_filter};
use crate::AppState;

pub(crate) async fn list_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Workout>>> {
    Ok(Json(state.tracker.list_workouts().await?))
}

pub(crate) async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<WorkoutDetail>> {
    let Path(id) = path?;
    Ok(Json(state.tracker.get_workout(id).await?))
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkout>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new) = payload?;
    let workout = state.tracker.create_workout(new).await?;
    Ok(created(workout.id))
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateWorkout>, JsonRejection>,
) -> ApiResult<Json<Workout>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    Ok(Json(state.tracker.update_workout(id, update).await?))
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tracker.delete_workout(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn history_handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Json<WorkoutHistory>> {
    let filter = history_filter(&params)?;
    Ok(Json(state.tracker.get_workout_history(filter).await?))
}
