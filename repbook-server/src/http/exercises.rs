use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use repbook::db::models::{Exercise, NewExercise, UpdateExercise};

use super::created;
use super::error::ApiResult;
use super::params::{Params, text};
use crate::AppState;

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Vec<Exercise>>> {
    let exercises = state
        .tracker
        .list_exercises(text(&params, "muscle_group"))
        .await?;
    Ok(Json(exercises))
}

pub(crate) async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Exercise>> {
    let Path(id) = path?;
    Ok(Json(state.tracker.get_exercise(id).await?))
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewExercise>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new) = payload?;
    let exercise = state.tracker.create_exercise(new).await?;
    Ok(created(exercise.id))
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateExercise>, JsonRejection>,
) -> ApiResult<Json<Exercise>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    Ok(Json(state.tracker.update_exercise(id, update).await?))
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tracker.delete_exercise(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
