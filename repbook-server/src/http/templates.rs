use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use repbook::db::models::{
    NewTemplate, Template, TemplateDetail, TemplateSetInput, UpdateTemplate,
};
use serde::Deserialize;

use super::created;
use super::error::{ApiError, ApiResult};
use super::params::{Params, text};
use crate::AppState;

#[derive(Deserialize)]
pub(crate) struct CreateTemplateBody {
    #[serde(flatten)]
    template: NewTemplate,
    #[serde(default)]
    sets: Vec<TemplateSetInput>,
}

pub(crate) async fn list_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Template>>> {
    Ok(Json(state.tracker.list_templates().await?))
}

pub(crate) async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<TemplateDetail>> {
    let Path(id) = path?;
    Ok(Json(state.tracker.get_template(id).await?))
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTemplateBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let template = state
        .tracker
        .create_template(body.template, body.sets)
        .await?;
    Ok(created(template.id))
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateTemplate>, JsonRejection>,
) -> ApiResult<Json<Template>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    Ok(Json(state.tracker.update_template(id, update).await?))
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tracker.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_set_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TemplateSetInput>, JsonRejection>,
) -> ApiResult<Response> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let set = state.tracker.add_template_set(id, input).await?;
    Ok(created(set.id))
}

pub(crate) async fn delete_set_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tracker.delete_template_set(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn to_workout_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    Query(params): Query<Params>,
) -> ApiResult<Response> {
    let Path(id) = path?;
    let workout = state
        .tracker
        .create_workout_from_template(id, text(&params, "date"), text(&params, "type"))
        .await?;
    Ok(created(workout.id))
}

pub(crate) async fn from_workout_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    Query(params): Query<Params>,
) -> ApiResult<Response> {
    let Path(id) = path?;
    let name = text(&params, "template_name")
        .ok_or_else(|| ApiError::bad_request("template_name is required"))?;
    let template = state
        .tracker
        .create_template_from_workout(id, name)
        .await?;
    Ok(created(template.id))
}
