use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use repbook::records::{ExerciseRecord, RankedRecords, SortKey};

use super::error::ApiResult;
use super::params::{Params, text};
use crate::AppState;

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Json<RankedRecords>> {
    let sort_by = SortKey::parse_or_default(text(&params, "sort_by").as_deref());
    Ok(Json(state.tracker.get_all_records(sort_by).await?))
}

pub(crate) async fn exercise_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ExerciseRecord>> {
    let Path(exercise_id) = path?;
    Ok(Json(state.tracker.get_exercise_record(exercise_id).await?))
}
