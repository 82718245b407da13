use std::collections::HashMap;
use std::str::FromStr;

use repbook::history::HistoryFilter;

use super::error::ApiError;

pub(crate) type Params = HashMap<String, String>;

/// Non-empty trimmed value of `key`.
pub(crate) fn text(params: &Params, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn number<T: FromStr>(params: &Params, key: &str) -> Result<Option<T>, ApiError> {
    text(params, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ApiError::bad_request(format!("{key} must be an integer, got '{raw}'")))
        })
        .transpose()
}

pub(crate) fn flag(params: &Params, key: &str) -> Result<Option<bool>, ApiError> {
    match text(params, key).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "no") => Ok(Some(false)),
        Some(other) => Err(ApiError::bad_request(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

pub(crate) fn history_filter(params: &Params) -> Result<HistoryFilter, ApiError> {
    Ok(HistoryFilter {
        workout_type: text(params, "type"),
        date_from: text(params, "date_from"),
        date_to: text(params, "date_to"),
        template_id: number(params, "template_id")?,
        limit: number(params, "limit")?,
        include_stats: flag(params, "include_stats")?.unwrap_or(true),
    })
}
