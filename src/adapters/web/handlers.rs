//! HTTP request handlers for web adapter.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::json_report::indexed_json;
use crate::domain::pipeline::run_signal_pipeline;

use super::{AppState, WebError};

const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub code: Option<String>,
}

/// Symbol codes become file names, so only plain ticker characters pass.
fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && !code.starts_with('.')
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '^' | '-' | '_' | '.'))
}

/// Decision series for the configured symbol (or `?code=`), keyed by row index.
pub async fn data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Response, WebError> {
    let mut settings = state.settings.clone();
    if let Some(code) = query.code.map(|c| c.trim().to_string()) {
        if !is_valid_code(&code) {
            return Err(WebError::bad_request(format!("invalid symbol code '{}'", code)));
        }
        settings.code = code;
    }

    let worker = Arc::clone(&state);
    let records = tokio::task::spawn_blocking(move || {
        run_signal_pipeline(worker.data_port.as_ref(), &worker.system, &settings)
    })
    .await
    .map_err(|e| WebError::internal(format!("signal task failed: {}", e)))??;

    Ok(Json(indexed_json(&records)?).into_response())
}

pub async fn symbols(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let worker = Arc::clone(&state);
    let symbols = tokio::task::spawn_blocking(move || worker.data_port.list_symbols())
        .await
        .map_err(|e| WebError::internal(format!("symbol listing task failed: {}", e)))??;
    Ok(Json(symbols).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
