use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use ipcquery_core::{StructuredRecord, build_prompt};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::ResponseMode;
use crate::error::HandlerError;
use crate::server::AppState;

/// Body of `POST /get_response`. A missing `prompt` is an empty query.
#[derive(Debug, Default)]
pub struct QueryRequest {
    pub prompt: String,
}

impl QueryRequest {
    /// Read the query out of a JSON object body.
    ///
    /// Only the object shape is accepted; any `prompt` that is present must be
    /// a string.
    pub fn from_object(mut body: Map<String, Value>) -> Result<Self, HandlerError> {
        match body.remove("prompt") {
            None => Ok(Self::default()),
            Some(Value::String(prompt)) => Ok(Self { prompt }),
            Some(other) => Err(HandlerError::Internal(format!(
                "`prompt` must be a string, found {other}"
            ))),
        }
    }
}

#[derive(Serialize)]
struct ResponseBody<T> {
    response: T,
}

pub(crate) async fn get_response(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(body) = payload.inspect_err(|e| warn!(error = %e, "rejected request body"))?;
    let req = QueryRequest::from_object(body)
        .inspect_err(|e| warn!(error = %e, "rejected request body"))?;

    let prompt = build_prompt(&state.config.prompt_template, &req.prompt);
    info!(query = %req.prompt, mode = %state.config.mode, "handling query");
    debug!(prompt = %prompt, "full prompt");

    let text = state
        .generator
        .generate(&prompt)
        .await
        .inspect_err(|e| warn!(error = %e, "generation failed"))?;

    match state.config.mode {
        ResponseMode::Passthrough => Ok(Json(ResponseBody { response: text }).into_response()),
        ResponseMode::Strict => {
            let record = StructuredRecord::from_model_text(&text)?;
            Ok(Json(ResponseBody { response: record }).into_response())
        }
    }
}
